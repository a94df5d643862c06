use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tft_object::ObjectKind;
use tft_store::ObjectStore;

fn write_and_read(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let store = ObjectStore::open(dir.path());
    let payload = vec![b'x'; 64 * 1024];
    let oid = store.write_raw(ObjectKind::Blob, &payload).unwrap();

    c.bench_function("write_existing_64k", |b| {
        b.iter(|| store.write_raw(ObjectKind::Blob, black_box(&payload)))
    });
    c.bench_function("read_64k", |b| b.iter(|| store.read_raw(black_box(&oid))));
}

criterion_group!(benches, write_and_read);
criterion_main!(benches);
