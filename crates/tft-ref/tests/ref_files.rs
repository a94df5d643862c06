use std::fs;

use tft_hash::ObjectId;
use tft_ref::{FilesRefStore, RefError, RefName, Reference};

const OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

fn layout() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("refs/heads")).unwrap();
    fs::create_dir_all(dir.path().join("refs/tags")).unwrap();
    dir
}

#[test]
fn reads_files_written_by_other_tools() {
    let dir = layout();
    fs::write(dir.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();
    // Trailing whitespace and CRLF are tolerated.
    fs::write(dir.path().join("refs/heads/main"), format!("{OID}\r\n")).unwrap();

    let store = FilesRefStore::new(dir.path());
    assert_eq!(
        store.resolve_to_oid(&RefName::head()).unwrap(),
        Some(ObjectId::from_hex(OID).unwrap())
    );
    match store.read(&RefName::head()).unwrap() {
        Some(Reference::Symbolic { target, .. }) => assert_eq!(target.as_str(), "refs/heads/main"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn garbage_in_a_ref_file_is_reported() {
    let dir = layout();
    fs::write(dir.path().join("refs/tags/bad"), "not an id\n").unwrap();
    let store = FilesRefStore::new(dir.path());
    assert!(matches!(
        store.resolve_to_oid(&RefName::tag("bad").unwrap()),
        Err(RefError::Malformed { .. })
    ));
}

#[test]
fn tags_pointing_at_tags_resolve_through() {
    let dir = layout();
    let store = FilesRefStore::new(dir.path());
    let oid = ObjectId::from_hex(OID).unwrap();
    store.write_ref(&RefName::tag("v1").unwrap(), &oid).unwrap();
    store
        .write_symbolic_ref(&RefName::tag("latest").unwrap(), &RefName::tag("v1").unwrap())
        .unwrap();
    assert_eq!(
        store.resolve_to_oid(&RefName::tag("latest").unwrap()).unwrap(),
        Some(oid)
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("refs/tags/latest")).unwrap(),
        "ref: refs/tags/v1\n"
    );
}
