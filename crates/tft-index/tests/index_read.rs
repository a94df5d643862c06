use std::process::{Command, Stdio};

use bstr::ByteSlice;
use tft_hash::ObjectId;
use tft_index::{EntryKind, Index, IndexError, Stage};

/// Encode one v2 entry the way git does.
fn entry(name: &[u8], mode: u16, flags_extra: u16, oid: [u8; 20]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [1u32, 2, 3, 4, 5, 6] {
        out.extend_from_slice(&v.to_be_bytes()); // ctime, mtime, dev, ino
    }
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&mode.to_be_bytes());
    for v in [1000u32, 1000, 42] {
        out.extend_from_slice(&v.to_be_bytes()); // uid, gid, size
    }
    out.extend_from_slice(&oid);
    let len = name.len().min(0xFFF) as u16;
    out.extend_from_slice(&(len | flags_extra).to_be_bytes());
    out.extend_from_slice(name);
    let padded = (62 + name.len() + 8) & !7;
    out.resize(padded, 0);
    out
}

fn index(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"DIRC".to_vec();
    out.extend_from_slice(&2u32.to_be_bytes());
    out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for e in entries {
        out.extend_from_slice(e);
    }
    out.extend_from_slice(&[0xAA; 20]); // trailing checksum is not examined
    out
}

#[test]
fn entries_in_disk_order() {
    let data = index(&[
        entry(b"b.txt", 0o100644, 0, [1; 20]),
        entry(b"a/bin", 0o100755, 0, [2; 20]),
        entry(b"link", 0o120000, 0, [3; 20]),
        entry(b"sub", 0o160000, 0, [4; 20]),
    ]);
    let idx = Index::parse(&data).unwrap();
    let names: Vec<_> = idx.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(names, ["b.txt", "a/bin", "link", "sub"]);

    let bin = &idx.entries()[1];
    assert_eq!(bin.kind, EntryKind::Regular);
    assert_eq!(bin.perms, 0o755);
    assert_eq!(bin.mode(), 0o100755);
    assert_eq!(bin.oid, ObjectId::new([2; 20]));
    assert_eq!(bin.stat.ctime_secs, 1);
    assert_eq!(bin.stat.mtime_nsecs, 4);
    assert_eq!(bin.stat.ino, 6);
    assert_eq!(bin.stat.size, 42);
    assert_eq!(idx.entries()[2].kind, EntryKind::Symlink);
    assert_eq!(idx.entries()[3].kind, EntryKind::Gitlink);
}

#[test]
fn padding_for_every_name_length() {
    // Names of length 1..=16 cover every residue mod 8.
    let entries: Vec<_> = (1..=16)
        .map(|n| entry(&vec![b'x'; n], 0o100644, 0, [n as u8; 20]))
        .collect();
    let idx = Index::parse(&index(&entries)).unwrap();
    assert_eq!(idx.len(), 16);
    for (i, e) in idx.iter().enumerate() {
        assert_eq!(e.path.len(), i + 1);
        assert_eq!(e.oid, ObjectId::new([(i + 1) as u8; 20]));
    }
}

#[test]
fn stage_and_assume_valid_flags() {
    let data = index(&[entry(b"conflict", 0o100644, 0x8000 | (2 << 12), [9; 20])]);
    let idx = Index::parse(&data).unwrap();
    let e = &idx.entries()[0];
    assert!(e.assume_valid);
    assert_eq!(e.stage, Stage::Ours);
}

#[test]
fn long_name_uses_nul_scan() {
    let long = vec![b'n'; 5000];
    let data = index(&[
        entry(&long, 0o100644, 0, [1; 20]),
        entry(b"after", 0o100644, 0, [2; 20]),
    ]);
    let idx = Index::parse(&data).unwrap();
    assert_eq!(idx.entries()[0].path.len(), 5000);
    assert_eq!(idx.entries()[1].path, "after");
}

#[test]
fn extended_flag_rejected() {
    let data = index(&[entry(b"x", 0o100644, 0x4000, [1; 20])]);
    assert!(matches!(
        Index::parse(&data),
        Err(IndexError::ExtendedFlagUnsupported { offset: 12 })
    ));
}

#[test]
fn unknown_entry_type_rejected() {
    let data = index(&[entry(b"dir", 0o040000, 0, [1; 20])]);
    assert!(matches!(
        Index::parse(&data),
        Err(IndexError::InvalidEntry { .. })
    ));
}

#[test]
fn missing_name_terminator_rejected() {
    let mut e = entry(b"abc", 0o100644, 0, [1; 20]);
    e[62 + 3] = b'!';
    // Overwrite the padding too so no NUL follows the name.
    for b in &mut e[62 + 3..] {
        *b = b'!';
    }
    let mut data = b"DIRC".to_vec();
    data.extend_from_slice(&2u32.to_be_bytes());
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(&e);
    assert!(Index::parse(&data).is_err());
}

#[test]
fn read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index");
    std::fs::write(&path, index(&[entry(b"README", 0o100644, 0, [5; 20])])).unwrap();
    let idx = Index::read_from(&path).unwrap();
    assert!(idx.get(b"README".as_bstr()).is_some());
    assert!(idx.get(b"nope".as_bstr()).is_none());
}

#[test]
fn index_written_by_git_parses() {
    let have_git = Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    if !have_git {
        eprintln!("git not installed; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let git = |args: &[&str]| {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir.path())
            .env("GIT_INDEX_VERSION", "2")
            .stdout(Stdio::null())
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    };
    git(&["init", "-q"]);
    std::fs::write(dir.path().join("hello.txt"), b"hello\n").unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/main.rs"), b"fn main() {}\n").unwrap();
    git(&["add", "."]);

    let idx = Index::read_from(dir.path().join(".git/index")).unwrap();
    let hello = idx.get(b"hello.txt".as_bstr()).unwrap();
    assert_eq!(
        hello.oid.to_hex(),
        "ce013625030ba8dba906f756967f9e9ca394464a"
    );
    assert!(idx.get(b"src/main.rs".as_bstr()).is_some());
}
