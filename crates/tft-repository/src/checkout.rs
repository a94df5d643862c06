//! Materializing a tree into a directory.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use bstr::{BStr, ByteSlice};
use tft_hash::ObjectId;
use tft_object::{Object, ObjectKind, TreeEntry};

use crate::{RepoError, Repository};

impl Repository {
    /// Write the tree `name` resolves to (a commit is followed to its tree)
    /// into `dest`, which must be missing or an empty directory.
    ///
    /// Regular blobs become files, with the executable bit for `100755`
    /// entries on unix. Symlink entries become symlinks on unix and plain
    /// files holding the link target elsewhere. Submodule entries become
    /// empty directories since their commits live in another repository.
    /// Returns the id of the tree written.
    pub fn checkout(&self, name: &str, dest: impl AsRef<Path>) -> Result<ObjectId, RepoError> {
        let dest = dest.as_ref();
        let root = self.resolve_to(name, ObjectKind::Tree)?;
        prepare_destination(dest)?;

        let mut pending = vec![(root, dest.to_path_buf())];
        let mut files = 0usize;
        while let Some((tree_id, dir)) = pending.pop() {
            let tree = self.read_tree(&tree_id)?;
            let mut names = HashSet::new();
            for entry in tree.iter() {
                let name = checked_name(&tree_id, entry.name.as_bstr())?;
                // A repeated name would write through whatever the first one
                // created, including a symlink pointing outside `dest`.
                if !names.insert(name) {
                    return Err(RepoError::InvalidTreeEntry {
                        tree: tree_id,
                        name: entry.name.to_str_lossy().into_owned(),
                    });
                }
                let path = dir.join(name);
                tracing::trace!(path = %path.display(), oid = %entry.oid, "checking out");
                if entry.mode.is_gitlink() {
                    fs::create_dir(&path)?;
                    continue;
                }
                match self.objects.read(&entry.oid)? {
                    Object::Tree(_) => {
                        fs::create_dir(&path)?;
                        pending.push((entry.oid, path));
                    }
                    Object::Blob(blob) => {
                        write_blob(entry, &path, &blob.data)?;
                        files += 1;
                    }
                    other => {
                        return Err(RepoError::UnexpectedKind {
                            oid: entry.oid,
                            expected: ObjectKind::Blob,
                            actual: other.kind(),
                        })
                    }
                }
            }
        }

        tracing::debug!(tree = %root, dest = %dest.display(), files, "checkout complete");
        Ok(root)
    }
}

fn prepare_destination(dest: &Path) -> Result<(), RepoError> {
    if !dest.exists() {
        fs::create_dir_all(dest)?;
        return Ok(());
    }
    if !dest.is_dir() || fs::read_dir(dest)?.next().is_some() {
        return Err(RepoError::DestinationNotEmpty(dest.to_path_buf()));
    }
    Ok(())
}

/// Entry names must stay inside the directory being written.
fn checked_name<'a>(tree: &ObjectId, name: &'a BStr) -> Result<&'a Path, RepoError> {
    let unsafe_name = || RepoError::InvalidTreeEntry {
        tree: *tree,
        name: name.to_str_lossy().into_owned(),
    };
    let s = name.to_str().map_err(|_| unsafe_name())?;
    let forbidden = s.is_empty()
        || s == "."
        || s == ".."
        || s.eq_ignore_ascii_case(".git")
        || s.contains(['/', '\0'])
        || (cfg!(windows) && s.contains(['\\', ':']));
    if forbidden {
        return Err(unsafe_name());
    }
    Ok(Path::new(s))
}

fn write_blob(entry: &TreeEntry, path: &Path, data: &[u8]) -> Result<(), RepoError> {
    if entry.mode.is_symlink() {
        return write_symlink(path, data);
    }
    // Never open an existing path: it could be a link planted earlier.
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?
        .write_all(data)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if entry.mode.is_executable() {
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(perms.mode() | 0o111);
            fs::set_permissions(path, perms)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn write_symlink(path: &Path, target: &[u8]) -> Result<(), RepoError> {
    use std::os::unix::ffi::OsStrExt;
    std::os::unix::fs::symlink(std::ffi::OsStr::from_bytes(target), path)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_symlink(path: &Path, target: &[u8]) -> Result<(), RepoError> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?
        .write_all(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tft_object::TreeMode;

    #[test]
    fn unsafe_names_are_rejected() {
        for bad in ["", ".", "..", ".git", ".GIT", "a/b", "nul\0"] {
            assert!(
                checked_name(&ObjectId::NULL, bad.as_bytes().as_bstr()).is_err(),
                "{bad:?}"
            );
        }
        assert!(checked_name(&ObjectId::NULL, b".gitignore".as_bstr()).is_ok());
        assert!(checked_name(&ObjectId::NULL, b"...".as_bstr()).is_ok());
    }

    #[test]
    fn blobs_are_never_written_over_existing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken");
        fs::write(&path, b"old").unwrap();
        let entry = TreeEntry::new(TreeMode::FILE, "taken", ObjectId::NULL);
        assert!(matches!(
            write_blob(&entry, &path, b"new"),
            Err(RepoError::Io(e)) if e.kind() == std::io::ErrorKind::AlreadyExists
        ));
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn destination_rules() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = dir.path().join("fresh/nested");
        prepare_destination(&fresh).unwrap();
        assert!(fresh.is_dir());
        // Empty and existing is fine.
        prepare_destination(&fresh).unwrap();

        fs::write(fresh.join("x"), b"").unwrap();
        assert!(matches!(
            prepare_destination(&fresh),
            Err(RepoError::DestinationNotEmpty(_))
        ));
        assert!(matches!(
            prepare_destination(&fresh.join("x")),
            Err(RepoError::DestinationNotEmpty(_))
        ));
    }
}
