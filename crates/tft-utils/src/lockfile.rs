//! Exclusive `<path>.lock` files with atomic replacement.
//!
//! A writer creates `<path>.lock` with `create_new`, writes the new
//! contents into it, and renames it over `<path>`. Readers therefore see
//! either the old file or the new one, never a partial write. A lock that
//! is dropped without [`LockFile::commit`] is removed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{LockError, UtilError};
use crate::Result;

const LOCK_SUFFIX: &str = ".lock";

pub struct LockFile {
    path: PathBuf,
    lock_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl LockFile {
    /// Take the lock for `path`. Fails with [`LockError::AlreadyLocked`]
    /// if another writer holds it.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut lock_name = path.as_os_str().to_os_string();
        lock_name.push(LOCK_SUFFIX);
        let lock_path = PathBuf::from(lock_name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => LockError::AlreadyLocked {
                    path: lock_path.clone(),
                },
                _ => LockError::Create {
                    path: lock_path.clone(),
                    source: e,
                },
            })?;

        Ok(Self {
            path,
            lock_path,
            file: Some(file),
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Flush, sync and rename the lock file over the target.
    pub fn commit(mut self) -> Result<()> {
        let lock_path = self.lock_path.clone();
        let commit_err = |source| {
            UtilError::Lock(LockError::Commit {
                path: lock_path.clone(),
                source,
            })
        };
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(commit_err)?;
            file.sync_all().map_err(commit_err)?;
        }
        fs::rename(&self.lock_path, &self.path).map_err(commit_err)?;
        self.committed = true;
        Ok(())
    }

    /// Discard the pending contents. Dropping the guard does the same.
    pub fn rollback(mut self) -> Result<()> {
        self.file.take();
        self.committed = true;
        match fs::remove_file(&self.lock_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Replace `path` with `contents` under its lock.
pub fn write_locked(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let mut lock = LockFile::acquire(path)?;
    lock.write_all(contents)?;
    lock.commit()
}

impl Write for LockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .flush()
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("HEAD");
        fs::write(&target, b"ref: refs/heads/master\n").unwrap();

        let mut lock = LockFile::acquire(&target).unwrap();
        assert!(lock.lock_path().exists());
        lock.write_all(b"ref: refs/heads/topic\n").unwrap();
        lock.commit().unwrap();

        assert!(!dir.path().join("HEAD.lock").exists());
        assert_eq!(fs::read(&target).unwrap(), b"ref: refs/heads/topic\n");
    }

    #[test]
    fn drop_without_commit_keeps_old_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("master");
        fs::write(&target, b"old").unwrap();
        {
            let mut lock = LockFile::acquire(&target).unwrap();
            lock.write_all(b"new").unwrap();
        }
        assert!(!dir.path().join("master.lock").exists());
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn rollback_removes_lock() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("v1");
        let lock = LockFile::acquire(&target).unwrap();
        lock.rollback().unwrap();
        assert!(!dir.path().join("v1.lock").exists());
        assert!(!target.exists());
    }

    #[test]
    fn second_writer_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("master");
        let _held = LockFile::acquire(&target).unwrap();
        match LockFile::acquire(&target) {
            Err(UtilError::Lock(LockError::AlreadyLocked { .. })) => {}
            Err(e) => panic!("expected AlreadyLocked, got {e}"),
            Ok(_) => panic!("expected AlreadyLocked, got a second lock"),
        }
    }

    #[test]
    fn write_locked_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ORIG_HEAD");
        write_locked(&target, b"abc\n").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"abc\n");
    }
}
