use std::path::PathBuf;

/// Base error type for tft-utils operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("lock file error: {0}")]
    Lock(#[from] LockError),

    #[error("invalid identity line: {0}")]
    Signature(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lock file specific errors.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("unable to create '{path}': file exists; another writer may be active")]
    AlreadyLocked { path: PathBuf },

    #[error("unable to create lock file '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to rename lock file '{path}' into place: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
