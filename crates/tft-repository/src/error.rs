use std::path::PathBuf;

use tft_hash::ObjectId;
use tft_object::ObjectKind;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a tft repository (or any of the parent directories): {0}")]
    NotFound(PathBuf),

    #[error("invalid repository directory {path}: {reason}")]
    InvalidGitDir { path: PathBuf, reason: String },

    #[error("{0} already holds a repository")]
    AlreadyExists(PathBuf),

    #[error("unsupported repositoryformatversion {0}")]
    UnsupportedFormatVersion(i64),

    #[error("no object named '{0}'")]
    NameNotFound(String),

    #[error("'{name}' is ambiguous: {}", format_candidates(candidates))]
    AmbiguousReference {
        name: String,
        candidates: Vec<ObjectId>,
    },

    #[error("object {oid} is a {actual}, expected a {expected}")]
    UnexpectedKind {
        oid: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("destination {0} exists and is not an empty directory")]
    DestinationNotEmpty(PathBuf),

    #[error("tree {tree} has an entry with unsafe name {name:?}")]
    InvalidTreeEntry { tree: ObjectId, name: String },

    #[error("tag '{0}' already exists")]
    TagExists(String),

    #[error("identity unknown: set user.name and user.email")]
    MissingIdentity,

    #[error(transparent)]
    Config(#[from] tft_config::ConfigError),

    #[error(transparent)]
    Store(#[from] tft_store::StoreError),

    #[error(transparent)]
    Object(#[from] tft_object::ObjectError),

    #[error(transparent)]
    Ref(#[from] tft_ref::RefError),

    #[error(transparent)]
    Index(#[from] tft_index::IndexError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_candidates(candidates: &[ObjectId]) -> String {
    candidates
        .iter()
        .map(ObjectId::to_hex)
        .collect::<Vec<_>>()
        .join(", ")
}
