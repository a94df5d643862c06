//! References: named pointers into the object graph.
//!
//! Refs live as loose files under the repository directory (`HEAD`,
//! `refs/heads/*`, `refs/tags/*`). A file holds either a 40-digit hex id or
//! `ref: <other ref>`. [`FilesRefStore`] reads, writes, lists and resolves
//! them; symbolic chains are chased iteratively with a hop bound so a cycle
//! is reported instead of looping.

mod error;
mod loose;
mod name;
mod store;

use tft_hash::ObjectId;

pub use error::RefError;
pub use name::RefName;
pub use store::{FilesRefStore, MAX_SYMREF_DEPTH};

/// A reference, either direct (holds an id) or symbolic (names another ref).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Direct { name: RefName, target: ObjectId },
    Symbolic { name: RefName, target: RefName },
}

impl Reference {
    pub fn name(&self) -> &RefName {
        match self {
            Reference::Direct { name, .. } | Reference::Symbolic { name, .. } => name,
        }
    }

    /// The id, if this is a direct ref.
    pub fn target_oid(&self) -> Option<ObjectId> {
        match self {
            Reference::Direct { target, .. } => Some(*target),
            Reference::Symbolic { .. } => None,
        }
    }
}
