use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tft_hash::ObjectId;

use crate::error::RefError;
use crate::loose;
use crate::name::RefName;
use crate::Reference;

/// Maximum number of symbolic hops followed before giving up.
pub const MAX_SYMREF_DEPTH: usize = 10;

/// Ref storage backed by loose files in a repository directory.
#[derive(Debug, Clone)]
pub struct FilesRefStore {
    git_dir: PathBuf,
}

impl FilesRefStore {
    pub fn new(git_dir: impl AsRef<Path>) -> Self {
        Self {
            git_dir: git_dir.as_ref().to_path_buf(),
        }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Read a single ref without following it.
    pub fn read(&self, name: &RefName) -> Result<Option<Reference>, RefError> {
        loose::read_loose_ref(&self.git_dir, name)
    }

    /// Follow `name` through symbolic refs to an object id.
    ///
    /// Returns `Ok(None)` when some ref along the chain does not exist, as
    /// with `HEAD` on a branch that has no commits yet. Revisiting a ref or
    /// taking more than [`MAX_SYMREF_DEPTH`] hops is a [`RefError::Cycle`].
    pub fn resolve_to_oid(&self, name: &RefName) -> Result<Option<ObjectId>, RefError> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut current = name.clone();

        loop {
            chain.push(current.to_string());
            if !seen.insert(current.clone()) || chain.len() > MAX_SYMREF_DEPTH + 1 {
                return Err(RefError::Cycle { chain });
            }
            match self.read(&current)? {
                None => {
                    tracing::trace!(name = %current, "ref absent");
                    return Ok(None);
                }
                Some(Reference::Direct { target, .. }) => {
                    tracing::trace!(name = %current, oid = %target, "ref resolved");
                    return Ok(Some(target));
                }
                Some(Reference::Symbolic { target, .. }) => {
                    tracing::trace!(name = %current, target = %target, "following symref");
                    current = target;
                }
            }
        }
    }

    pub fn write_ref(&self, name: &RefName, oid: &ObjectId) -> Result<(), RefError> {
        loose::write_loose_ref(&self.git_dir, name, oid)
    }

    pub fn write_symbolic_ref(&self, name: &RefName, target: &RefName) -> Result<(), RefError> {
        loose::write_symbolic_ref(&self.git_dir, name, target)
    }

    /// All refs under `refs/` whose name starts with `prefix`, sorted by name.
    pub fn iter(&self, prefix: Option<&str>) -> Result<Vec<Reference>, RefError> {
        let mut refs = Vec::new();
        for name in loose::enumerate_loose_refs(&self.git_dir)? {
            if prefix.is_some_and(|p| !name.as_str().starts_with(p)) {
                continue;
            }
            // A ref deleted between listing and reading is simply skipped.
            if let Some(r) = self.read(&name)? {
                refs.push(r);
            }
        }
        Ok(refs)
    }
}
