//! Turning user-supplied names into object ids.

use tft_hash::{hex, ObjectId, HEX_LEN};
use tft_object::{Object, ObjectKind};
use tft_ref::RefName;

use crate::{RepoError, Repository};

/// Shortest abbreviated id accepted by name resolution.
pub const MIN_SHORT_HEX: usize = 4;

impl Repository {
    /// Every object `name` could refer to.
    ///
    /// `HEAD` resolves through the ref store alone. Otherwise a 4 to 40
    /// digit hex string contributes all stored ids it prefixes, and
    /// `refs/tags/<name>` and `refs/heads/<name>` (or `name` itself when it
    /// already starts with `refs/`) contribute their targets. The result
    /// holds each id once, in discovery order.
    pub fn resolve_name(&self, name: &str) -> Result<Vec<ObjectId>, RepoError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepoError::NameNotFound(name.to_string()));
        }
        if name == "HEAD" {
            return Ok(self
                .refs
                .resolve_to_oid(&RefName::head())?
                .into_iter()
                .collect());
        }

        let mut candidates = Vec::new();
        if (MIN_SHORT_HEX..=HEX_LEN).contains(&name.len()) && hex::is_hex(name) {
            candidates.extend(self.objects.find_by_prefix(name)?);
        }

        let ref_names = if name.starts_with("refs/") {
            vec![name.to_string()]
        } else {
            vec![format!("refs/tags/{name}"), format!("refs/heads/{name}")]
        };
        for full in ref_names {
            // A name that cannot be a ref simply contributes nothing.
            let Ok(ref_name) = RefName::new(full) else {
                continue;
            };
            if let Some(oid) = self.refs.resolve_to_oid(&ref_name)? {
                candidates.push(oid);
            }
        }

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|oid| seen.insert(*oid));
        tracing::trace!(name, candidates = candidates.len(), "resolved name");
        Ok(candidates)
    }

    /// Resolve `name` to exactly one object, then peel it towards `want`.
    ///
    /// With `want == None` the resolved object is returned as is. Otherwise,
    /// while the object is not of kind `want`: a tag is replaced by the
    /// object it tags, and a commit by its tree when a tree is wanted
    /// (only when `follow` is set). Anything else yields `Ok(None)`.
    pub fn resolve_object(
        &self,
        name: &str,
        want: Option<ObjectKind>,
        follow: bool,
    ) -> Result<Option<ObjectId>, RepoError> {
        let oid = self.resolve_unique(name)?;
        let Some(want) = want else {
            return Ok(Some(oid));
        };
        match self.peel(oid, want, follow)? {
            Peeled::Found(oid) => Ok(Some(oid)),
            Peeled::Stuck { .. } => Ok(None),
        }
    }

    /// [`resolve_object`](Self::resolve_object) for callers that need a
    /// result. A name that does not peel to `want` is an `UnexpectedKind`
    /// naming the object where peeling stopped.
    pub fn resolve_to(&self, name: &str, want: ObjectKind) -> Result<ObjectId, RepoError> {
        let oid = self.resolve_unique(name)?;
        match self.peel(oid, want, true)? {
            Peeled::Found(oid) => Ok(oid),
            Peeled::Stuck { oid, kind } => Err(RepoError::UnexpectedKind {
                oid,
                expected: want,
                actual: kind,
            }),
        }
    }

    fn resolve_unique(&self, name: &str) -> Result<ObjectId, RepoError> {
        let mut candidates = self.resolve_name(name)?;
        match candidates.len() {
            0 => Err(RepoError::NameNotFound(name.to_string())),
            1 => Ok(candidates.remove(0)),
            _ => Err(RepoError::AmbiguousReference {
                name: name.to_string(),
                candidates,
            }),
        }
    }

    fn peel(
        &self,
        mut oid: ObjectId,
        want: ObjectKind,
        follow: bool,
    ) -> Result<Peeled, RepoError> {
        loop {
            let object = self.objects.read(&oid)?;
            if object.kind() == want {
                return Ok(Peeled::Found(oid));
            }
            let kind = object.kind();
            oid = match object {
                Object::Tag(tag) if follow => tag.object(),
                Object::Commit(commit) if follow && want == ObjectKind::Tree => commit.tree(),
                _ => return Ok(Peeled::Stuck { oid, kind }),
            };
        }
    }
}

/// Where peeling towards a wanted kind ended.
enum Peeled {
    Found(ObjectId),
    Stuck { oid: ObjectId, kind: ObjectKind },
}
