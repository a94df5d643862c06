use bstr::{BStr, BString, ByteSlice};
use tft_hash::ObjectId;
use tft_utils::signature::Signature;

use crate::{Kvlm, ObjectError};

/// A commit: a [`Kvlm`] that names a root tree and zero or more parents.
///
/// Unknown headers (`gpgsig`, `mergetag`, `encoding`, ...) are kept in the
/// underlying header list, so a parsed commit re-encodes unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
    tree: ObjectId,
    parents: Vec<ObjectId>,
}

impl Commit {
    pub fn new(
        tree: ObjectId,
        parents: &[ObjectId],
        author: &Signature,
        committer: &Signature,
        message: impl Into<BString>,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("tree", tree.to_hex());
        for parent in parents {
            kvlm.push("parent", parent.to_hex());
        }
        kvlm.push("author", author.to_bytes());
        kvlm.push("committer", committer.to_bytes());
        kvlm.set_message(message);
        Self {
            kvlm,
            tree,
            parents: parents.to_vec(),
        }
    }

    pub fn parse(payload: &[u8]) -> Result<Self, ObjectError> {
        let kvlm = Kvlm::parse(payload)?;
        let tree = kvlm
            .get("tree")
            .ok_or(ObjectError::MissingField {
                kind: "commit",
                field: "tree",
            })
            .and_then(|v| header_oid(v, "tree"))?;
        let parents = kvlm
            .get_all("parent")
            .iter()
            .map(|v| header_oid(v.as_bstr(), "parent"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            kvlm,
            tree,
            parents,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    pub fn tree(&self) -> ObjectId {
        self.tree
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> Result<Option<Signature>, ObjectError> {
        signature(&self.kvlm, "author")
    }

    pub fn committer(&self) -> Result<Option<Signature>, ObjectError> {
        signature(&self.kvlm, "committer")
    }

    pub fn message(&self) -> &BStr {
        self.kvlm.message()
    }

    /// First line of the message.
    pub fn summary(&self) -> &BStr {
        let msg = self.kvlm.message();
        msg.lines().next().unwrap_or_default().as_bstr()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }
}

fn header_oid(value: &BStr, field: &'static str) -> Result<ObjectId, ObjectError> {
    value
        .to_str()
        .ok()
        .and_then(|hex| ObjectId::from_hex(hex).ok())
        .ok_or(ObjectError::InvalidField {
            kind: "commit",
            field,
        })
}

pub(crate) fn signature(kvlm: &Kvlm, key: &str) -> Result<Option<Signature>, ObjectError> {
    kvlm.get(key)
        .map(|v| Signature::parse(v).map_err(|e| ObjectError::InvalidSignature(e.to_string())))
        .transpose()
}
