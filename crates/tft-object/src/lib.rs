//! Object model for the tft object store.
//!
//! Four object kinds exist. Blobs are opaque bytes, trees are sorted
//! directory listings, and commits and tags share the header-block-plus-
//! message encoding implemented by [`Kvlm`]. [`Object`] is the closed union
//! over all four, and every payload codec here is a loop over a cursor.

mod blob;
mod commit;
pub mod header;
mod kvlm;
mod tag;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use kvlm::Kvlm;
pub use tag::Tag;
pub use tree::{Tree, TreeEntry, TreeMode};

use bstr::BString;
use tft_hash::hasher::Hasher;
use tft_hash::{HashError, ObjectId};

/// Errors produced while decoding or encoding objects.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("unknown object kind '{0}'")]
    UnknownKind(BString),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("malformed object: header declares {declared} bytes, found {actual}")]
    MalformedObject { declared: usize, actual: usize },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("malformed header block at offset {offset}: {reason}")]
    MalformedKvlm { offset: usize, reason: &'static str },

    #[error("invalid {kind}: missing '{field}' header")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("invalid {kind}: bad '{field}' header")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("invalid identity line: {0}")]
    InvalidSignature(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The four object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    /// Parse the kind token of an object header.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            b"tag" => Ok(Self::Tag),
            _ => Err(ObjectError::UnknownKind(BString::from(s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Decode a payload whose kind is already known.
    pub fn parse(kind: ObjectKind, payload: &[u8]) -> Result<Self, ObjectError> {
        Ok(match kind {
            ObjectKind::Blob => Self::Blob(Blob::parse(payload)),
            ObjectKind::Tree => Self::Tree(Tree::parse(payload)?),
            ObjectKind::Commit => Self::Commit(Commit::parse(payload)?),
            ObjectKind::Tag => Self::Tag(Tag::parse(payload)?),
        })
    }

    /// Decode a framed object (`kind SP len NUL payload`).
    pub fn parse_framed(data: &[u8]) -> Result<Self, ObjectError> {
        let (kind, _, header_len) = header::parse_header(data)?;
        Self::parse(kind, &data[header_len..])
    }

    /// Encode the payload, without the header.
    pub fn serialize_payload(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.serialize().to_vec(),
            Self::Tree(t) => t.serialize(),
            Self::Commit(c) => c.serialize(),
            Self::Tag(t) => t.serialize(),
        }
    }

    /// Encode header and payload.
    pub fn serialize_framed(&self) -> Vec<u8> {
        let payload = self.serialize_payload();
        let mut out = header::write_header(self.kind(), payload.len());
        out.extend_from_slice(&payload);
        out
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
            Self::Tag(_) => ObjectKind::Tag,
        }
    }

    /// The id this object is stored under.
    pub fn id(&self) -> Result<ObjectId, HashError> {
        Hasher::hash_object(self.kind().as_str(), &self.serialize_payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tokens() {
        for kind in [
            ObjectKind::Blob,
            ObjectKind::Tree,
            ObjectKind::Commit,
            ObjectKind::Tag,
        ] {
            assert_eq!(ObjectKind::from_bytes(kind.as_str().as_bytes()).unwrap(), kind);
        }
        assert!(matches!(
            "blobs".parse::<ObjectKind>(),
            Err(ObjectError::UnknownKind(_))
        ));
    }

    #[test]
    fn blob_id() {
        let blob = Object::Blob(Blob::new(&b"hello\n"[..]));
        assert_eq!(
            blob.id().unwrap().to_hex(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
    }

    #[test]
    fn empty_tree_id() {
        assert_eq!(
            Object::Tree(Tree::default()).id().unwrap().to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn framed_roundtrip() {
        let blob = Object::Blob(Blob::new(&b"abc"[..]));
        let framed = blob.serialize_framed();
        assert_eq!(framed, b"blob 3\0abc");
        assert_eq!(Object::parse_framed(&framed).unwrap(), blob);
    }
}
