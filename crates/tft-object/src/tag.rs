use bstr::{BStr, BString, ByteSlice};
use tft_hash::ObjectId;
use tft_utils::signature::Signature;

use crate::commit::signature;
use crate::{Kvlm, ObjectError, ObjectKind};

/// An annotated tag: a [`Kvlm`] with `object`, `type`, `tag` and
/// usually `tagger` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
    object: ObjectId,
    target_kind: ObjectKind,
}

impl Tag {
    pub fn new(
        object: ObjectId,
        target_kind: ObjectKind,
        name: impl Into<BString>,
        tagger: Option<&Signature>,
        message: impl Into<BString>,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", object.to_hex());
        kvlm.push("type", target_kind.as_str());
        kvlm.push("tag", name);
        if let Some(tagger) = tagger {
            kvlm.push("tagger", tagger.to_bytes());
        }
        kvlm.set_message(message);
        Self {
            kvlm,
            object,
            target_kind,
        }
    }

    pub fn parse(payload: &[u8]) -> Result<Self, ObjectError> {
        let kvlm = Kvlm::parse(payload)?;
        let object = kvlm
            .get("object")
            .ok_or(missing("object"))?
            .to_str()
            .ok()
            .and_then(|hex| ObjectId::from_hex(hex).ok())
            .ok_or(ObjectError::InvalidField {
                kind: "tag",
                field: "object",
            })?;
        let target_kind = ObjectKind::from_bytes(kvlm.get("type").ok_or(missing("type"))?)?;
        Ok(Self {
            kvlm,
            object,
            target_kind,
        })
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    /// The tagged object.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Kind of the tagged object, as recorded by the tag.
    pub fn target_kind(&self) -> ObjectKind {
        self.target_kind
    }

    pub fn name(&self) -> Option<&BStr> {
        self.kvlm.get("tag")
    }

    pub fn tagger(&self) -> Result<Option<Signature>, ObjectError> {
        signature(&self.kvlm, "tagger")
    }

    pub fn message(&self) -> &BStr {
        self.kvlm.message()
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }
}

fn missing(field: &'static str) -> ObjectError {
    ObjectError::MissingField { kind: "tag", field }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    #[test]
    fn build_and_parse() {
        let tagger = Signature::parse(b"T <t@example.com> 1700000000 +0100".as_bstr()).unwrap();
        let id = ObjectId::from_hex(TARGET).unwrap();
        let tag = Tag::new(id, ObjectKind::Blob, "v1", Some(&tagger), "release\n");
        let parsed = Tag::parse(&tag.serialize()).unwrap();
        assert_eq!(parsed, tag);
        assert_eq!(parsed.object(), id);
        assert_eq!(parsed.target_kind(), ObjectKind::Blob);
        assert_eq!(parsed.name().unwrap(), "v1");
        assert_eq!(parsed.tagger().unwrap(), Some(tagger));
    }

    #[test]
    fn header_order() {
        let id = ObjectId::from_hex(TARGET).unwrap();
        let tag = Tag::new(id, ObjectKind::Commit, "v2", None, "m");
        assert_eq!(
            tag.serialize(),
            format!("object {TARGET}\ntype commit\ntag v2\n\nm").as_bytes()
        );
    }

    #[test]
    fn missing_object_rejected() {
        assert!(matches!(
            Tag::parse(b"type commit\ntag v\n\n"),
            Err(ObjectError::MissingField { field: "object", .. })
        ));
    }

    #[test]
    fn unknown_target_kind_rejected() {
        let raw = format!("object {TARGET}\ntype widget\ntag v\n\n");
        assert!(matches!(
            Tag::parse(raw.as_bytes()),
            Err(ObjectError::UnknownKind(_))
        ));
    }
}
