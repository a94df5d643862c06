use tft_hash::ObjectId;
use tft_object::{Object, Tag};
use tft_ref::RefName;
use tft_utils::signature::Signature;

use crate::{RepoError, Repository};

impl Repository {
    /// `user.name` and `user.email`, stamped with the current time.
    pub fn identity(&self) -> Result<Signature, RepoError> {
        match (
            self.config.get_string("user.name")?,
            self.config.get_string("user.email")?,
        ) {
            (Some(name), Some(email)) => Ok(Signature::now(name, email)),
            _ => Err(RepoError::MissingIdentity),
        }
    }

    /// Create `refs/tags/<name>` pointing at whatever `target` resolves to.
    ///
    /// Without a message the tag is lightweight: the ref points straight at
    /// the target. With one, an annotated tag object is written first and the
    /// ref points at it. Returns the id the ref now holds.
    pub fn create_tag(
        &self,
        name: &str,
        target: &str,
        message: Option<&str>,
    ) -> Result<ObjectId, RepoError> {
        let ref_name = RefName::tag(name)?;
        if self.refs.read(&ref_name)?.is_some() {
            return Err(RepoError::TagExists(name.to_string()));
        }
        let target = self
            .resolve_object(target, None, false)?
            .ok_or_else(|| RepoError::NameNotFound(target.to_string()))?;

        let pointee = match message {
            None => target,
            Some(message) => {
                let (kind, _) = self.objects.read_raw(&target)?;
                let tagger = self.identity()?;
                let mut message = message.to_string();
                if !message.ends_with('\n') {
                    message.push('\n');
                }
                let tag = Tag::new(target, kind, name, Some(&tagger), message);
                self.write_object(&Object::Tag(tag))?
            }
        };

        self.refs.write_ref(&ref_name, &pointee)?;
        tracing::debug!(tag = name, oid = %pointee, annotated = message.is_some(), "created tag");
        Ok(pointee)
    }
}
