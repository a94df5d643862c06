use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::ZlibEncoder;
use tft_hash::hasher::Hasher;
use tft_hash::ObjectId;
use tft_object::{header, Object, ObjectKind};
use tracing::{debug, trace};

use crate::{ObjectStore, StoreError};

impl ObjectStore {
    /// Id of `payload` stored as `kind`, without writing anything.
    pub fn hash_raw(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, StoreError> {
        Ok(Hasher::hash_object(kind.as_str(), payload)?)
    }

    pub fn write(&self, obj: &Object) -> Result<ObjectId, StoreError> {
        self.write_raw(obj.kind(), &obj.serialize_payload())
    }

    /// Store `payload` as `kind` and return its id.
    ///
    /// If the id is already present nothing is written. New objects are
    /// compressed into a temporary file inside `objects/` and linked into
    /// place only if no file exists there yet.
    pub fn write_raw(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, StoreError> {
        let hdr = header::write_header(kind, payload.len());
        let oid = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(payload);
            hasher.finalize()?
        };

        if self.contains(&oid) {
            trace!(%oid, "object already stored");
            return Ok(oid);
        }

        let final_path = self.object_path(&oid);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = tempfile::Builder::new()
            .prefix("tmp_obj_")
            .tempfile_in(&self.objects_dir)?;
        let mut encoder = ZlibEncoder::new(tmp, self.compression);
        encoder.write_all(&hdr)?;
        encoder.write_all(payload)?;
        let tmp = encoder.finish()?;
        tmp.as_file().sync_all()?;
        make_read_only(tmp.path())?;

        match tmp.persist_noclobber(&final_path) {
            Ok(_) => debug!(%oid, %kind, size = payload.len(), "wrote object"),
            // Another writer stored the same id first.
            Err(_) if final_path.is_file() => trace!(%oid, "lost write race"),
            Err(e) => return Err(StoreError::Io(e.error)),
        }
        Ok(oid)
    }
}

#[cfg(unix)]
fn make_read_only(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o444))
}

#[cfg(not(unix))]
fn make_read_only(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms)
}
