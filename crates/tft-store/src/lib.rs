//! Loose object storage.
//!
//! Each object lives at `objects/XX/YYYY...`, where `XX` is the first two
//! hex digits of its id and `YYYY...` the remaining 38. The file holds the
//! zlib-compressed `"<kind> <len>\0<payload>"`. Files are never rewritten:
//! a write of an id that already exists returns without touching disk.

mod enumerate;
mod read;
mod write;

use std::path::{Path, PathBuf};

use tft_hash::ObjectId;

/// Handle on an `objects/` directory.
pub struct ObjectStore {
    objects_dir: PathBuf,
    compression: flate2::Compression,
}

impl ObjectStore {
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression: flate2::Compression::default(),
        }
    }

    /// Set the zlib level (0-9) used for new objects.
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression = flate2::Compression::new(level.min(9));
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Where the object `oid` is, or would be, stored.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        let (dir, file) = oid.loose_parts();
        self.objects_dir.join(dir).join(file)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {0} not found")]
    NotFound(ObjectId),

    #[error("cannot inflate object {oid}: {source}")]
    Decompress {
        oid: ObjectId,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' is not a valid object id prefix")]
    InvalidPrefix(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Object(#[from] tft_object::ObjectError),

    #[error(transparent)]
    Hash(#[from] tft_hash::HashError),
}
