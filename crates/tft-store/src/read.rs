use std::fs;
use std::io::{self, Read};

use flate2::read::ZlibDecoder;
use tft_hash::ObjectId;
use tft_object::{header, Object, ObjectKind};

use crate::{ObjectStore, StoreError};

impl ObjectStore {
    /// Read and decode the object `oid`.
    pub fn read(&self, oid: &ObjectId) -> Result<Object, StoreError> {
        let (kind, payload) = self.read_raw(oid)?;
        Ok(Object::parse(kind, &payload)?)
    }

    /// Read the object `oid` and return its kind and undecoded payload.
    ///
    /// The declared length must match the payload exactly and the kind
    /// must be one of the four known kinds.
    pub fn read_raw(&self, oid: &ObjectId) -> Result<(ObjectKind, Vec<u8>), StoreError> {
        let compressed = match fs::read(self.object_path(oid)) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*oid))
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut inflated = Vec::with_capacity(compressed.len() * 2);
        ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut inflated)
            .map_err(|source| StoreError::Decompress { oid: *oid, source })?;

        let (kind, _, header_len) = header::parse_header(&inflated)?;
        inflated.drain(..header_len);
        Ok((kind, inflated))
    }
}
