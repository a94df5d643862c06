use crate::{HashError, ObjectId, DIGEST_LEN};

/// Streaming SHA-1 with collision detection.
///
/// Feed data with [`update`](Hasher::update) or through [`std::io::Write`],
/// then call [`finalize`](Hasher::finalize) to obtain the [`ObjectId`].
pub struct Hasher {
    inner: Box<sha1_checked::Sha1>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    pub fn new() -> Self {
        use digest::Digest;
        Self {
            inner: Box::new(sha1_checked::Sha1::new()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        use digest::Digest;
        self.inner.update(data);
    }

    /// Finish hashing. Fails if the collision detector fires.
    pub fn finalize(self) -> Result<ObjectId, HashError> {
        let result = self.inner.try_finalize();
        if result.has_collision() {
            return Err(HashError::Sha1Collision);
        }
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(result.hash().as_slice());
        Ok(ObjectId::new(bytes))
    }

    /// Hash a byte string in one call.
    pub fn digest(data: &[u8]) -> Result<ObjectId, HashError> {
        let mut h = Self::new();
        h.update(data);
        h.finalize()
    }

    /// Id of an object: the digest of `"{kind} {len}\0{payload}"`.
    pub fn hash_object(kind: &str, payload: &[u8]) -> Result<ObjectId, HashError> {
        let mut h = Self::new();
        h.update(format!("{} {}\0", kind, payload.len()).as_bytes());
        h.update(payload);
        h.finalize()
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
