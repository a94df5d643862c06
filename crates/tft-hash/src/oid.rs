use std::fmt;
use std::str::FromStr;

use crate::{hex, HashError};

/// Raw SHA-1 digest length in bytes.
pub const DIGEST_LEN: usize = 20;
/// Length of a full hex object id.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

/// The identity of a stored object: the SHA-1 digest of its canonical
/// `kind SP len NUL payload` encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; DIGEST_LEN]);

impl ObjectId {
    /// The all-zeros id.
    pub const NULL: Self = Self([0u8; DIGEST_LEN]);

    /// Wrap a raw digest.
    pub const fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an id from a raw 20-byte slice, as found in tree and index records.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; DIGEST_LEN] =
            bytes
                .try_into()
                .map_err(|_| HashError::InvalidDigestLength {
                    expected: DIGEST_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Parse a full 40-character hex id.
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_into(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Abbreviated hex form of at most `len` characters.
    pub fn to_short_hex(&self, len: usize) -> String {
        let mut s = self.to_hex();
        s.truncate(len.min(HEX_LEN));
        s
    }

    /// True if the hex form starts with `prefix`, compared case-insensitively.
    pub fn starts_with_hex(&self, prefix: &str) -> bool {
        prefix.len() <= HEX_LEN
            && self
                .to_hex()
                .as_bytes()
                .iter()
                .zip(prefix.bytes())
                .all(|(a, b)| *a == b.to_ascii_lowercase())
    }

    /// Fan-out directory and file name of the loose object: `("ce", "0136...")`.
    pub fn loose_parts(&self) -> (String, String) {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        (dir.to_string(), file.to_string())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_short_hex(8))
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    #[test]
    fn display_parse_roundtrip() {
        let oid: ObjectId = HELLO.parse().unwrap();
        assert_eq!(oid.to_string(), HELLO);
    }

    #[test]
    fn debug_is_abbreviated() {
        let oid = ObjectId::from_hex(HELLO).unwrap();
        assert_eq!(format!("{oid:?}"), "ObjectId(ce013625)");
    }

    #[test]
    fn uppercase_hex_accepted() {
        let lower = ObjectId::from_hex(HELLO).unwrap();
        let upper = ObjectId::from_hex(&HELLO.to_uppercase()).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn short_hex_rejected() {
        assert!(matches!(
            ObjectId::from_hex("ce0136"),
            Err(HashError::InvalidHexLength { expected: 40, actual: 6 })
        ));
    }

    #[test]
    fn from_bytes_checks_length() {
        assert!(ObjectId::from_bytes(&[0u8; 19]).is_err());
        assert!(ObjectId::from_bytes(&[0u8; 20]).unwrap().is_null());
    }

    #[test]
    fn prefix_matching() {
        let oid = ObjectId::from_hex(HELLO).unwrap();
        assert!(oid.starts_with_hex("ce01"));
        assert!(oid.starts_with_hex("CE01"));
        assert!(oid.starts_with_hex(HELLO));
        assert!(!oid.starts_with_hex("ce02"));
    }

    #[test]
    fn loose_parts_split_after_two() {
        let oid = ObjectId::from_hex(HELLO).unwrap();
        let (dir, file) = oid.loose_parts();
        assert_eq!(dir, "ce");
        assert_eq!(file, &HELLO[2..]);
    }

    #[test]
    fn ordering_is_bytewise() {
        let a = ObjectId::from_hex("0000000000000000000000000000000000000001").unwrap();
        let b = ObjectId::from_hex("0000000000000000000000000000000000000002").unwrap();
        assert!(a < b);
    }
}
