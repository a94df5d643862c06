//! Lowercase hex codec for digests and digest prefixes.

use crate::HashError;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Encode `bytes` as a lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decode `hex` into `buf`, which must be exactly half its length.
///
/// Upper- and lowercase digits are both accepted.
pub fn decode_into(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let raw = hex.as_bytes();
    if raw.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: raw.len(),
        });
    }
    for (i, pair) in raw.chunks_exact(2).enumerate() {
        let hi = nibble(pair[0]).ok_or(HashError::InvalidHex {
            position: i * 2,
            character: pair[0] as char,
        })?;
        let lo = nibble(pair[1]).ok_or(HashError::InvalidHex {
            position: i * 2 + 1,
            character: pair[1] as char,
        })?;
        buf[i] = (hi << 4) | lo;
    }
    Ok(())
}

/// True if every character of `s` is a hex digit. Odd lengths are allowed,
/// since abbreviated ids are frequently odd.
pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| nibble(b).is_some())
}
