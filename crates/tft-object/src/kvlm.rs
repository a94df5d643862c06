//! Key-value list with message: the encoding shared by commits and tags.
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  <continuation lines start with one space>
//!
//! message text
//! ```

use bstr::{BStr, BString, ByteSlice};

use crate::ObjectError;

/// Ordered multi-map of headers plus the free-form message.
///
/// Keys keep first-seen order and every key holds one or more values in
/// encounter order. Values are stored unfolded: a continuation line is a
/// plain `\n` inside the value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Kvlm {
    headers: Vec<(BString, Vec<BString>)>,
    message: BString,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(raw: &[u8]) -> Result<Self, ObjectError> {
        let mut kvlm = Self::new();
        let mut pos = 0;

        loop {
            let rest = &raw[pos..];
            let space = rest.find_byte(b' ');
            let newline = rest.find_byte(b'\n');

            let header_line = match (space, newline) {
                (Some(s), Some(n)) => s < n,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if !header_line {
                if newline != Some(0) {
                    return Err(ObjectError::MalformedKvlm {
                        offset: pos,
                        reason: "expected a header line or the blank separator line",
                    });
                }
                kvlm.message = BString::from(&rest[1..]);
                return Ok(kvlm);
            }

            let space = space.unwrap_or_default();
            if space == 0 {
                return Err(ObjectError::MalformedKvlm {
                    offset: pos,
                    reason: "empty header key",
                });
            }

            // The value ends at the first newline not followed by a space.
            let mut end = space;
            loop {
                end = match rest[end + 1..].find_byte(b'\n') {
                    Some(n) => end + 1 + n,
                    None => {
                        return Err(ObjectError::MalformedKvlm {
                            offset: pos + space,
                            reason: "unterminated header value",
                        })
                    }
                };
                if rest.get(end + 1) != Some(&b' ') {
                    break;
                }
            }

            let value = rest[space + 1..end].replace("\n ", "\n");
            kvlm.push(&rest[..space], value);
            pos += end + 1;
        }
    }

    /// Encode headers in order, then a blank line, then the message.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, values) in &self.headers {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                out.extend_from_slice(&value.replace("\n", "\n "));
                out.push(b'\n');
            }
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Append a value, after any values already held for `key`.
    pub fn push(&mut self, key: impl AsRef<[u8]>, value: impl Into<BString>) {
        let key = key.as_ref();
        match self.headers.iter_mut().find(|(k, _)| k.as_slice() == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.headers.push((BString::from(key), vec![value.into()])),
        }
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&BStr> {
        self.get_all(key).first().map(|v| v.as_bstr())
    }

    /// All values of `key`, in encounter order.
    pub fn get_all(&self, key: &str) -> &[BString] {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn headers(&self) -> impl Iterator<Item = (&BStr, &[BString])> {
        self.headers
            .iter()
            .map(|(k, v)| (k.as_bstr(), v.as_slice()))
    }

    pub fn message(&self) -> &BStr {
        self.message.as_bstr()
    }

    pub fn set_message(&mut self, message: impl Into<BString>) {
        self.message = message.into();
    }
}
