//! `author`, `committer` and `tagger` identity lines:
//! `Name <email> <unix seconds> <+hhmm>`.

use bstr::{BStr, BString, ByteSlice, ByteVec};
use chrono::{DateTime, FixedOffset, Local};

use crate::error::UtilError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Offset from UTC in minutes.
    pub tz_offset: i32,
}

impl Signature {
    /// An identity stamped with the current local time.
    pub fn now(name: impl Into<BString>, email: impl Into<BString>) -> Self {
        let now = Local::now();
        Self {
            name: name.into(),
            email: email.into(),
            timestamp: now.timestamp(),
            tz_offset: now.offset().local_minus_utc() / 60,
        }
    }

    /// Parse `Name <email> 1234567890 +0100`.
    pub fn parse(input: &BStr) -> Result<Self> {
        let bytes = input.as_bytes();
        let gt = bytes
            .rfind_byte(b'>')
            .ok_or_else(|| UtilError::Signature("missing '>'".into()))?;
        let lt = bytes[..gt]
            .rfind_byte(b'<')
            .ok_or_else(|| UtilError::Signature("missing '<'".into()))?;

        let date = bytes[gt + 1..]
            .trim()
            .to_str()
            .map_err(|_| UtilError::Signature("non UTF-8 date".into()))?;
        let (ts, tz) = date
            .split_once(' ')
            .ok_or_else(|| UtilError::Signature(format!("bad date '{date}'")))?;
        let timestamp = ts
            .parse::<i64>()
            .map_err(|_| UtilError::Signature(format!("bad timestamp '{ts}'")))?;

        Ok(Self {
            name: BString::from(bytes[..lt].trim()),
            email: BString::from(&bytes[lt + 1..gt]),
            timestamp,
            tz_offset: parse_tz(tz)?,
        })
    }

    /// Canonical encoding, as stored in object headers.
    pub fn to_bytes(&self) -> BString {
        let mut out = BString::from(self.name.as_bytes());
        out.push_str(b" <");
        out.push_str(&self.email);
        out.push_str(b"> ");
        out.push_str(format!("{} {}", self.timestamp, format_tz(self.tz_offset)).as_bytes());
        out
    }

    /// The timestamp in the identity's own zone.
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.tz_offset * 60)?;
        DateTime::from_timestamp(self.timestamp, 0).map(|dt| dt.with_timezone(&offset))
    }

    /// `Thu Feb 13 23:31:30 2009 +0000`, the layout `log` prints.
    pub fn format_date(&self) -> String {
        match self.datetime() {
            Some(dt) => dt.format("%a %b %-d %H:%M:%S %Y %z").to_string(),
            None => format!("{} {}", self.timestamp, format_tz(self.tz_offset)),
        }
    }
}

fn parse_tz(tz: &str) -> Result<i32> {
    let bad = || UtilError::Signature(format!("bad timezone '{tz}'"));
    let (sign, digits) = match tz.as_bytes().first() {
        Some(b'+') => (1, &tz[1..]),
        Some(b'-') => (-1, &tz[1..]),
        _ => return Err(bad()),
    };
    if digits.len() != 4 {
        return Err(bad());
    }
    let value: i32 = digits.parse().map_err(|_| bad())?;
    Ok(sign * ((value / 100) * 60 + value % 100))
}

fn format_tz(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let abs = minutes.unsigned_abs();
    format!("{}{:02}{:02}", sign, abs / 60, abs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_identity_line() {
        let sig = Signature::parse(b"Ada Lovelace <ada@example.com> 1234567890 -0130".as_bstr())
            .unwrap();
        assert_eq!(sig.name, "Ada Lovelace");
        assert_eq!(sig.email, "ada@example.com");
        assert_eq!(sig.timestamp, 1234567890);
        assert_eq!(sig.tz_offset, -90);
    }

    #[test]
    fn encoding_is_stable() {
        let line = "Ada Lovelace <ada@example.com> 1234567890 +0000";
        let sig = Signature::parse(line.as_bytes().as_bstr()).unwrap();
        assert_eq!(sig.to_bytes(), line);
    }

    #[test]
    fn log_date_layout() {
        let sig = Signature::parse(b"A <a@b> 1234567890 +0000".as_bstr()).unwrap();
        assert_eq!(sig.format_date(), "Fri Feb 13 23:31:30 2009 +0000");
    }

    #[test]
    fn missing_email_rejected() {
        assert!(Signature::parse(b"nobody 123 +0000".as_bstr()).is_err());
    }

    #[test]
    fn now_roundtrips() {
        let sig = Signature::now("a", "a@example.com");
        let back = Signature::parse(sig.to_bytes().as_bstr()).unwrap();
        assert_eq!(back, sig);
    }
}
