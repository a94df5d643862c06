//! Index file parsing (version 2 only).
//!
//! Entry layout, all integers big-endian:
//!
//! ```text
//!  0 ctime secs   4 ctime nsecs   8 mtime secs  12 mtime nsecs
//! 16 dev         20 ino          24 reserved(2) 26 mode(2)
//! 28 uid         32 gid          36 size        40 object id (20)
//! 60 flags(2)    62 name, NUL, zero padding to a multiple of 8
//! ```

use bstr::{BString, ByteSlice};
use tft_hash::{ObjectId, DIGEST_LEN};

use crate::entry::{EntryKind, IndexEntry, StatData};
use crate::{Index, IndexError, Stage};

const SIGNATURE: &[u8; 4] = b"DIRC";
const HEADER_LEN: usize = 12;
const ENTRY_FIXED_LEN: usize = 62;

const FLAG_ASSUME_VALID: u16 = 0x8000;
const FLAG_EXTENDED: u16 = 0x4000;
const STAGE_SHIFT: u16 = 12;
/// Name lengths this large or larger are stored as the sentinel and the
/// real length is found by scanning for the NUL terminator.
const NAME_LEN_SENTINEL: usize = 0xFFF;

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

pub(crate) fn parse_index(data: &[u8]) -> Result<Index, IndexError> {
    if data.len() < HEADER_LEN {
        return Err(IndexError::InvalidHeader("index file too short".into()));
    }
    if &data[..4] != SIGNATURE {
        return Err(IndexError::InvalidHeader(format!(
            "bad signature {:?}, expected \"DIRC\"",
            data[..4].as_bstr()
        )));
    }
    let version = read_u32(data, 4);
    if version != 2 {
        return Err(IndexError::UnsupportedVersion(version));
    }
    let count = read_u32(data, 8) as usize;

    // Offsets below are relative to the first entry, which is where the
    // 8-byte padding is measured from.
    let content = &data[HEADER_LEN..];
    let mut entries = Vec::with_capacity(count.min(content.len() / ENTRY_FIXED_LEN));
    let mut pos = 0;
    for _ in 0..count {
        let (entry, next) = parse_entry(content, pos)?;
        entries.push(entry);
        pos = next;
    }

    Ok(Index { version, entries })
}

fn parse_entry(content: &[u8], start: usize) -> Result<(IndexEntry, usize), IndexError> {
    let offset = HEADER_LEN + start;
    let invalid = |reason: &str| IndexError::InvalidEntry {
        offset,
        reason: reason.to_string(),
    };

    if start + ENTRY_FIXED_LEN > content.len() {
        return Err(invalid("truncated entry"));
    }
    let e = &content[start..];

    if read_u16(e, 24) != 0 {
        return Err(invalid("reserved mode bits are set"));
    }
    let mode = read_u16(e, 26);
    let kind = EntryKind::from_bits(mode >> 12)
        .ok_or_else(|| invalid(&format!("unsupported entry type {:#06b}", mode >> 12)))?;

    let flags = read_u16(e, 60);
    if flags & FLAG_EXTENDED != 0 {
        return Err(IndexError::ExtendedFlagUnsupported { offset });
    }
    let name_len = usize::from(flags & 0x0FFF);

    let name_start = start + ENTRY_FIXED_LEN;
    let name_end = if name_len < NAME_LEN_SENTINEL {
        let end = name_start + name_len;
        if content.get(end) != Some(&0) {
            return Err(invalid("name is not NUL-terminated"));
        }
        end
    } else {
        let scan_from = name_start + NAME_LEN_SENTINEL;
        content
            .get(scan_from..)
            .and_then(|rest| rest.find_byte(0))
            .map(|n| scan_from + n)
            .ok_or_else(|| invalid("long name is not NUL-terminated"))?
    };

    let entry = IndexEntry {
        path: BString::from(&content[name_start..name_end]),
        oid: ObjectId::from_bytes(&e[40..40 + DIGEST_LEN])
            .map_err(|_| invalid("bad object id"))?,
        kind,
        perms: mode & 0o777,
        stage: Stage::from_bits(flags >> STAGE_SHIFT),
        assume_valid: flags & FLAG_ASSUME_VALID != 0,
        stat: StatData {
            ctime_secs: read_u32(e, 0),
            ctime_nsecs: read_u32(e, 4),
            mtime_secs: read_u32(e, 8),
            mtime_nsecs: read_u32(e, 12),
            dev: read_u32(e, 16),
            ino: read_u32(e, 20),
            uid: read_u32(e, 28),
            gid: read_u32(e, 32),
            size: read_u32(e, 36),
        },
    };

    // Skip the NUL, then pad to the next multiple of 8.
    let next = (name_end + 1).next_multiple_of(8);
    Ok((entry, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(version: u32, count: u32) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&count.to_be_bytes());
        out
    }

    #[test]
    fn empty_index() {
        let index = parse_index(&header(2, 0)).unwrap();
        assert_eq!(index.version(), 2);
        assert!(index.is_empty());
    }

    #[test]
    fn bad_signature() {
        let mut data = header(2, 0);
        data[0] = b'X';
        assert!(matches!(parse_index(&data), Err(IndexError::InvalidHeader(_))));
    }

    #[test]
    fn versions_other_than_two() {
        for v in [1, 3, 4] {
            assert!(matches!(
                parse_index(&header(v, 0)),
                Err(IndexError::UnsupportedVersion(n)) if n == v
            ));
        }
    }

    #[test]
    fn count_larger_than_data() {
        assert!(matches!(
            parse_index(&header(2, 1)),
            Err(IndexError::InvalidEntry { offset: 12, .. })
        ));
    }
}
