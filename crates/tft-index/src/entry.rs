//! Index entry types.

use bstr::BString;
use tft_hash::ObjectId;

use crate::Stage;

/// The 4-bit object type stored in the high bits of an entry's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Regular,
    Symlink,
    Gitlink,
}

impl EntryKind {
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0b1000 => Some(Self::Regular),
            0b1010 => Some(Self::Symlink),
            0b1110 => Some(Self::Gitlink),
            _ => None,
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            Self::Regular => 0b1000,
            Self::Symlink => 0b1010,
            Self::Gitlink => 0b1110,
        }
    }
}

/// Filesystem metadata cached for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatData {
    pub ctime_secs: u32,
    pub ctime_nsecs: u32,
    pub mtime_secs: u32,
    pub mtime_nsecs: u32,
    pub dev: u32,
    pub ino: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

/// One staged path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Path relative to the worktree root, `/`-separated.
    pub path: BString,
    pub oid: ObjectId,
    pub kind: EntryKind,
    /// The 9 permission bits, e.g. `0o644`.
    pub perms: u16,
    pub stage: Stage,
    pub assume_valid: bool,
    pub stat: StatData,
}

impl IndexEntry {
    /// The full mode, as `ls-files --stage` prints it.
    pub fn mode(&self) -> u32 {
        (u32::from(self.kind.bits()) << 12) | u32::from(self.perms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_bits_roundtrip() {
        for kind in [EntryKind::Regular, EntryKind::Symlink, EntryKind::Gitlink] {
            assert_eq!(EntryKind::from_bits(kind.bits()), Some(kind));
        }
        assert_eq!(EntryKind::from_bits(0b0100), None);
    }

    #[test]
    fn mode_combines_kind_and_perms() {
        let entry = IndexEntry {
            path: "a".into(),
            oid: ObjectId::NULL,
            kind: EntryKind::Regular,
            perms: 0o755,
            stage: Stage::Normal,
            assume_valid: false,
            stat: StatData::default(),
        };
        assert_eq!(entry.mode(), 0o100755);
    }
}
