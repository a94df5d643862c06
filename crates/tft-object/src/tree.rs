use std::cmp::Ordering;
use std::fmt;

use bstr::{BStr, BString, ByteSlice};
use tft_hash::{ObjectId, DIGEST_LEN};

use crate::ObjectError;

const TYPE_MASK: u32 = 0o170000;
const TYPE_TREE: u32 = 0o040000;
const TYPE_FILE: u32 = 0o100000;
const TYPE_SYMLINK: u32 = 0o120000;
const TYPE_GITLINK: u32 = 0o160000;

/// The mode of a tree entry, kept as the 5 or 6 octal digits it was
/// stored with so that a parsed tree re-encodes byte for byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeMode {
    digits: [u8; 6],
    len: u8,
}

impl TreeMode {
    pub const TREE: Self = Self::from_digits(b"40000");
    pub const FILE: Self = Self::from_digits(b"100644");
    pub const EXECUTABLE: Self = Self::from_digits(b"100755");
    pub const SYMLINK: Self = Self::from_digits(b"120000");
    pub const GITLINK: Self = Self::from_digits(b"160000");

    const fn from_digits(d: &[u8]) -> Self {
        let mut digits = [0u8; 6];
        let mut i = 0;
        while i < d.len() {
            digits[i] = d[i];
            i += 1;
        }
        Self {
            digits,
            len: d.len() as u8,
        }
    }

    /// Accept exactly 5 or 6 ASCII octal digits.
    pub fn parse(s: &[u8]) -> Option<Self> {
        if !(5..=6).contains(&s.len()) || !s.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return None;
        }
        Some(Self::from_digits(s))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.digits[..self.len as usize]
    }

    /// Numeric value of the octal digits.
    pub fn value(&self) -> u32 {
        self.as_bytes()
            .iter()
            .fold(0, |acc, d| acc * 8 + u32::from(d - b'0'))
    }

    pub fn is_tree(&self) -> bool {
        self.value() & TYPE_MASK == TYPE_TREE
    }

    /// Regular or executable file.
    pub fn is_file(&self) -> bool {
        self.value() & TYPE_MASK == TYPE_FILE
    }

    pub fn is_executable(&self) -> bool {
        self.is_file() && self.value() & 0o111 != 0
    }

    pub fn is_symlink(&self) -> bool {
        self.value() & TYPE_MASK == TYPE_SYMLINK
    }

    pub fn is_gitlink(&self) -> bool {
        self.value() & TYPE_MASK == TYPE_GITLINK
    }
}

impl fmt::Display for TreeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ls-tree pads directory modes to six digits.
        write!(f, "{:06o}", self.value())
    }
}

impl fmt::Debug for TreeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TreeMode({})", self.as_bytes().as_bstr())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: TreeMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: TreeMode, name: impl Into<BString>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }

    /// Bytes the entry sorts by: its name, plus a trailing `/` for
    /// directories, so that `foo.c` sorts before the directory `foo`.
    fn sort_key(&self) -> impl Iterator<Item = u8> + '_ {
        self.name
            .iter()
            .copied()
            .chain(self.mode.is_tree().then_some(b'/'))
    }

    pub fn cmp_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
        a.sort_key().cmp(b.sort_key())
    }
}

/// A directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Decode repeated `mode SP name NUL <20-byte id>` records.
    pub fn parse(payload: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < payload.len() {
            let rest = &payload[pos..];
            let space = rest
                .find_byte(b' ')
                .ok_or_else(|| bad_entry(pos, "missing space after mode"))?;
            let mode = TreeMode::parse(&rest[..space]).ok_or_else(|| {
                bad_entry(pos, format!("bad mode '{}'", rest[..space].as_bstr()))
            })?;

            let name_start = space + 1;
            let nul = rest[name_start..]
                .find_byte(0)
                .map(|p| p + name_start)
                .ok_or_else(|| bad_entry(pos + name_start, "missing NUL after name"))?;
            let id_end = nul + 1 + DIGEST_LEN;
            if id_end > rest.len() {
                return Err(bad_entry(pos + nul + 1, "truncated object id"));
            }

            entries.push(TreeEntry {
                mode,
                name: BString::from(&rest[name_start..nul]),
                oid: ObjectId::from_bytes(&rest[nul + 1..id_end])?,
            });
            pos += id_end;
        }

        Ok(Self { entries })
    }

    /// Encode entries in tree order, whatever order they are held in.
    pub fn serialize(&self) -> Vec<u8> {
        let mut sorted: Vec<&TreeEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| TreeEntry::cmp_entries(a, b));

        let mut out = Vec::with_capacity(self.entries.len() * (DIGEST_LEN + 16));
        for entry in sorted {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    pub fn sort(&mut self) {
        self.entries.sort_by(TreeEntry::cmp_entries);
    }

    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn bad_entry(offset: usize, reason: impl Into<String>) -> ObjectError {
    ObjectError::InvalidTreeEntry {
        offset,
        reason: reason.into(),
    }
}
