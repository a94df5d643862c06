//! The staging index (`.git/index`), read only, plus the ignore rule engine
//! that consults `.gitignore` files staged in it.
//!
//! Only version 2 of the format is understood. Entries are returned in the
//! order they appear on disk; the reader does not re-sort them.

pub mod entry;
pub mod ignore;
mod read;

use std::path::Path;

use bstr::{BStr, ByteSlice};

pub use entry::{EntryKind, IndexEntry, StatData};
pub use error::IndexError;
pub use ignore::{parse_rules, IgnoreRule, IgnoreRules};

mod error {
    #[derive(Debug, thiserror::Error)]
    pub enum IndexError {
        #[error("invalid index header: {0}")]
        InvalidHeader(String),

        #[error("unsupported index version: {0}")]
        UnsupportedVersion(u32),

        #[error("index entry at offset {offset} uses extended flags, which are not supported")]
        ExtendedFlagUnsupported { offset: usize },

        #[error("invalid index entry at offset {offset}: {reason}")]
        InvalidEntry { offset: usize, reason: String },

        #[error("'{0}' is absolute; ignore checks take repository-relative paths")]
        AbsolutePath(String),

        #[error("invalid ignore pattern '{pattern}': {reason}")]
        InvalidIgnorePattern { pattern: String, reason: String },

        #[error(transparent)]
        Io(#[from] std::io::Error),
    }
}

/// Merge stage recorded in an entry's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Normal,
    Base,
    Ours,
    Theirs,
}

impl Stage {
    pub fn as_u8(&self) -> u8 {
        match self {
            Stage::Normal => 0,
            Stage::Base => 1,
            Stage::Ours => 2,
            Stage::Theirs => 3,
        }
    }

    /// Two-bit stage field; every value is valid.
    pub fn from_bits(n: u16) -> Self {
        match n & 0b11 {
            0 => Stage::Normal,
            1 => Stage::Base,
            2 => Stage::Ours,
            _ => Stage::Theirs,
        }
    }
}

/// A parsed index file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    version: u32,
    entries: Vec<IndexEntry>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            version: 2,
            entries: Vec::new(),
        }
    }
}

impl Index {
    /// Read and parse the index file at `path`.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let file = std::fs::File::open(path.as_ref())?;
        if file.metadata()?.len() == 0 {
            return Err(IndexError::InvalidHeader("empty index file".into()));
        }
        // SAFETY: the map is read-only and dropped before returning. Writers
        // replace the index by renaming a new file over it, so the mapped
        // inode is never modified underneath us.
        let data = unsafe { memmap2::Mmap::map(&file) }?;
        let index = Self::parse(&data)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            entries = index.len(),
            "read index"
        );
        Ok(index)
    }

    /// Parse index bytes. Data after the last declared entry (extensions,
    /// trailing checksum) is not examined.
    pub fn parse(data: &[u8]) -> Result<Self, IndexError> {
        read::parse_index(data)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry for `path`, whatever its stage.
    pub fn get(&self, path: &BStr) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.path.as_bstr() == path)
    }
}
