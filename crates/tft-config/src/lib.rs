//! Repository configuration in git's INI dialect.
//!
//! A [`ConfigFile`] is an ordered list of entries. Lookups take dotted keys,
//! `section.key` or `section.subsection.key`, and the last matching entry
//! wins, so merging a more specific file after a more general one gives the
//! usual precedence.

mod error;
pub mod parse;
pub mod types;

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

pub use error::ConfigError;
pub use parse::Entry;

/// A dotted key split into its parts, lowercased where git is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Key {
    section: String,
    subsection: Option<String>,
    name: String,
}

impl Key {
    fn parse(key: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidKey(key.to_string());
        let (section, rest) = key.split_once('.').ok_or_else(invalid)?;
        let (subsection, name) = match rest.rsplit_once('.') {
            Some((sub, name)) => (Some(sub.to_string()), name),
            None => (None, rest),
        };
        if section.is_empty() || name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            section: section.to_ascii_lowercase(),
            subsection,
            name: name.to_ascii_lowercase(),
        })
    }

    fn matches(&self, e: &Entry) -> bool {
        e.section == self.section && e.subsection == self.subsection && e.key == self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    entries: Vec<Entry>,
}

impl ConfigFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// The config `init` writes for a new repository.
    pub fn default_repository() -> Self {
        let mut config = Self::new();
        for (key, value) in [
            ("core.repositoryformatversion", "0"),
            ("core.filemode", "false"),
            ("core.bare", "false"),
        ] {
            config.set(key, value).ok();
        }
        config
    }

    pub fn parse(input: &str, file: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            entries: parse::parse_config(input, file)?,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read(path)?;
        Self::parse(&String::from_utf8_lossy(&text), &path.display().to_string())
    }

    /// Like [`load`](Self::load), but a missing file is an empty config.
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            other => other,
        }
    }

    /// Append `other`'s entries; they take precedence over ours.
    pub fn merge(&mut self, other: ConfigFile) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn last(&self, key: &str) -> Result<Option<&Entry>, ConfigError> {
        let key = Key::parse(key)?;
        Ok(self.entries.iter().rev().find(|e| key.matches(e)))
    }

    /// The last value for `key`. A bare key reads as `"true"`.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self
            .last(key)?
            .map(|e| e.value.clone().unwrap_or_else(|| "true".to_string())))
    }

    pub fn get_all(&self, key: &str) -> Result<Vec<Option<String>>, ConfigError> {
        let key = Key::parse(key)?;
        Ok(self
            .entries
            .iter()
            .filter(|e| key.matches(e))
            .map(|e| e.value.clone())
            .collect())
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        let Some(entry) = self.last(key)? else {
            return Ok(None);
        };
        types::parse_bool(entry.value.as_deref())
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidBool {
                key: key.to_string(),
                value: entry.value.clone().unwrap_or_default(),
            })
    }

    pub fn get_int(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        let Some(entry) = self.last(key)? else {
            return Ok(None);
        };
        let value = entry.value.as_deref().unwrap_or_default();
        types::parse_int(value)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidInt {
                key: key.to_string(),
                value: value.to_string(),
            })
    }

    pub fn get_path(&self, key: &str) -> Result<Option<PathBuf>, ConfigError> {
        Ok(self.get_string(key)?.map(|v| types::parse_path(&v)))
    }

    /// Set `key`, replacing its last occurrence or adding it to the end of
    /// its section.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = Key::parse(key)?;
        if let Some(e) = self.entries.iter_mut().rev().find(|e| key.matches(e)) {
            e.value = Some(value.to_string());
            return Ok(());
        }
        let entry = Entry {
            section: key.section,
            subsection: key.subsection,
            key: key.name,
            value: Some(value.to_string()),
            line: 0,
        };
        let insert_at = self
            .entries
            .iter()
            .rposition(|e| e.section == entry.section && e.subsection == entry.subsection)
            .map_or(self.entries.len(), |i| i + 1);
        self.entries.insert(insert_at, entry);
        Ok(())
    }

    /// Write to `path` through a lock file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        tft_utils::lockfile::write_locked(path, self.to_string().as_bytes())?;
        Ok(())
    }
}

fn quote_value(value: &str) -> String {
    let needs_quotes = value.starts_with([' ', '\t'])
        || value.ends_with([' ', '\t'])
        || value.contains(['#', ';']);
    let mut out = String::with_capacity(value.len() + 2);
    if needs_quotes {
        out.push('"');
    }
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    if needs_quotes {
        out.push('"');
    }
    out
}

/// Serialized in git's layout: a header whenever the section changes, then
/// tab-indented `key = value` lines.
impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current: Option<(&str, Option<&str>)> = None;
        for e in &self.entries {
            let section = (e.section.as_str(), e.subsection.as_deref());
            if current != Some(section) {
                let mut header = format!("[{}", e.section);
                if let Some(sub) = &e.subsection {
                    write!(header, " \"{}\"", sub.replace('\\', "\\\\").replace('"', "\\\""))?;
                }
                writeln!(f, "{header}]")?;
                current = Some(section);
            }
            match &e.value {
                Some(v) => writeln!(f, "\t{} = {}", e.key, quote_value(v))?,
                None => writeln!(f, "\t{}", e.key)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_repository_config_text() {
        assert_eq!(
            ConfigFile::default_repository().to_string(),
            "[core]\n\trepositoryformatversion = 0\n\tfilemode = false\n\tbare = false\n"
        );
    }

    #[test]
    fn lookups_are_case_insensitive_except_subsection() {
        let config =
            ConfigFile::parse("[Core]\nBare = yes\n[branch \"Main\"]\nremote = origin\n", "t").unwrap();
        assert_eq!(config.get_bool("core.bare").unwrap(), Some(true));
        assert_eq!(config.get_bool("CORE.BARE").unwrap(), Some(true));
        assert_eq!(
            config.get_string("branch.Main.remote").unwrap().as_deref(),
            Some("origin")
        );
        assert_eq!(config.get_string("branch.main.remote").unwrap(), None);
    }

    #[test]
    fn last_value_wins_and_merge_overrides() {
        let mut config = ConfigFile::parse("[user]\nname = First\nname = Second\n", "a").unwrap();
        assert_eq!(config.get_string("user.name").unwrap().as_deref(), Some("Second"));
        assert_eq!(config.get_all("user.name").unwrap().len(), 2);

        config.merge(ConfigFile::parse("[user]\nname = Local\n", "b").unwrap());
        assert_eq!(config.get_string("user.name").unwrap().as_deref(), Some("Local"));
    }

    #[test]
    fn typed_getters_report_bad_values() {
        let config = ConfigFile::parse("[core]\nbare = sometimes\nlevel = 9x\n", "t").unwrap();
        assert!(matches!(
            config.get_bool("core.bare"),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            config.get_int("core.level"),
            Err(ConfigError::InvalidInt { .. })
        ));
        assert!(matches!(config.get_string("nodot"), Err(ConfigError::InvalidKey(_))));
    }

    #[test]
    fn set_groups_under_existing_section() {
        let mut config = ConfigFile::parse("[core]\nbare = false\n[user]\nname = x\n", "t").unwrap();
        config.set("core.filemode", "true").unwrap();
        config.set("user.name", "y").unwrap();
        config.set("remote.origin.url", "/tmp/r").unwrap();
        assert_eq!(
            config.to_string(),
            "[core]\n\tbare = false\n\tfilemode = true\n[user]\n\tname = y\n[remote \"origin\"]\n\turl = /tmp/r\n"
        );
    }

    #[test]
    fn awkward_values_survive_a_rewrite() {
        let mut config = ConfigFile::new();
        config.set("a.b", " lead; \"q\" \\ tail ").unwrap();
        let reparsed = ConfigFile::parse(&config.to_string(), "t").unwrap();
        assert_eq!(
            reparsed.get_string("a.b").unwrap().as_deref(),
            Some(" lead; \"q\" \\ tail ")
        );
    }
}
