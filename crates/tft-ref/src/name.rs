use std::fmt;

use crate::error::RefError;

/// A validated reference name such as `HEAD` or `refs/heads/main`.
///
/// Validation follows `git check-ref-format`, which among other things
/// guarantees that the name, used as a relative path, stays inside the
/// repository directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefName(String);

const FORBIDDEN_CHARS: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

impl RefName {
    pub fn new(name: impl Into<String>) -> Result<Self, RefError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// `refs/heads/<branch>`.
    pub fn branch(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/heads/{short}"))
    }

    /// `refs/tags/<tag>`.
    pub fn tag(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/tags/{short}"))
    }

    pub fn head() -> Self {
        Self("HEAD".to_string())
    }

    /// The name without its `refs/heads/` or `refs/tags/` prefix.
    pub fn short_name(&self) -> &str {
        self.0
            .strip_prefix("refs/heads/")
            .or_else(|| self.0.strip_prefix("refs/tags/"))
            .unwrap_or(&self.0)
    }

    pub fn is_branch(&self) -> bool {
        self.0.starts_with("refs/heads/")
    }

    pub fn is_tag(&self) -> bool {
        self.0.starts_with("refs/tags/")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate(name: &str) -> Result<(), RefError> {
    let reject = |why: &str| Err(RefError::InvalidName(format!("'{name}': {why}")));

    if name.is_empty() {
        return Err(RefError::InvalidName("ref name is empty".into()));
    }
    if name == "@" {
        return reject("'@' alone is reserved");
    }
    if let Some(c) = name.chars().find(|c| c.is_ascii_control()) {
        return reject(&format!("contains control character {:?}", c));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return reject(&format!("contains forbidden character '{c}'"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return reject("leading or trailing '/'");
    }
    if name.ends_with('.') {
        return reject("ends with '.'");
    }
    for bad in ["..", "//", "@{"] {
        if name.contains(bad) {
            return reject(&format!("contains '{bad}'"));
        }
    }
    for component in name.split('/') {
        if component.starts_with('.') {
            return reject("component starts with '.'");
        }
        if component.ends_with(".lock") {
            return reject("component ends with '.lock'");
        }
    }
    Ok(())
}
