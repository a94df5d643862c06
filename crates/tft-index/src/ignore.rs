//! Ignore rules.
//!
//! Rules come in two tiers. *Absolute* rule lists (the user's global
//! excludes file, then `info/exclude`) apply to the whole worktree.
//! *Scoped* rule lists come from `.gitignore` files and apply below the
//! directory holding them. For a given path the nearest scoped list that
//! has an opinion decides; absolute lists are consulted only when no scoped
//! list matched. Within a tier, the last matching rule wins.

use std::collections::BTreeMap;

use bstr::ByteSlice;
use glob::{MatchOptions, Pattern};

use crate::IndexError;

const MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One pattern and its verdict: `include == true` ignores matching paths,
/// `include == false` (a `!pattern` line) un-ignores them.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    raw: String,
    pattern: Pattern,
    include: bool,
    /// Pattern ended in `/` and only matches directories.
    directory_only: bool,
    /// Pattern contained a `/` and matches from the list's directory
    /// instead of against any single path component.
    anchored: bool,
}

impl IgnoreRule {
    /// Compile `pattern` as written in an ignore file, minus any `!`.
    pub fn new(pattern: &str, include: bool) -> Result<Self, IndexError> {
        let directory_only = pattern.len() > 1 && pattern.ends_with('/');
        let body = if directory_only {
            &pattern[..pattern.len() - 1]
        } else {
            pattern
        };
        let anchored = body.contains('/');
        let body = body.strip_prefix('/').unwrap_or(body);

        let compiled = Pattern::new(body).map_err(|e| IndexError::InvalidIgnorePattern {
            pattern: pattern.to_string(),
            reason: e.msg.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            pattern: compiled,
            include,
            directory_only,
            anchored,
        })
    }

    /// Parse one line of an ignore file. Blank lines and `#` comments
    /// yield `None`; a leading `!` negates; a leading `\` escapes a
    /// literal `#` or `!`.
    pub fn parse_line(line: &str) -> Option<Result<Self, IndexError>> {
        let line = line.trim_end_matches(['\r', ' ']);
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (line, include) = match line.strip_prefix('!') {
            Some(rest) => (rest, false),
            None => (line, true),
        };
        let line = match line.strip_prefix('\\') {
            Some(rest) if rest.starts_with('#') || rest.starts_with('!') => rest,
            _ => line,
        };
        if line.is_empty() {
            return None;
        }
        Some(Self::new(line, include))
    }

    pub fn pattern(&self) -> &str {
        &self.raw
    }

    pub fn include(&self) -> bool {
        self.include
    }

    /// Does this rule apply to `rel`, a `/`-separated path relative to the
    /// directory the rule list belongs to?
    fn matches(&self, rel: &str, is_dir: bool) -> bool {
        let components: Vec<&str> = rel.split('/').collect();
        let last = components.len() - 1;
        let dir_ok = |i: usize| !self.directory_only || i < last || is_dir;

        if self.anchored {
            // The pattern names a path; a match on any leading directory
            // also covers everything beneath it.
            let mut prefix = String::with_capacity(rel.len());
            components.iter().enumerate().any(|(i, c)| {
                if i > 0 {
                    prefix.push('/');
                }
                prefix.push_str(c);
                dir_ok(i) && self.pattern.matches_with(&prefix, MATCH)
            })
        } else {
            components
                .iter()
                .enumerate()
                .any(|(i, c)| dir_ok(i) && self.pattern.matches_with(c, MATCH))
        }
    }
}

/// Parse the contents of an ignore file. Lines that fail to compile are
/// skipped with a warning, as git does. Bytes that are not UTF-8 are
/// replaced with U+FFFD, which is also logged.
pub fn parse_rules(content: &[u8]) -> Vec<IgnoreRule> {
    content
        .lines()
        .enumerate()
        .filter_map(|(n, line)| {
            let text = line.to_str_lossy();
            if line.to_str().is_err() {
                tracing::warn!(
                    line = n + 1,
                    pattern = %text,
                    "ignore line is not valid UTF-8"
                );
            }
            IgnoreRule::parse_line(&text)
        })
        .filter_map(|rule| match rule {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::warn!("skipping ignore line: {e}");
                None
            }
        })
        .collect()
}

/// The verdict of the last rule in `rules` matching `rel`, if any.
fn last_match(rules: &[IgnoreRule], rel: &str, is_dir: bool) -> Option<bool> {
    rules
        .iter()
        .rev()
        .find(|rule| rule.matches(rel, is_dir))
        .map(|rule| rule.include)
}

fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// Both tiers of ignore rules for one worktree.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    absolute: Vec<Vec<IgnoreRule>>,
    scoped: BTreeMap<String, Vec<IgnoreRule>>,
}

impl IgnoreRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a worktree-wide rule list. Later lists override earlier ones.
    pub fn add_absolute(&mut self, rules: Vec<IgnoreRule>) {
        self.absolute.push(rules);
    }

    /// Set the rule list for directory `dir` (`""` is the worktree root).
    pub fn add_scoped(&mut self, dir: &str, rules: Vec<IgnoreRule>) {
        let dir = dir.trim_matches('/').to_string();
        self.scoped.entry(dir).or_default().extend(rules);
    }

    pub fn is_empty(&self) -> bool {
        self.absolute.iter().all(Vec::is_empty) && self.scoped.values().all(Vec::is_empty)
    }

    /// Is `path` ignored? A trailing `/` marks the path as a directory.
    pub fn is_ignored(&self, path: &str) -> Result<bool, IndexError> {
        if path.starts_with('/') || std::path::Path::new(path).is_absolute() {
            return Err(IndexError::AbsolutePath(path.to_string()));
        }
        let is_dir = path.ends_with('/');
        let path = path.trim_end_matches('/');
        let path = path.strip_prefix("./").unwrap_or(path);
        if path.is_empty() {
            return Ok(false);
        }

        let mut dir = parent_dir(path);
        loop {
            if let Some(rules) = self.scoped.get(dir) {
                let rel = if dir.is_empty() {
                    path
                } else {
                    &path[dir.len() + 1..]
                };
                if let Some(verdict) = last_match(rules, rel, is_dir) {
                    return Ok(verdict);
                }
            }
            if dir.is_empty() {
                break;
            }
            dir = parent_dir(dir);
        }

        Ok(self
            .absolute
            .iter()
            .filter_map(|rules| last_match(rules, path, is_dir))
            .last()
            .unwrap_or(false))
    }
}
