//! Parser for git's INI dialect.
//!
//! ```text
//! [core]
//!     bare = false          ; comment
//!     filemode              # a key with no '=' is boolean true
//! [remote "origin"]
//!     url = "https://example.com/x.git"
//! ```
//!
//! Section and key names are case-insensitive and stored lowercased;
//! subsection names keep their case. Values may be quoted, may use the
//! escapes `\n \t \b \\ \"`, and may continue onto the next line with a
//! trailing backslash.

use crate::error::ConfigError;

const UTF8_BOM: &str = "\u{feff}";

/// One `key = value` line with the section it appeared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub section: String,
    pub subsection: Option<String>,
    pub key: String,
    /// `None` for a bare key, which reads as boolean true.
    pub value: Option<String>,
    pub line: usize,
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    file: &'a str,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.pos += 1;
        }
    }

    fn skip_line(&mut self) {
        while let Some(b) = self.bump() {
            if b == b'\n' {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Parse {
            file: self.file.to_string(),
            line: self.line,
            message: message.into(),
        }
    }

    /// After a header or value: only blanks or a comment may remain.
    fn expect_line_end(&mut self) -> Result<(), ConfigError> {
        self.skip_blanks();
        match self.peek() {
            None | Some(b'\n' | b'#' | b';') => {
                self.skip_line();
                Ok(())
            }
            Some(b) => Err(self.error(format!("unexpected character {:?}", b as char))),
        }
    }
}

/// Parse config text into entries, in file order.
pub fn parse_config(input: &str, file: &str) -> Result<Vec<Entry>, ConfigError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let mut cur = Cursor {
        input: input.as_bytes(),
        pos: 0,
        line: 1,
        file,
    };
    let mut section: Option<(String, Option<String>)> = None;
    let mut entries = Vec::new();

    loop {
        cur.skip_blanks();
        match cur.peek() {
            None => break,
            Some(b'\n' | b'#' | b';') => cur.skip_line(),
            Some(b'[') => {
                cur.bump();
                section = Some(parse_section_header(&mut cur)?);
                cur.expect_line_end()?;
            }
            Some(_) => {
                let Some((name, sub)) = section.clone() else {
                    return Err(cur.error("key outside of any section"));
                };
                let line = cur.line;
                let (key, value) = parse_key_value(&mut cur)?;
                entries.push(Entry {
                    section: name,
                    subsection: sub,
                    key,
                    value,
                    line,
                });
            }
        }
    }

    Ok(entries)
}

fn parse_section_header(cur: &mut Cursor<'_>) -> Result<(String, Option<String>), ConfigError> {
    let start = cur.pos;
    while cur
        .peek()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        cur.pos += 1;
    }
    if cur.pos == start {
        return Err(cur.error("empty section name"));
    }
    let name = String::from_utf8_lossy(&cur.input[start..cur.pos]).to_ascii_lowercase();

    cur.skip_blanks();
    let subsection = if cur.peek() == Some(b'"') {
        cur.bump();
        let mut sub = Vec::new();
        loop {
            match cur.bump() {
                None | Some(b'\n') => return Err(cur.error("unterminated subsection name")),
                Some(b'"') => break,
                Some(b'\\') => match cur.bump() {
                    None | Some(b'\n') => return Err(cur.error("unterminated escape")),
                    Some(b) => sub.push(b),
                },
                Some(b) => sub.push(b),
            }
        }
        cur.skip_blanks();
        Some(String::from_utf8_lossy(&sub).into_owned())
    } else {
        None
    };

    if cur.bump() != Some(b']') {
        return Err(cur.error("expected ']' to close section header"));
    }
    Ok((name, subsection))
}

fn parse_key_value(cur: &mut Cursor<'_>) -> Result<(String, Option<String>), ConfigError> {
    let start = cur.pos;
    while cur
        .peek()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        cur.pos += 1;
    }
    if cur.pos == start || !cur.input[start].is_ascii_alphabetic() {
        return Err(cur.error("invalid key name"));
    }
    let key = String::from_utf8_lossy(&cur.input[start..cur.pos]).to_ascii_lowercase();

    cur.skip_blanks();
    match cur.peek() {
        None | Some(b'\n' | b'#' | b';') => {
            cur.expect_line_end()?;
            return Ok((key, None));
        }
        Some(b'=') => {
            cur.bump();
        }
        Some(b) => return Err(cur.error(format!("expected '=' after key, got {:?}", b as char))),
    }
    cur.skip_blanks();
    let value = parse_value(cur)?;
    Ok((key, Some(value)))
}

fn parse_value(cur: &mut Cursor<'_>) -> Result<String, ConfigError> {
    let mut value = Vec::new();
    let mut in_quote = false;
    // Length of `value` that must survive trailing-whitespace trimming.
    let mut keep = 0;

    loop {
        match cur.peek() {
            None => break,
            Some(b'\n') => {
                if in_quote {
                    return Err(cur.error("newline inside quoted value"));
                }
                cur.bump();
                break;
            }
            Some(b'#' | b';') if !in_quote => {
                cur.skip_line();
                break;
            }
            Some(b'"') => {
                cur.bump();
                in_quote = !in_quote;
                keep = value.len();
            }
            Some(b'\\') => {
                cur.bump();
                let escaped = match cur.bump() {
                    Some(b'\n') => continue,
                    Some(b'\r') if cur.peek() == Some(b'\n') => {
                        cur.bump();
                        continue;
                    }
                    Some(b'n') => b'\n',
                    Some(b't') => b'\t',
                    Some(b'b') => b'\x08',
                    Some(b'\\') => b'\\',
                    Some(b'"') => b'"',
                    Some(b) => return Err(cur.error(format!("invalid escape '\\{}'", b as char))),
                    None => return Err(cur.error("backslash at end of input")),
                };
                value.push(escaped);
                keep = value.len();
            }
            Some(b) => {
                cur.bump();
                if b == b'\r' && !in_quote && cur.peek() == Some(b'\n') {
                    continue;
                }
                value.push(b);
                if in_quote || !matches!(b, b' ' | b'\t') {
                    keep = value.len();
                }
            }
        }
    }
    if in_quote {
        return Err(cur.error("unterminated quoted value"));
    }

    value.truncate(keep);
    Ok(String::from_utf8_lossy(&value).into_owned())
}
