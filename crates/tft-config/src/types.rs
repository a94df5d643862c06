//! Typed interpretation of config values.

use std::path::PathBuf;

/// Git's boolean spellings. A bare key (`None`) is true and an empty value
/// is false. Returns `None` for anything unrecognized.
pub fn parse_bool(value: Option<&str>) -> Option<bool> {
    let Some(v) = value else { return Some(true) };
    match v.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "off" => Some(false),
        "true" | "yes" | "on" => Some(true),
        other => other.parse::<i64>().ok().map(|n| n != 0),
    }
}

/// Integer with an optional `k`, `m` or `g` (binary) suffix.
pub fn parse_int(value: &str) -> Option<i64> {
    let v = value.trim();
    let (digits, scale) = match v.as_bytes().last()? {
        b'k' | b'K' => (&v[..v.len() - 1], 1 << 10),
        b'm' | b'M' => (&v[..v.len() - 1], 1 << 20),
        b'g' | b'G' => (&v[..v.len() - 1], 1 << 30),
        _ => (v, 1),
    };
    digits.parse::<i64>().ok()?.checked_mul(scale)
}

/// A path value, with a leading `~/` expanded from `$HOME`.
pub fn parse_path(value: &str) -> PathBuf {
    match (value.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(value),
    }
}
