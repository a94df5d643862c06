use crate::{ObjectError, ObjectKind};

/// Split a framed object `"<kind> <len>\0<payload>"`.
///
/// Returns `(kind, declared_len, header_len)`; `header_len` counts the NUL.
/// The declared length must equal the number of bytes after the NUL.
pub fn parse_header(data: &[u8]) -> Result<(ObjectKind, usize, usize), ObjectError> {
    let space = data
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ObjectError::InvalidHeader("missing space after kind".into()))?;
    let nul = data[space + 1..]
        .iter()
        .position(|&b| b == 0)
        .map(|p| p + space + 1)
        .ok_or_else(|| ObjectError::InvalidHeader("missing NUL after length".into()))?;

    let len_field = std::str::from_utf8(&data[space + 1..nul])
        .map_err(|_| ObjectError::InvalidHeader("non-ASCII length".into()))?;
    let declared: usize = len_field
        .parse()
        .map_err(|_| ObjectError::InvalidHeader(format!("invalid length '{len_field}'")))?;

    let actual = data.len() - nul - 1;
    if declared != actual {
        return Err(ObjectError::MalformedObject { declared, actual });
    }

    let kind = ObjectKind::from_bytes(&data[..space])?;
    Ok((kind, declared, nul + 1))
}

/// Build the `"<kind> <len>\0"` prefix.
pub fn write_header(kind: ObjectKind, payload_len: usize) -> Vec<u8> {
    format!("{} {}\0", kind, payload_len).into_bytes()
}
