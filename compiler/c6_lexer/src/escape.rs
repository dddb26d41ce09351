//! String literal escapes.

use std::borrow::Cow;

/// Bytes allowed after a backslash.
pub(crate) fn is_valid_escape(c: u8) -> bool {
    matches!(c, b'a' | b'b' | b'r' | b'n' | b't' | b'v' | b'\\' | b'"' | b'\'' | b'0')
}

fn cook(c: char) -> Option<char> {
    Some(match c {
        'a' => '\x07',
        'b' => '\x08',
        'r' => '\r',
        'n' => '\n',
        't' => '\t',
        'v' => '\x0B',
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        '0' => '\0',
        _ => return None,
    })
}

/// Invalid escape found while cooking a literal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown escape sequence `\\{found}` at byte {offset}")]
pub struct EscapeError {
    /// Byte offset of the backslash within the literal contents.
    pub offset: usize,
    pub found: char,
}

/// Replace escape sequences in string literal contents (quotes excluded).
///
/// Borrows when the contents contain no backslash.
pub fn unescape(raw: &str) -> Result<Cow<'_, str>, EscapeError> {
    if memchr::memchr(b'\\', raw.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(raw));
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, found)) = chars.next() else {
            return Err(EscapeError { offset, found: '\\' });
        };
        out.push(cook(found).ok_or(EscapeError { offset, found })?);
    }
    Ok(Cow::Owned(out))
}
