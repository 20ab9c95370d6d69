//! Dotted field path utilities for document data.
//!
//! A field path addresses a value nested inside a document, e.g. `b.d.e`.
//! Segments that are not plain identifiers are wrapped in backticks
//! (`` `first.name`.given ``) and array elements may be addressed with a
//! bracket suffix (`b.d.e[0]`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldPathError {
    #[error("field path must not be empty")]
    Empty,
    #[error("empty segment at byte {0}")]
    EmptySegment(usize),
    #[error("unterminated backtick quote")]
    UnterminatedQuote,
    #[error("invalid array index `{0}`")]
    InvalidIndex(String),
}

/// One step of a parsed field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for FieldPathSegment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for FieldPathSegment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for FieldPathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// Returns `true` when `segment` can be written without backtick quoting.
pub fn is_simple_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escapes one key segment, quoting it when needed.
pub fn escape_segment(segment: &str) -> String {
    if is_simple_segment(segment) {
        return segment.to_string();
    }
    let mut out = String::with_capacity(segment.len() + 2);
    out.push('`');
    for ch in segment.chars() {
        if matches!(ch, '`' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('`');
    out
}

/// Parse a dotted field path into segments.
///
/// Examples:
/// - `"a" -> [Key("a")]`
/// - `"b.d.e[0]" -> [Key("b"), Key("d"), Key("e"), Index(0)]`
/// - `` "`a.b`.c" -> [Key("a.b"), Key("c")] ``
pub fn parse_field_path(path: &str) -> Result<Vec<FieldPathSegment>, FieldPathError> {
    if path.is_empty() {
        return Err(FieldPathError::Empty);
    }
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;

    loop {
        let start = pos;
        let key = if bytes.get(pos) == Some(&b'`') {
            let (key, next) = read_quoted(path, pos + 1)?;
            pos = next;
            key
        } else {
            while pos < bytes.len() && !matches!(bytes[pos], b'.' | b'[') {
                pos += 1;
            }
            path[start..pos].to_string()
        };
        if key.is_empty() && bytes.get(start) != Some(&b'`') {
            return Err(FieldPathError::EmptySegment(start));
        }
        segments.push(FieldPathSegment::Key(key));

        while bytes.get(pos) == Some(&b'[') {
            let close = path[pos..]
                .find(']')
                .map(|i| pos + i)
                .ok_or_else(|| FieldPathError::InvalidIndex(path[pos..].to_string()))?;
            let raw = &path[pos + 1..close];
            let index = raw
                .parse::<usize>()
                .map_err(|_| FieldPathError::InvalidIndex(raw.to_string()))?;
            segments.push(FieldPathSegment::Index(index));
            pos = close + 1;
        }

        match bytes.get(pos) {
            None => break,
            Some(b'.') => {
                pos += 1;
                if pos == bytes.len() {
                    return Err(FieldPathError::EmptySegment(pos));
                }
            }
            Some(_) => return Err(FieldPathError::EmptySegment(pos)),
        }
    }

    Ok(segments)
}

fn read_quoted(path: &str, pos: usize) -> Result<(String, usize), FieldPathError> {
    let mut out = String::new();
    let mut chars = path[pos..].char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '`' => return Ok((out, pos + i + 1)),
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            _ => out.push(ch),
        }
    }
    Err(FieldPathError::UnterminatedQuote)
}

/// Format segments back into a dotted field path.
pub fn format_field_path(path: &[FieldPathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            FieldPathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(&escape_segment(key));
            }
            FieldPathSegment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}
