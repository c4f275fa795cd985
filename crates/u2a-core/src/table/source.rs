//! Text dataset format.
//!
//! ```text
//! # comment
//! 00E9 "e"
//! 0301 ""
//! 5317 "Bei "
//! ```
//!
//! One entry per line: a hex codepoint, whitespace, and a double-quoted ASCII
//! replacement (`\\`, `\"`, `\n` and `\t` escapes). A listed `""` drops the
//! codepoint; an unlisted codepoint has no entry.

use tracing::{debug, debug_span};

use super::{EntryError, TableBuilder};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("line {line}: expected `<hex codepoint> \"<replacement>\"`")]
    Malformed { line: usize },
    #[error("line {line}: invalid codepoint {text:?}")]
    BadCodepoint { line: usize, text: String },
    #[error("line {line}: invalid escape sequence `\\{escape}`")]
    BadEscape { line: usize, escape: char },
    #[error("line {line}: {source}")]
    Entry {
        line: usize,
        #[source]
        source: EntryError,
    },
    #[error("table source has no entries")]
    Empty,
}

impl SourceError {
    /// 1-based line number the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            SourceError::Malformed { line }
            | SourceError::BadCodepoint { line, .. }
            | SourceError::BadEscape { line, .. }
            | SourceError::Entry { line, .. } => Some(*line),
            SourceError::Empty => None,
        }
    }
}

/// Parse dataset text into a builder holding every validated entry.
pub fn parse_table_source(text: &str) -> Result<TableBuilder, SourceError> {
    let _span = debug_span!("parse_table_source", bytes = text.len()).entered();
    let mut builder = TableBuilder::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = trimmed
            .split_once(|c: char| c.is_ascii_whitespace())
            .ok_or(SourceError::Malformed { line })?;
        let cp = parse_codepoint(key).ok_or_else(|| SourceError::BadCodepoint {
            line,
            text: key.to_string(),
        })?;
        let replacement = parse_quoted(value.trim_start(), line)?;

        builder
            .insert(cp, &replacement)
            .map_err(|source| SourceError::Entry { line, source })?;
    }

    if builder.is_empty() {
        return Err(SourceError::Empty);
    }
    debug!(entries = builder.len(), "table source parsed");
    Ok(builder)
}

fn parse_codepoint(key: &str) -> Option<u32> {
    if !(4..=6).contains(&key.len()) || !key.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(key, 16).ok()
}

fn parse_quoted(value: &str, line: usize) -> Result<String, SourceError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(SourceError::Malformed { line })?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escape = chars.next().ok_or(SourceError::Malformed { line })?;
                out.push(match escape {
                    '\\' => '\\',
                    '"' => '"',
                    'n' => '\n',
                    't' => '\t',
                    other => return Err(SourceError::BadEscape { line, escape: other }),
                });
            }
            '"' => return Err(SourceError::Malformed { line }),
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Quote a replacement for the text format. Inverse of the value parser.
pub(crate) fn quote(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 2);
    out.push('"');
    for c in replacement.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
