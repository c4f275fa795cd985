//! Text → ASCII conversion.
//!
//! Each codepoint is resolved independently: ASCII passes through, anything
//! else is looked up in a [`TranslitTable`], and codepoints without an entry
//! become the placeholder (or nothing, in drop mode). Replacements are
//! concatenated in input order.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::settings::settings;
use crate::table::TranslitTable;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TranslitError {
    #[error("invalid codepoint U+{0:04X}: not a Unicode scalar value")]
    InvalidCodepoint(u32),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("placeholder must be ASCII, got {0:?}")]
    NonAsciiPlaceholder(String),
}

/// What to emit for a codepoint with no table entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnUnknown {
    #[default]
    Placeholder,
    Drop,
}

/// Whether a separator space ending the last replacement survives.
///
/// Multi-letter entries such as CJK syllables end in a space so consecutive
/// ones read as words ("Bei Jing "). `Drop` removes that space when it would
/// be the last byte of the output; anywhere else it is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSeparator {
    #[default]
    Drop,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub on_unknown: OnUnknown,
    pub trailing_separator: TrailingSeparator,
    placeholder: Cow<'static, str>,
}

pub const DEFAULT_PLACEHOLDER: &str = "?";

impl Default for Options {
    fn default() -> Self {
        Self {
            on_unknown: OnUnknown::Placeholder,
            trailing_separator: TrailingSeparator::Drop,
            placeholder: Cow::Borrowed(DEFAULT_PLACEHOLDER),
        }
    }
}

impl Options {
    /// Default options with unknown codepoints dropped.
    pub fn drop_unknown() -> Self {
        Self {
            on_unknown: OnUnknown::Drop,
            ..Self::default()
        }
    }

    pub fn with_on_unknown(mut self, on_unknown: OnUnknown) -> Self {
        self.on_unknown = on_unknown;
        self
    }

    pub fn with_trailing_separator(mut self, trailing_separator: TrailingSeparator) -> Self {
        self.trailing_separator = trailing_separator;
        self
    }

    pub fn with_placeholder(
        mut self,
        placeholder: impl Into<String>,
    ) -> Result<Self, OptionsError> {
        let placeholder = placeholder.into();
        if !placeholder.is_ascii() {
            return Err(OptionsError::NonAsciiPlaceholder(placeholder));
        }
        self.placeholder = Cow::Owned(placeholder);
        Ok(self)
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// How a single codepoint resolves against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// ASCII, emitted unchanged.
    Ascii(char),
    /// Table entry; may be empty.
    Mapped(&'a str),
    /// No entry; handled by [`OnUnknown`].
    Unknown,
}

/// A table paired with conversion options.
#[derive(Debug, Clone)]
pub struct Transliterator<'t> {
    table: &'t TranslitTable,
    options: Options,
}

impl<'t> Transliterator<'t> {
    pub fn new(table: &'t TranslitTable, options: Options) -> Self {
        Self { table, options }
    }

    pub fn table(&self) -> &'t TranslitTable {
        self.table
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn resolve(&self, c: char) -> Resolution<'t> {
        if c.is_ascii() {
            return Resolution::Ascii(c);
        }
        match self.table.lookup(c as u32) {
            Some(replacement) => Resolution::Mapped(replacement),
            None => Resolution::Unknown,
        }
    }

    pub fn transliterate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.transliterate_into(text, &mut out);
        out
    }

    /// Append the transliteration of `text` to `out`.
    pub fn transliterate_into(&self, text: &str, out: &mut String) {
        self.emit_all(text.chars(), out);
    }

    pub fn transliterate_char(&self, c: char) -> String {
        let mut out = String::new();
        self.emit_all(std::iter::once(c), &mut out);
        out
    }

    /// Transliterate raw codepoint values.
    ///
    /// Every value is checked before any output is produced, so the call
    /// either fails on the first non-scalar value or converts all of them.
    pub fn transliterate_codepoints(&self, cps: &[u32]) -> Result<String, TranslitError> {
        let chars = cps
            .iter()
            .map(|&cp| to_char(cp))
            .collect::<Result<Vec<char>, _>>()?;
        let mut out = String::with_capacity(chars.len());
        self.emit_all(chars.into_iter(), &mut out);
        Ok(out)
    }

    fn emit_all(&self, chars: impl Iterator<Item = char>, out: &mut String) {
        let mut emitter = Emitter {
            out,
            defer_separator: self.options.trailing_separator == TrailingSeparator::Drop,
            pending_separator: false,
        };
        for c in chars {
            match self.resolve(c) {
                Resolution::Ascii(c) => emitter.push_ascii(c),
                Resolution::Mapped(replacement) => emitter.push_replacement(replacement),
                Resolution::Unknown => {
                    trace!(cp = c as u32, "no transliteration");
                    if self.options.on_unknown == OnUnknown::Placeholder {
                        emitter.push_str(&self.options.placeholder);
                    }
                }
            }
        }
    }
}

/// Output accumulator that holds back a replacement's trailing separator
/// until more output arrives. A separator still pending when the input runs
/// out is never written.
struct Emitter<'o> {
    out: &'o mut String,
    defer_separator: bool,
    pending_separator: bool,
}

impl Emitter<'_> {
    fn push_ascii(&mut self, c: char) {
        self.flush();
        self.out.push(c);
    }

    fn push_replacement(&mut self, replacement: &str) {
        if replacement.is_empty() {
            return;
        }
        match replacement.strip_suffix(' ') {
            Some(word) if self.defer_separator && !word.is_empty() => {
                self.push_str(word);
                self.pending_separator = true;
            }
            _ => self.push_str(replacement),
        }
    }

    fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.flush();
        self.out.push_str(s);
    }

    fn flush(&mut self) {
        if self.pending_separator {
            self.out.push(' ');
            self.pending_separator = false;
        }
    }
}

fn to_char(cp: u32) -> Result<char, TranslitError> {
    char::from_u32(cp).ok_or(TranslitError::InvalidCodepoint(cp))
}

/// Transliterate `text` with the global table and the options from the
/// global [`settings`](crate::settings::settings).
pub fn transliterate(text: &str) -> String {
    transliterate_with(text, settings().options())
}

/// Transliterate `text` with the global table.
pub fn transliterate_with(text: &str, options: &Options) -> String {
    Transliterator::new(TranslitTable::global(), options.clone()).transliterate(text)
}

/// Transliterate raw codepoints with the global table.
pub fn transliterate_codepoints(cps: &[u32], options: &Options) -> Result<String, TranslitError> {
    Transliterator::new(TranslitTable::global(), options.clone()).transliterate_codepoints(cps)
}
