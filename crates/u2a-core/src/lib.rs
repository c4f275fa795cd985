//! Unicode-to-ASCII transliteration.
//!
//! ```
//! assert_eq!(u2a_core::transliterate("Ångström"), "Angstrom");
//! assert_eq!(u2a_core::transliterate("北京"), "Bei Jing");
//! ```

pub mod convert;
pub mod settings;
pub mod table;
pub mod unicode;

#[cfg(test)]
mod tests;

pub use convert::{
    transliterate, transliterate_codepoints, transliterate_with, OnUnknown, Options, OptionsError,
    Resolution, TrailingSeparator, TranslitError, Transliterator,
};
pub use table::{TableBuilder, TableError, TableIoError, TableStats, TranslitTable};
