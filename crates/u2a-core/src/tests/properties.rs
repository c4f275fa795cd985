//! Property-based tests for the converter.
//!
//! Generates random text via proptest and checks the invariants every
//! conversion must satisfy regardless of input.

use proptest::prelude::*;

use crate::{
    transliterate, transliterate_codepoints, transliterate_with, Options, TrailingSeparator,
    TranslitError, TranslitTable,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_char() -> impl Strategy<Value = char> {
    prop_oneof![
        4 => prop::char::range('\0', '\u{7F}'),
        3 => prop::char::range('\u{80}', '\u{24F}'),
        2 => prop::char::range('\u{4E00}', '\u{9FFF}'),
        1 => prop::char::range('\u{E000}', '\u{F8FF}'),
        2 => any::<char>(),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_char(), 0..64).prop_map(|v| v.into_iter().collect())
}

fn arb_invalid_codepoint() -> impl Strategy<Value = u32> {
    prop_oneof![0xD800u32..=0xDFFF, 0x11_0000u32..=u32::MAX]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn output_is_ascii(text in arb_text()) {
        prop_assert!(transliterate(&text).is_ascii());
        prop_assert!(transliterate_with(&text, &Options::drop_unknown()).is_ascii());
    }

    #[test]
    fn ascii_is_fixed_point(text in "[\\x00-\\x7F]{0,64}") {
        prop_assert_eq!(transliterate(&text), text);
    }

    #[test]
    fn deterministic(text in arb_text()) {
        prop_assert_eq!(transliterate(&text), transliterate(&text));
    }

    #[test]
    fn str_and_codepoint_inputs_agree(text in arb_text()) {
        let cps: Vec<u32> = text.chars().map(|c| c as u32).collect();
        let options = Options::default();
        prop_assert_eq!(
            transliterate_codepoints(&cps, &options),
            Ok(transliterate_with(&text, &options))
        );
    }

    #[test]
    fn drop_mode_never_longer(text in arb_text()) {
        let placeholder = transliterate(&text);
        let dropped = transliterate_with(&text, &Options::drop_unknown());
        prop_assert!(dropped.len() <= placeholder.len());
    }

    #[test]
    fn separator_dropped_only_at_end(text in arb_text()) {
        let keep = Options::default().with_trailing_separator(TrailingSeparator::Keep);
        let raw = transliterate_with(&text, &keep);
        let dropped = transliterate(&text);
        prop_assert!(
            dropped == raw || raw.strip_suffix(' ') == Some(dropped.as_str()),
            "raw {:?}, dropped {:?}", raw, dropped
        );
    }

    #[test]
    fn placeholder_count_matches_unknowns(text in arb_text()) {
        let table = TranslitTable::global();
        let unknown = text
            .chars()
            .filter(|&c| !c.is_ascii() && table.lookup(c as u32).is_none())
            .count();
        let options = Options::default().with_placeholder("\u{7}").unwrap();
        let out = transliterate_with(&text, &options);
        let bells_in_input = text.chars().filter(|&c| c == '\u{7}').count();
        prop_assert_eq!(out.chars().filter(|&c| c == '\u{7}').count(), unknown + bells_in_input);
    }

    #[test]
    fn invalid_codepoint_rejected(prefix in arb_text(), bad in arb_invalid_codepoint()) {
        let mut cps: Vec<u32> = prefix.chars().map(|c| c as u32).collect();
        cps.push(bad);
        prop_assert_eq!(
            transliterate_codepoints(&cps, &Options::default()),
            Err(TranslitError::InvalidCodepoint(bad))
        );
    }
}
