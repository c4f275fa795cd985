//! Custom settings installed before first use drive `transliterate`.

use u2a_core::settings::{self, settings, SettingsError};
use u2a_core::{transliterate, OnUnknown, TrailingSeparator};

const DROP_AND_KEEP: &str = r#"
[converter]
on_unknown = "drop"
placeholder = "?"
trailing_separator = "keep"
"#;

#[test]
fn custom_settings_apply_to_transliterate() {
    let err = settings::init_custom("[converter]\non_unknown = \"explode\"\n".to_string())
        .unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));

    settings::init_custom(DROP_AND_KEEP.to_string()).unwrap();
    assert_eq!(settings().options().on_unknown, OnUnknown::Drop);
    assert_eq!(
        settings().options().trailing_separator,
        TrailingSeparator::Keep
    );

    assert_eq!(transliterate("\u{E000}"), "");
    assert_eq!(transliterate("a\u{E000}b"), "ab");
    assert_eq!(transliterate("北京"), "Bei Jing ");

    let err = settings::init_custom(DROP_AND_KEEP.to_string()).unwrap_err();
    assert!(matches!(err, SettingsError::AlreadyInitialized));
}
