//! Converter configuration.
//!
//! The embedded `default_settings.toml` holds the options used by
//! [`transliterate`](crate::transliterate). A process may swap in its own TOML
//! with [`init_custom`] as long as nothing has read [`settings`] yet; after
//! that the configuration is fixed for the life of the process.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::convert::{OnUnknown, Options, TrailingSeparator};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();
static INSTANCE: OnceLock<Settings> = OnceLock::new();

/// Replace the embedded defaults. The TOML is validated first; fails with
/// `AlreadyInitialized` once settings are in use or already replaced.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    if INSTANCE.get().is_some() {
        return Err(SettingsError::AlreadyInitialized);
    }
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Process-wide settings, parsed on first access.
pub fn settings() -> &'static Settings {
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML.get().map_or(DEFAULT_SETTINGS_TOML, String::as_str);
        // build.rs checks the embedded file; a custom one was parsed by init_custom.
        parse_settings_toml(toml_str).expect("validated settings TOML")
    })
}

pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub converter: ConverterSettings,
    /// Converter options built from `converter`.
    #[serde(skip)]
    options: Options,
}

impl Settings {
    pub fn options(&self) -> &Options {
        &self.options
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterSettings {
    pub on_unknown: OnUnknown,
    pub placeholder: String,
    pub trailing_separator: TrailingSeparator,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    s.options = build_options(&s.converter)?;
    Ok(s)
}

fn build_options(c: &ConverterSettings) -> Result<Options, SettingsError> {
    Options::default()
        .with_on_unknown(c.on_unknown)
        .with_trailing_separator(c.trailing_separator)
        .with_placeholder(c.placeholder.as_str())
        .map_err(|e| SettingsError::InvalidValue {
            field: "converter.placeholder".to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.converter.on_unknown, OnUnknown::Placeholder);
        assert_eq!(s.converter.placeholder, "?");
        assert_eq!(s.converter.trailing_separator, TrailingSeparator::Drop);
        assert_eq!(s.options(), &Options::default());
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[converter]
on_unknown = "drop"
placeholder = "[?]"
trailing_separator = "keep"
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.options().on_unknown, OnUnknown::Drop);
        assert_eq!(s.options().placeholder(), "[?]");
        assert_eq!(s.options().trailing_separator, TrailingSeparator::Keep);
    }

    #[test]
    fn error_non_ascii_placeholder() {
        let toml = r#"
[converter]
on_unknown = "placeholder"
placeholder = "？"
trailing_separator = "drop"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("converter.placeholder"));
    }

    #[test]
    fn error_unknown_policy() {
        let toml = r#"
[converter]
on_unknown = "explode"
placeholder = "?"
trailing_separator = "drop"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_unknown_field() {
        let toml = r#"
[converter]
on_unknown = "placeholder"
placeholder = "?"
trailing_separator = "drop"
lowercase = true
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let err = parse_settings_toml("").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn global_settings_match_defaults() {
        assert_eq!(settings().options(), &Options::default());
    }

    #[test]
    fn late_custom_settings_rejected() {
        let _ = settings();
        let toml = DEFAULT_SETTINGS_TOML.replace("\"placeholder\"\n", "\"drop\"\n");
        let err = init_custom(toml).unwrap_err();
        assert!(matches!(err, SettingsError::AlreadyInitialized));
        assert_eq!(settings().options().on_unknown, OnUnknown::Placeholder);
    }
}
