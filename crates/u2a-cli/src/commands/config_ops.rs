use std::fs;

use super::die;

pub fn settings_export() {
    print!("{}", u2a_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "cannot read {file}");
    let s = die!(
        u2a_core::settings::parse_settings_toml(&content),
        "{file}"
    );
    println!(
        "OK: on_unknown={:?}, placeholder={:?}, trailing_separator={:?}",
        s.options().on_unknown,
        s.options().placeholder(),
        s.options().trailing_separator
    );
}
