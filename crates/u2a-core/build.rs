fn main() {
    println!("cargo:rerun-if-changed=src/default_settings.toml");
    println!("cargo:rerun-if-changed=src/table/default_table.txt");

    // Both files are compiled into the crate and must parse.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_table(
        "src/table/default_table.txt",
        include_str!("src/table/default_table.txt"),
    );
}

fn validate_toml(path: &str, content: &str) {
    if let Err(e) = content.parse::<toml::Table>() {
        panic!("{path}: invalid TOML: {e}");
    }
}

/// Line-level shape check; the full parser runs on first use.
fn validate_table(path: &str, content: &str) {
    let mut prev: Option<u32> = None;
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = idx + 1;
        let Some((key, value)) = line.split_once(' ') else {
            panic!("{path}:{lineno}: missing replacement");
        };
        let cp = u32::from_str_radix(key, 16)
            .unwrap_or_else(|_| panic!("{path}:{lineno}: invalid codepoint {key:?}"));
        if cp < 0x80 || cp > 0x10_FFFF || (0xD800..=0xDFFF).contains(&cp) {
            panic!("{path}:{lineno}: codepoint {key} out of range");
        }
        if prev.is_some_and(|p| p >= cp) {
            panic!("{path}:{lineno}: codepoints must be strictly increasing");
        }
        prev = Some(cp);
        if value.len() < 2 || !value.starts_with('"') || !value.ends_with('"') || !value.is_ascii()
        {
            panic!("{path}:{lineno}: replacement must be a quoted ASCII string");
        }
    }
    if prev.is_none() {
        panic!("{path} has no entries");
    }
}
