use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use u2a_core::settings::parse_settings_toml;
use u2a_core::{OnUnknown, Options, Resolution, TrailingSeparator, Transliterator};

use super::die;
use crate::table_source::load_table;
use crate::CliError;

/// Flags shared by the commands that run the converter.
#[derive(Debug, Default, Clone)]
pub struct ConvertFlags {
    pub table: Option<String>,
    pub settings: Option<String>,
    pub drop_unknown: bool,
    pub placeholder: Option<String>,
    pub keep_trailing: bool,
}

/// Resolve options: settings file first, then command-line overrides.
pub fn build_options(flags: &ConvertFlags) -> Result<Options, CliError> {
    let mut options = match &flags.settings {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            parse_settings_toml(&content)?.options().clone()
        }
        None => Options::default(),
    };
    if flags.drop_unknown {
        options = options.with_on_unknown(OnUnknown::Drop);
    }
    if let Some(placeholder) = &flags.placeholder {
        options = options.with_placeholder(placeholder.as_str())?;
    }
    if flags.keep_trailing {
        options = options.with_trailing_separator(TrailingSeparator::Keep);
    }
    Ok(options)
}

/// Transliterate `input` line by line into `output`.
///
/// Each line body is converted on its own and its terminator written back
/// unchanged, so a line ends where its transliteration ends.
///
/// Invalid UTF-8 is replaced with U+FFFD before conversion, so a bad byte
/// sequence shows up as the placeholder rather than aborting the stream.
pub fn translit_stream<R: BufRead, W: Write>(
    t: &Transliterator<'_>,
    mut input: R,
    mut output: W,
) -> io::Result<usize> {
    let mut raw = Vec::new();
    let mut out = String::new();
    let mut lines = 0;
    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        out.clear();
        let line = String::from_utf8_lossy(&raw);
        let (body, terminator) = split_terminator(&line);
        t.transliterate_into(body, &mut out);
        out.push_str(terminator);
        output.write_all(out.as_bytes())?;
        lines += 1;
    }
    output.flush()?;
    Ok(lines)
}

fn split_terminator(line: &str) -> (&str, &str) {
    let body = match line.strip_suffix('\n') {
        Some(l) => l.strip_suffix('\r').unwrap_or(l),
        None => line,
    };
    line.split_at(body.len())
}

pub fn translit_cmd(files: &[String], flags: &ConvertFlags) {
    let options = die!(build_options(flags), "invalid options");
    let table = die!(load_table(flags.table.as_deref().map(Path::new)), "cannot load table");
    let t = Transliterator::new(&table, options);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if files.is_empty() {
        let stdin = io::stdin();
        die!(
            translit_stream(&t, stdin.lock(), &mut writer),
            "stdin"
        );
        return;
    }
    for file in files {
        let f = die!(File::open(file), "cannot open {file}");
        let lines = die!(
            translit_stream(&t, BufReader::new(f), &mut writer),
            "{file}"
        );
        tracing::debug!(file = %file, lines, "transliterated");
    }
}

#[derive(Debug, Serialize)]
pub struct LookupRow {
    pub codepoint: String,
    pub char: char,
    pub status: &'static str,
    pub replacement: Option<String>,
}

pub fn lookup_rows(t: &Transliterator<'_>, text: &str) -> Vec<LookupRow> {
    text.chars()
        .map(|c| {
            let (status, replacement) = match t.resolve(c) {
                Resolution::Ascii(c) => ("ascii", Some(c.to_string())),
                Resolution::Mapped("") => ("empty", Some(String::new())),
                Resolution::Mapped(r) => ("mapped", Some(r.to_string())),
                Resolution::Unknown => ("unknown", None),
            };
            LookupRow {
                codepoint: u2a_core::unicode::format_codepoint(c as u32),
                char: c,
                status,
                replacement,
            }
        })
        .collect()
}

pub fn lookup_cmd(text: &str, table: Option<&str>, json: bool) {
    let table = die!(load_table(table.map(Path::new)), "cannot load table");
    let t = Transliterator::new(&table, Options::default());
    let rows = lookup_rows(&t, text);

    if json {
        let s = die!(
            serde_json::to_string_pretty(&rows).map_err(CliError::from),
            "cannot encode JSON"
        );
        println!("{s}");
        return;
    }
    for row in &rows {
        match &row.replacement {
            Some(r) => println!("{:<9} {:?}\t{:<8}{:?}", row.codepoint, row.char, row.status, r),
            None => println!("{:<9} {:?}\t{}", row.codepoint, row.char, row.status),
        }
    }
    println!("=> {:?}", t.transliterate(text));
}
