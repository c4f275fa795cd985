//! Table selection for the front end.
//!
//! The converter only ever sees a `&TranslitTable`; which one it gets is
//! decided here: the embedded default, a text dataset, or a compiled `.u2at`
//! file (detected by its magic bytes).

use std::fs::{self, File};
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use tracing::debug;
use u2a_core::TranslitTable;

use crate::CliError;

const COMPILED_MAGIC: &[u8; 4] = b"U2AT";

pub enum LoadedTable {
    Embedded(&'static TranslitTable),
    Loaded(TranslitTable),
}

impl Deref for LoadedTable {
    type Target = TranslitTable;

    fn deref(&self) -> &TranslitTable {
        match self {
            LoadedTable::Embedded(table) => table,
            LoadedTable::Loaded(table) => table,
        }
    }
}

/// Load the table at `path`, or the embedded default when `path` is `None`.
pub fn load_table(path: Option<&Path>) -> Result<LoadedTable, CliError> {
    let Some(path) = path else {
        return Ok(LoadedTable::Embedded(TranslitTable::global()));
    };
    let path_str = path.display().to_string();

    if is_compiled(path).map_err(|e| CliError::io(&path_str, e))? {
        debug!(path = %path_str, "loading compiled table");
        return Ok(LoadedTable::Loaded(TranslitTable::open(path)?));
    }

    debug!(path = %path_str, "loading table source");
    let text = fs::read_to_string(path).map_err(|e| CliError::io(&path_str, e))?;
    Ok(LoadedTable::Loaded(TranslitTable::from_source(&text)?))
}

fn is_compiled(path: &Path) -> std::io::Result<bool> {
    let mut magic = [0u8; 4];
    let mut file = File::open(path)?;
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == COMPILED_MAGIC),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "00E9 \"E\"\n";

    #[test]
    fn embedded_by_default() {
        let table = load_table(None).unwrap();
        assert!(matches!(table, LoadedTable::Embedded(_)));
        assert_eq!(table.lookup(0xE9), Some("e"));
    }

    #[test]
    fn loads_text_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.txt");
        fs::write(&path, SOURCE).unwrap();
        let table = load_table(Some(&path)).unwrap();
        assert_eq!(table.lookup(0xE9), Some("E"));
        assert_eq!(table.lookup(0xE8), None);
    }

    #[test]
    fn loads_compiled_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.u2at");
        TranslitTable::from_source(SOURCE)
            .unwrap()
            .save(&path)
            .unwrap();
        let table = load_table(Some(&path)).unwrap();
        assert_eq!(table.lookup(0xE9), Some("E"));
    }

    #[test]
    fn reports_missing_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = load_table(Some(&path)).err().unwrap();
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn rejects_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "00E9 e\n").unwrap();
        let err = load_table(Some(&path)).err().unwrap();
        assert!(matches!(err, CliError::Table(_)));
    }
}
