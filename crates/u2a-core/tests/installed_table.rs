//! A programmatically built table can be installed as the global one.

use u2a_core::{transliterate, TableBuilder, TableError, TranslitTable};

#[test]
fn installed_table_is_global() {
    let mut builder = TableBuilder::new();
    builder.insert(0x5317, "North ").unwrap();
    builder.insert(0x301, "").unwrap();
    TranslitTable::install(builder.build()).unwrap();

    assert_eq!(TranslitTable::global().lookup(0x5317), Some("North "));
    assert_eq!(transliterate("北e\u{301}"), "North e");
    assert_eq!(transliterate("北"), "North");
    assert_eq!(transliterate("é"), "?");

    let err = TranslitTable::install(TableBuilder::new().build()).unwrap_err();
    assert!(matches!(err, TableError::AlreadyInitialized));
}
