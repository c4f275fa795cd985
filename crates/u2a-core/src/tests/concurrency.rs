use std::thread;

use crate::{transliterate, TranslitTable};

#[test]
fn parallel_callers_share_one_table() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let table = TranslitTable::global() as *const TranslitTable as usize;
                let text = if i % 2 == 0 { "北京" } else { "Ångström" };
                (table, transliterate(text))
            })
        })
        .collect();

    let results: Vec<(usize, String)> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = results[0].0;
    for (i, (table, out)) in results.iter().enumerate() {
        assert_eq!(*table, first, "every thread sees the same table");
        let expected = if i % 2 == 0 { "Bei Jing" } else { "Angstrom" };
        assert_eq!(out, expected);
    }
}
