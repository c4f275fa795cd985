use std::fs;
use std::path::Path;

use u2a_core::table::{default_source, parse_table_source};
use u2a_core::{TableStats, TranslitTable};

use super::die;
use crate::table_source::load_table;

pub fn compile(input: &str, output: &str) {
    let text = die!(fs::read_to_string(input), "cannot read {input}");
    let table = die!(TranslitTable::from_source(&text), "{input}");
    die!(table.save(Path::new(output)), "cannot write {output}");
    let size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    let stats = table.stats();
    println!(
        "Wrote {output}: {} entries in {} blocks ({size} bytes)",
        stats.entries, stats.blocks
    );
}

pub fn info(file: Option<&str>) {
    let table = die!(load_table(file.map(Path::new)), "cannot load table");
    print_stats(file.unwrap_or("<embedded>"), &table.stats());
}

fn print_stats(name: &str, stats: &TableStats) {
    println!("Table: {name}");
    println!("  blocks:        {}", stats.blocks);
    println!("  entries:       {}", stats.entries);
    println!("  empty entries: {}", stats.empty_entries);
    println!("  arena bytes:   {}", stats.arena_bytes);
}

pub fn table_export() {
    print!("{}", default_source());
}

pub fn table_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "cannot read {file}");
    let builder = die!(parse_table_source(&content), "{file}");
    println!("OK: {} entries", builder.len());
}
