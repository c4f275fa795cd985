//! Codepoint → ASCII replacement table.
//!
//! The table is split into 256-codepoint blocks. A fixed directory with one
//! slot per possible block points at the blocks that actually hold entries;
//! each stored block carries a presence bitmap and one span per offset into a
//! shared string arena. Absence (no entry) and the empty replacement are kept
//! apart by the bitmap: an empty entry is a present bit with a zero-length span.
//!
//! The process-wide table is built lazily from `default_table.txt` (embedded
//! with `include_str!`) unless a custom one is installed before first use.

mod io;
mod source;

pub use io::TableIoError;
pub use source::{parse_table_source, SourceError};

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::unicode::{
    block_of, codepoint_at, is_ascii, is_scalar_value, BLOCK_COUNT, BLOCK_SIZE,
};

pub const DEFAULT_TABLE_SOURCE: &str = include_str!("default_table.txt");

/// Directory slot value for a block with no stored entries.
const NO_BLOCK: u16 = u16::MAX;

static INSTANCE: OnceLock<TranslitTable> = OnceLock::new();

/// Returns the embedded default table source.
pub fn default_source() -> &'static str {
    DEFAULT_TABLE_SOURCE
}

/// Rejected table entry.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("U+{0:04X} is not a Unicode scalar value")]
    InvalidCodepoint(u32),
    #[error("ASCII codepoint U+{0:04X} always maps to itself")]
    AsciiKey(u32),
    #[error("replacement for U+{0:04X} is not ASCII: {1:?}")]
    NonAsciiReplacement(u32, String),
    #[error("duplicate entry for U+{0:04X}")]
    Duplicate(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("table source error: {0}")]
    Source(#[from] SourceError),
    #[error("transliteration table already initialized")]
    AlreadyInitialized,
}

/// Byte range of one replacement inside the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Span {
    pub(crate) start: u32,
    pub(crate) len: u32,
}

impl Span {
    fn range(self) -> Range<usize> {
        let start = self.start as usize;
        start..start + self.len as usize
    }
}

/// Entries for 256 consecutive codepoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Block {
    /// Block number (`codepoint >> 8`).
    pub(crate) number: u16,
    pub(crate) presence: [u64; 4],
    /// Always `BLOCK_SIZE` long; spans of absent offsets are zeroed.
    pub(crate) spans: Vec<Span>,
}

impl Block {
    fn new(number: u16) -> Self {
        Self {
            number,
            presence: [0; 4],
            spans: vec![Span::default(); BLOCK_SIZE],
        }
    }

    fn is_present(&self, offset: usize) -> bool {
        self.presence[offset / 64] & (1u64 << (offset % 64)) != 0
    }

    fn set(&mut self, offset: usize, span: Span) {
        self.presence[offset / 64] |= 1u64 << (offset % 64);
        self.spans[offset] = span;
    }

    fn entry_count(&self) -> usize {
        self.presence.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Stored blocks (including the ASCII block).
    pub blocks: usize,
    /// Codepoints with an entry, ASCII included.
    pub entries: usize,
    /// Entries whose replacement is the empty string.
    pub empty_entries: usize,
    /// Size of the shared string arena in bytes.
    pub arena_bytes: usize,
}

pub struct TranslitTable {
    directory: Box<[u16]>,
    blocks: Vec<Block>,
    arena: String,
}

impl TranslitTable {
    /// Parse a table from the text dataset format.
    pub fn from_source(source: &str) -> Result<Self, TableError> {
        Ok(parse_table_source(source)?.build())
    }

    /// Install a table built from `source` as the process-wide table.
    ///
    /// Must be called before the first `global()` call.
    pub fn init_custom(source: &str) -> Result<(), TableError> {
        if INSTANCE.get().is_some() {
            return Err(TableError::AlreadyInitialized);
        }
        Self::install(Self::from_source(source)?)
    }

    /// Install an already built table as the process-wide table.
    pub fn install(table: TranslitTable) -> Result<(), TableError> {
        INSTANCE
            .set(table)
            .map_err(|_| TableError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static TranslitTable {
        INSTANCE.get_or_init(|| {
            // build.rs validates the embedded source.
            Self::from_source(DEFAULT_TABLE_SOURCE).expect("default table source must be valid")
        })
    }

    /// Replacement for `cp`, or `None` when the codepoint has no entry.
    ///
    /// `Some("")` means the codepoint is intentionally dropped.
    pub fn lookup(&self, cp: u32) -> Option<&str> {
        if !is_scalar_value(cp) {
            return None;
        }
        let (block, offset) = block_of(cp);
        let slot = self.directory[block];
        if slot == NO_BLOCK {
            return None;
        }
        let block = &self.blocks[slot as usize];
        if !block.is_present(offset) {
            return None;
        }
        self.arena.get(block.spans[offset].range())
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.lookup(cp).is_some()
    }

    /// Iterate over all `(codepoint, replacement)` pairs in codepoint order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.blocks.iter().flat_map(move |block| {
            (0..BLOCK_SIZE).filter_map(move |offset| {
                if !block.is_present(offset) {
                    return None;
                }
                let cp = codepoint_at(block.number as usize, offset);
                Some((cp, &self.arena[block.spans[offset].range()]))
            })
        })
    }

    pub fn stats(&self) -> TableStats {
        let mut empty_entries = 0;
        for block in &self.blocks {
            for offset in 0..BLOCK_SIZE {
                if block.is_present(offset) && block.spans[offset].len == 0 {
                    empty_entries += 1;
                }
            }
        }
        TableStats {
            blocks: self.blocks.len(),
            entries: self.blocks.iter().map(Block::entry_count).sum(),
            empty_entries,
            arena_bytes: self.arena.len(),
        }
    }

    /// Assemble a table from stored blocks. Blocks must be sorted by number
    /// and unique; the caller has checked spans against the arena.
    pub(crate) fn from_parts(arena: String, blocks: Vec<Block>) -> Self {
        let mut directory = vec![NO_BLOCK; BLOCK_COUNT].into_boxed_slice();
        for (slot, block) in blocks.iter().enumerate() {
            directory[block.number as usize] = slot as u16;
        }
        Self {
            directory,
            blocks,
            arena,
        }
    }

    pub(crate) fn arena(&self) -> &str {
        &self.arena
    }

    pub(crate) fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

impl fmt::Debug for TranslitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("TranslitTable")
            .field("blocks", &stats.blocks)
            .field("entries", &stats.entries)
            .field("arena_bytes", &stats.arena_bytes)
            .finish()
    }
}

/// Collects validated entries and lays them out into blocks.
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: BTreeMap<u32, String>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cp: u32, replacement: &str) -> Result<(), EntryError> {
        if !is_scalar_value(cp) {
            return Err(EntryError::InvalidCodepoint(cp));
        }
        if is_ascii(cp) {
            return Err(EntryError::AsciiKey(cp));
        }
        if !replacement.is_ascii() {
            return Err(EntryError::NonAsciiReplacement(cp, replacement.to_string()));
        }
        if self.entries.contains_key(&cp) {
            return Err(EntryError::Duplicate(cp));
        }
        self.entries.insert(cp, replacement.to_string());
        Ok(())
    }

    /// Number of non-ASCII entries collected so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> TranslitTable {
        let _span = debug_span!("build_table", entries = self.entries.len()).entered();

        // The first 128 arena bytes are the ASCII characters themselves, so
        // ASCII codepoint `c` is the one-byte span starting at `c`.
        let mut arena: String = (0u8..0x80).map(char::from).collect();
        let mut ascii_block = Block::new(0);
        for c in 0..0x80u32 {
            ascii_block.set(c as usize, Span { start: c, len: 1 });
        }

        let mut blocks: Vec<Block> = vec![ascii_block];
        let mut interned: HashMap<&str, Span> = HashMap::new();
        for (&cp, replacement) in &self.entries {
            let span = *interned.entry(replacement.as_str()).or_insert_with(|| {
                let span = Span {
                    start: arena.len() as u32,
                    len: replacement.len() as u32,
                };
                arena.push_str(replacement);
                span
            });

            let (number, offset) = block_of(cp);
            let needs_block = blocks
                .last()
                .map_or(true, |b| b.number as usize != number);
            if needs_block {
                blocks.push(Block::new(number as u16));
            }
            if let Some(block) = blocks.last_mut() {
                block.set(offset, span);
            }
        }

        debug!(
            blocks = blocks.len(),
            arena_bytes = arena.len(),
            "transliteration table built"
        );
        TranslitTable::from_parts(arena, blocks)
    }
}
