//! Compiled table format (`.u2at`).
//!
//! Layout: 20-byte header, the string arena, then the bincode-encoded block
//! list. The header records both payload lengths and a CRC32 over them.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use memmap2::Mmap;
use tracing::{debug, debug_span};

use super::{Block, TranslitTable};
use crate::unicode::{BLOCK_COUNT, BLOCK_SIZE};

const MAGIC: &[u8; 4] = b"U2AT";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 4 + 1 + 3 + 4 + 4 + 4; // magic + version + reserved + arena_len + blocks_len + crc = 20

#[derive(Debug, thiserror::Error)]
pub enum TableIoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected U2AT)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch: header {expected:#010x}, data {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("corrupt table: {0}")]
    Corrupt(String),
}

impl TranslitTable {
    pub fn to_bytes(&self) -> Result<Vec<u8>, TableIoError> {
        let arena = self.arena().as_bytes();
        let blocks_data = bincode::serialize(self.blocks()).map_err(TableIoError::Serialize)?;

        let arena_len: u32 = arena
            .len()
            .try_into()
            .map_err(|_| TableIoError::Corrupt("arena exceeds u32::MAX".to_string()))?;
        let blocks_len: u32 = blocks_data
            .len()
            .try_into()
            .map_err(|_| TableIoError::Corrupt("block data exceeds u32::MAX".to_string()))?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(arena);
        hasher.update(&blocks_data);
        let crc = hasher.finalize();

        let mut buf = Vec::with_capacity(HEADER_SIZE + arena.len() + blocks_data.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]); // reserved
        buf.extend_from_slice(&arena_len.to_le_bytes());
        buf.extend_from_slice(&blocks_len.to_le_bytes());
        buf.extend_from_slice(&crc.to_le_bytes());
        buf.extend_from_slice(arena);
        buf.extend_from_slice(&blocks_data);

        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, TableIoError> {
        let _span = debug_span!("table_from_bytes", bytes = data.len()).entered();
        if data.len() < 5 {
            return Err(TableIoError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(TableIoError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(TableIoError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(TableIoError::InvalidHeader);
        }

        let arena_len = read_u32(data, 8) as usize;
        let blocks_len = read_u32(data, 12) as usize;
        let expected_crc = read_u32(data, 16);

        let arena_start = HEADER_SIZE;
        let blocks_start = arena_start + arena_len;
        let end = blocks_start + blocks_len;
        if data.len() < end {
            return Err(TableIoError::InvalidHeader);
        }

        let actual_crc = crc32fast::hash(&data[arena_start..end]);
        if actual_crc != expected_crc {
            return Err(TableIoError::ChecksumMismatch {
                expected: expected_crc,
                actual: actual_crc,
            });
        }

        let arena_bytes = &data[arena_start..blocks_start];
        if !arena_bytes.is_ascii() {
            return Err(TableIoError::Corrupt("arena is not ASCII".to_string()));
        }
        let arena = String::from_utf8(arena_bytes.to_vec())
            .map_err(|e| TableIoError::Corrupt(e.to_string()))?;
        let blocks: Vec<Block> =
            bincode::deserialize(&data[blocks_start..end]).map_err(TableIoError::Deserialize)?;

        validate_blocks(&arena, &blocks)?;
        debug!(blocks = blocks.len(), arena_bytes = arena.len(), "table loaded");
        Ok(Self::from_parts(arena, blocks))
    }

    /// Open a compiled table file.
    ///
    /// The file is memory-mapped for the duration of decoding only; the
    /// returned table owns its data.
    pub fn open(path: &Path) -> Result<Self, TableIoError> {
        let file = File::open(path)?;
        // SAFETY: The file is opened read-only and the mapping is immutable.
        // The Mmap is dropped after decoding completes below.
        let mmap = unsafe { Mmap::map(&file)? };
        Self::from_bytes(&mmap)
    }

    pub fn save(&self, path: &Path) -> Result<(), TableIoError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn validate_blocks(arena: &str, blocks: &[Block]) -> Result<(), TableIoError> {
    let corrupt = |msg: String| -> Result<(), TableIoError> { Err(TableIoError::Corrupt(msg)) };

    // Slot indices must stay below the directory's NO_BLOCK marker.
    if blocks.len() >= u16::MAX as usize {
        return corrupt(format!("too many blocks: {}", blocks.len()));
    }

    let mut prev: Option<u16> = None;
    for block in blocks {
        if block.number as usize >= BLOCK_COUNT {
            return corrupt(format!("block number {:#x} out of range", block.number));
        }
        if prev.is_some_and(|p| p >= block.number) {
            return corrupt(format!("block {:#x} out of order", block.number));
        }
        prev = Some(block.number);

        if block.spans.len() != BLOCK_SIZE {
            return corrupt(format!(
                "block {:#x} has {} spans, expected {BLOCK_SIZE}",
                block.number,
                block.spans.len()
            ));
        }
        for (offset, span) in block.spans.iter().enumerate() {
            if block.is_present(offset) && arena.get(span.range()).is_none() {
                return corrupt(format!(
                    "span for offset {offset:#x} of block {:#x} is outside the arena",
                    block.number
                ));
            }
        }
    }

    let ascii_ok = blocks.first().is_some_and(|b| {
        b.number == 0
            && (0..0x80usize).all(|c| {
                b.is_present(c) && arena.as_bytes().get(b.spans[c].range()) == Some(&[c as u8][..])
            })
    });
    if !ascii_ok {
        return corrupt("ASCII codepoints do not map to themselves".to_string());
    }

    Ok(())
}
