//! Codepoint-level helpers shared by the table and the converter.

/// Number of codepoints covered by one table block.
pub const BLOCK_SIZE: usize = 256;
pub(crate) const BLOCK_SHIFT: u32 = 8;
pub(crate) const BLOCK_MASK: u32 = 0xFF;

/// Largest Unicode scalar value.
pub const MAX_CODEPOINT: u32 = 0x10_FFFF;

/// Number of blocks needed to cover every codepoint up to `MAX_CODEPOINT`.
pub const BLOCK_COUNT: usize = (MAX_CODEPOINT as usize >> BLOCK_SHIFT) + 1;

pub fn is_surrogate(cp: u32) -> bool {
    (0xD800..=0xDFFF).contains(&cp)
}

/// A Unicode scalar value: in range and not a surrogate.
pub fn is_scalar_value(cp: u32) -> bool {
    cp <= MAX_CODEPOINT && !is_surrogate(cp)
}

pub fn is_ascii(cp: u32) -> bool {
    cp < 0x80
}

/// Split a codepoint into its `(block, offset)` table coordinates.
pub fn block_of(cp: u32) -> (usize, usize) {
    ((cp >> BLOCK_SHIFT) as usize, (cp & BLOCK_MASK) as usize)
}

/// Inverse of [`block_of`].
pub fn codepoint_at(block: usize, offset: usize) -> u32 {
    ((block as u32) << BLOCK_SHIFT) | (offset as u32 & BLOCK_MASK)
}

/// Format a codepoint the way Unicode charts do (`U+00E9`, `U+1D5C4`).
pub fn format_codepoint(cp: u32) -> String {
    format!("U+{cp:04X}")
}
