//! Position conversion utilities.
//!
//! Tokens carry byte offsets. Editors usually want UTF-16 offsets or
//! line/column pairs instead, so these helpers convert on the way out.

/// Convert a byte offset to a UTF-16 offset.
///
/// Offsets past the end clamp to the end; an offset inside a multi-byte
/// character counts that character as not yet reached.
pub fn byte_to_utf16(source: &str, byte_offset: usize) -> usize {
    source
        .char_indices()
        .take_while(|&(i, _)| i < byte_offset)
        .map(|(_, c)| c.len_utf16())
        .sum()
}

/// One-based line and column (in characters) of a byte offset.
pub fn line_col(source: &str, byte_offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in source.char_indices() {
        if i >= byte_offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
