//! Byte-per-character text encoding.
//!
//! The server writes each byte of a binary value as the character with the
//! same code point, so `[0x55, 0xe9]` travels as `"Ué"`. Only code points up to
//! 255 can be represented; anything above is rejected rather than truncated.

use thiserror::Error;

/// A character that does not fit in one byte.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("code point U+{code_point:04X} at position {position} exceeds 255")]
pub struct CodePointOutOfRange {
    /// Character index (not byte offset) in the source text.
    pub position: usize,
    pub code_point: u32,
}

/// Turn char-code text into bytes, one byte per character, in order.
pub fn decode(text: &str) -> Result<Vec<u8>, CodePointOutOfRange> {
    text.chars()
        .enumerate()
        .map(|(position, c)| {
            u8::try_from(u32::from(c)).map_err(|_| CodePointOutOfRange {
                position,
                code_point: u32::from(c),
            })
        })
        .collect()
}

/// Turn bytes back into char-code text.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
