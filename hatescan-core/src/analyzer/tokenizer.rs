//! Word splitter.
//!
//! Splits text on the ASCII space byte (0x20) only, the way the stopword stage
//! expects. Runs of spaces produce no empty tokens, and other whitespace
//! (tabs, newlines) stays inside the token it appears in.
//!
//! ```rust
//! use hatescan_core::analyzer::tokenizer::split_words;
//!
//! let mut words = Vec::new();
//! split_words("hello   world", |text, position| words.push((text, position)));
//! assert_eq!(words, vec![("hello", 0), ("world", 1)]);
//! ```
//!
//! Tokens are slices of the input, emitted through a callback, so splitting
//! itself never allocates.

use memchr::memchr_iter;

/// Emits every non-empty space-separated slice with its position.
///
/// Position counts emitted tokens, starting at 0. After emitting a token at
/// position `u32::MAX`, further emissions stop.
#[inline(always)]
pub fn split_words<'n, F>(text: &'n str, mut emit: F)
where
    F: FnMut(&'n str, u32),
{
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return;
    }

    let mut start = 0usize;
    let mut pos = 0u32;

    for i in memchr_iter(b' ', bytes) {
        if start < i {
            // Both ends sit next to an ASCII space, so they are char boundaries.
            emit(&text[start..i], pos);
            if pos == u32::MAX {
                return;
            }
            pos += 1;
        }
        start = i + 1;
    }

    if start < bytes.len() {
        emit(&text[start..], pos);
    }
}
