//! Text rewrite stages.
//!
//! Each function is one stage of the normalization pipeline: a pure, total
//! `&str -> Cow<str>` rewrite that borrows its input when nothing changes.
//! The order in which they run is defined by [`Stage::PIPELINE`](super::Stage::PIPELINE).

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::contractions::CONTRACTIONS;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("markup pattern"));

// Whitespace here is `\s` plus the ASCII information separators (0x1C-0x1F).
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://[^\s\x1C-\x1F]+|www\.[^\s\x1C-\x1F]+").expect("url pattern")
});

static ESCAPED_UNICODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u[0-9A-Fa-f]+").expect("escaped unicode pattern"));

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\x1C-\x1F]").expect("punctuation pattern"));

/// Emoji, pictograph, dingbat and symbol blocks.
pub const EMOJI_BLOCKS: [(char, char); 7] = [
    ('\u{2700}', '\u{27BF}'),   // Dingbats
    ('\u{1F600}', '\u{1F64F}'), // Emoticons
    ('\u{2600}', '\u{26FF}'),   // Miscellaneous Symbols
    ('\u{1F300}', '\u{1F5FF}'), // Miscellaneous Symbols and Pictographs
    ('\u{1F900}', '\u{1F9FF}'), // Supplemental Symbols and Pictographs
    ('\u{1FA70}', '\u{1FAFF}'), // Symbols and Pictographs Extended-A
    ('\u{1F680}', '\u{1F6FF}'), // Transport and Map Symbols
];

#[rustfmt::skip]
const ASCII_LOWERCASE_TABLE: [u8; 128] = [
    0x00,0x01,0x02,0x03,0x04,0x05,0x06,0x07,0x08,0x09,0x0a,0x0b,0x0c,0x0d,0x0e,0x0f,
    0x10,0x11,0x12,0x13,0x14,0x15,0x16,0x17,0x18,0x19,0x1a,0x1b,0x1c,0x1d,0x1e,0x1f,
    0x20,0x21,0x22,0x23,0x24,0x25,0x26,0x27,0x28,0x29,0x2a,0x2b,0x2c,0x2d,0x2e,0x2f,
    0x30,0x31,0x32,0x33,0x34,0x35,0x36,0x37,0x38,0x39,0x3a,0x3b,0x3c,0x3d,0x3e,0x3f,
    0x40,0x61,0x62,0x63,0x64,0x65,0x66,0x67,0x68,0x69,0x6a,0x6b,0x6c,0x6d,0x6e,0x6f,
    0x70,0x71,0x72,0x73,0x74,0x75,0x76,0x77,0x78,0x79,0x7a,0x5b,0x5c,0x5d,0x5e,0x5f,
    0x60,0x61,0x62,0x63,0x64,0x65,0x66,0x67,0x68,0x69,0x6a,0x6b,0x6c,0x6d,0x6e,0x6f,
    0x70,0x71,0x72,0x73,0x74,0x75,0x76,0x77,0x78,0x79,0x7a,0x7b,0x7c,0x7d,0x7e,0x7f,
];

/// Removes anything shaped like an HTML/XML tag.
///
/// Matching is non-greedy and does not cross line breaks, so `a < b\n c > d`
/// is left alone.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    MARKUP.replace_all(text, "")
}

/// Removes `https://` and `www.` links up to the next whitespace or
/// information separator.
///
/// Plain `http://` links are not removed.
pub fn strip_urls(text: &str) -> Cow<'_, str> {
    URL.replace_all(text, "")
}

/// Replaces escaped `\uXXXX` sequences and every non-ASCII code point with a space.
pub fn strip_non_ascii(text: &str) -> Cow<'_, str> {
    let unescaped = ESCAPED_UNICODE.replace_all(text, " ");
    if unescaped.is_ascii() {
        return unescaped;
    }

    Cow::Owned(
        unescaped
            .chars()
            .map(|c| if c.is_ascii() { c } else { ' ' })
            .collect(),
    )
}

#[inline]
fn is_emoji(c: char) -> bool {
    EMOJI_BLOCKS
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Deletes characters in [`EMOJI_BLOCKS`].
pub fn strip_emoji(text: &str) -> Cow<'_, str> {
    if text.is_ascii() || !text.chars().any(is_emoji) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|&c| !is_emoji(c)).collect())
}

/// Deletes every ASCII digit. Surrounding spaces are left as they are.
pub fn strip_digits(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|c| !c.is_ascii_digit()).collect())
}

/// Lowercases the text.
///
/// ASCII input goes through a byte table; anything else uses Unicode
/// lowercase mapping.
pub fn lowercase(text: &str) -> Cow<'_, str> {
    if !text.is_ascii() {
        return Cow::Owned(text.to_lowercase());
    }
    if !text.bytes().any(|b| b.is_ascii_uppercase()) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.bytes()
            .map(|b| ASCII_LOWERCASE_TABLE[b as usize] as char)
            .collect(),
    )
}

/// Applies every [`CONTRACTIONS`] pair once, in table order.
pub fn expand_contractions(text: &str) -> Cow<'_, str> {
    let mut out = Cow::Borrowed(text);
    for &(pattern, replacement) in CONTRACTIONS {
        if out.contains(pattern) {
            out = Cow::Owned(out.replace(pattern, replacement));
        }
    }
    out
}

/// Replaces each character that is neither a word character, whitespace nor
/// an information separator (0x1C-0x1F) with a space.
pub fn strip_punctuation(text: &str) -> Cow<'_, str> {
    PUNCTUATION.replace_all(text, " ")
}
