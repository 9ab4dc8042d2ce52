//! UTF-8 sequence classification.
//!
//! Well-formedness follows Unicode Table 3-7. An ill-formed sequence is reported
//! with the width of its maximal subpart, so a decoder substitutes exactly one
//! [`REPLACEMENT_CHARACTER`] per subpart and resumes at the next byte that could
//! start a sequence.

/// Substitute emitted in place of invalid or truncated input.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Longest well-formed sequence, in bytes.
pub const MAX_SEQUENCE_LEN: usize = 4;

/// Result of examining the bytes at the front of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A complete character and its encoded width
    Char(char, usize),
    /// An ill-formed unit of this many bytes
    Invalid(usize),
    /// A valid prefix that needs more bytes
    Incomplete,
}

/// Classify the sequence starting at `bytes[0]`. `bytes` must not be empty.
pub fn decode_step(bytes: &[u8]) -> Step {
    let lead = bytes[0];
    // (width, allowed range of the second byte)
    let (width, low, high) = match lead {
        0x00..=0x7F => return Step::Char(char::from(lead), 1),
        0xC2..=0xDF => (2, 0x80, 0xBF),
        0xE0 => (3, 0xA0, 0xBF),
        0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80, 0xBF),
        0xED => (3, 0x80, 0x9F),
        0xF0 => (4, 0x90, 0xBF),
        0xF1..=0xF3 => (4, 0x80, 0xBF),
        0xF4 => (4, 0x80, 0x8F),
        _ => return Step::Invalid(1),
    };

    let mut value = u32::from(lead) & (0x7F >> width);
    for i in 1..width {
        let Some(&byte) = bytes.get(i) else {
            return Step::Incomplete;
        };
        let (min, max) = if i == 1 { (low, high) } else { (0x80, 0xBF) };
        if !(min..=max).contains(&byte) {
            return Step::Invalid(i);
        }
        value = (value << 6) | u32::from(byte & 0x3F);
    }

    // The ranges above exclude surrogates and values past U+10FFFF.
    match char::from_u32(value) {
        Some(c) => Step::Char(c, width),
        None => Step::Invalid(width),
    }
}

/// Decode `bytes` completely, substituting for every ill-formed unit and for
/// a truncated tail.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match decode_step(&bytes[i..]) {
            Step::Char(c, width) => {
                out.push(c);
                i += width;
            }
            Step::Invalid(width) => {
                out.push(REPLACEMENT_CHARACTER);
                i += width;
            }
            Step::Incomplete => {
                out.push(REPLACEMENT_CHARACTER);
                break;
            }
        }
    }
    out
}
