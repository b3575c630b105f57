//! Interpolation scan phase and region boundaries.
//!
//! An interpolation occurrence cycles `SeekStart -> InContent -> SeekEnd`.
//! Content is confined to the enclosing region: a quoted value ends at its
//! quote, an unquoted value at whitespace or `>`, and text at the next real
//! tag or comment opener. The end delimiter is searched only within that
//! region; running out of region produces an unterminated token, never an
//! error.

use weft_lexer_core::Cursor;

/// Per-occurrence interpolation phase. Fits in 2 bits for checkpoint
/// packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScanPhase {
    /// Looking for the next start delimiter.
    SeekStart,
    /// Between the delimiters, consuming content.
    InContent,
    /// Positioned at a verified end delimiter.
    SeekEnd,
}

impl ScanPhase {
    pub(crate) fn bits(self) -> u8 {
        match self {
            ScanPhase::SeekStart => 0,
            ScanPhase::InContent => 1,
            ScanPhase::SeekEnd => 2,
        }
    }

    /// Unknown values decode to `SeekStart` (same caller contract as
    /// [`ScanState::from_bits`](weft_lexer_core::ScanState::from_bits)).
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits {
            1 => ScanPhase::InContent,
            2 => ScanPhase::SeekEnd,
            _ => ScanPhase::SeekStart,
        }
    }
}

/// End of an interpolation content region starting at `from` in text:
/// the next real tag or comment opener, or EOF. A lone `<` stays inside
/// the content.
#[allow(
    clippy::cast_possible_truncation,
    reason = "scan offsets are bounded by source_len which fits in u32"
)]
pub(crate) fn text_region_end(cursor: &Cursor<'_>, from: u32) -> u32 {
    let bytes = cursor.bytes(from, cursor.source_len());
    let mut searched = 0usize;
    while let Some(offset) = memchr::memchr(b'<', &bytes[searched..]) {
        let at = searched + offset;
        let opener = match bytes.get(at + 1) {
            Some(b) if b.is_ascii_alphabetic() => true,
            Some(b'/') => bytes.get(at + 2).is_some_and(u8::is_ascii_alphabetic),
            Some(b'!') => bytes[at + 1..].starts_with(b"!--"),
            _ => false,
        };
        if opener {
            return from + at as u32;
        }
        searched = at + 1;
    }
    cursor.source_len()
}

/// End of a quoted attribute value region starting at `from`: the closing
/// quote, or EOF for an unterminated value.
pub(crate) fn quoted_region_end(cursor: &Cursor<'_>, from: u32, quote: u8) -> u32 {
    let mut probe = *cursor;
    probe.seek(from);
    probe.find_byte(quote).unwrap_or_else(|| cursor.source_len())
}

/// End of an unquoted attribute value region starting at `from`: the next
/// whitespace byte or `>`, or EOF.
#[allow(
    clippy::cast_possible_truncation,
    reason = "scan offsets are bounded by source_len which fits in u32"
)]
pub(crate) fn unquoted_region_end(cursor: &Cursor<'_>, from: u32) -> u32 {
    let bytes = cursor.bytes(from, cursor.source_len());
    for (i, &b) in bytes.iter().enumerate() {
        if b.is_ascii_whitespace() || b == b'>' {
            return from + i as u32;
        }
    }
    cursor.source_len()
}
