//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! allowing the scanner to detect EOF without explicit bounds checking.
//! The total buffer size is rounded up to the next 64-byte boundary for
//! cache-line alignment, which also provides safe padding for `peek()`
//! and `peek2()` operations near the end of the buffer.
//!
//! Interior null bytes are ordinary content: the lexer is total over any
//! byte sequence, so there is no encoding validation here. A null at a
//! position before the source length is data; the null at the source
//! length is the sentinel.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer for zero-bounds-check scanning.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
///
/// The sentinel byte at `source_len` is always `0x00`. All subsequent bytes
/// (cache-line padding) are also `0x00`, ensuring safe reads for `peek()`
/// and `peek2()` near the end of the buffer.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
}

/// Size assertion: `SourceBuffer` should be 32 bytes on 64-bit platforms.
/// Vec<u8> = 24, u32 = 4, + 4 padding = 32.
const _: () = assert!(std::mem::size_of::<SourceBuffer>() <= 32);

impl SourceBuffer {
    /// Create a new sentinel-terminated buffer from source text.
    ///
    /// Copies the source bytes into a cache-line-aligned buffer with a
    /// `0x00` sentinel byte appended.
    ///
    /// # File Size
    ///
    /// Sources larger than `u32::MAX` bytes (~4 GiB) are accepted but the
    /// `source_len` field saturates at `u32::MAX`; callers of that size are
    /// expected to chunk their input upstream.
    pub fn new(source: &str) -> Self {
        let source_bytes = source.as_bytes();
        let source_len = source_bytes.len();

        // Round up to next 64-byte boundary (minimum: source + 1 sentinel byte).
        let padded_len = (source_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        // Allocate zero-filled buffer, then copy source bytes.
        // The sentinel (buf[source_len]) and padding are already 0x00.
        let mut buf = vec![0u8; padded_len];
        buf[..source_len].copy_from_slice(source_bytes);

        let source_len_u32 = u32::try_from(source_len).unwrap_or(u32::MAX);

        Self {
            buf,
            source_len: source_len_u32,
        }
    }

    /// Returns the source bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Returns the full buffer including sentinel and cache-line padding.
    ///
    /// The byte at index [`len()`](Self::len) is the sentinel (`0x00`).
    /// Subsequent bytes are zero-filled padding up to the next 64-byte boundary.
    pub fn as_sentinel_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes (excludes sentinel and padding).
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source content is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Extract a source substring as `&str`.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content (`end <= len()`)
    /// and on valid UTF-8 character boundaries. Token boundaries produced
    /// by the scanner always satisfy this: every boundary sits on an ASCII
    /// structural byte, and the source was originally valid UTF-8 (`&str`).
    #[allow(
        unsafe_code,
        reason = "from_utf8_unchecked on source originally validated as &str"
    )]
    pub fn slice(&self, start: u32, end: u32) -> &str {
        debug_assert!(
            end <= self.source_len,
            "slice end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        // SAFETY: The buffer was constructed from `&str` (valid UTF-8), and
        // scanner token boundaries fall on ASCII byte positions within the
        // source content.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Construction ===

    #[test]
    fn empty_source() {
        let buf = SourceBuffer::new("");
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(buf.as_bytes().is_empty());
        // Sentinel present at index 0
        assert_eq!(buf.as_sentinel_bytes()[0], 0);
    }

    #[test]
    fn ascii_source() {
        let buf = SourceBuffer::new("<div>");
        assert_eq!(buf.len(), 5);
        assert!(!buf.is_empty());
        assert_eq!(buf.as_bytes(), b"<div>");
        // Sentinel after source bytes
        assert_eq!(buf.as_sentinel_bytes()[5], 0);
    }

    #[test]
    fn utf8_multibyte_source() {
        let source = "hi \u{1F600} bye"; // emoji is 4 bytes
        let buf = SourceBuffer::new(source);
        assert_eq!(buf.len() as usize, source.len());
        assert_eq!(buf.as_bytes(), source.as_bytes());
    }

    #[test]
    fn interior_null_is_content() {
        let buf = SourceBuffer::new("a\0b");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_bytes(), b"a\0b");
    }

    // === Cache-Line Alignment ===

    #[test]
    fn buffer_aligned_to_cache_line() {
        for len in [0, 1, 10, 63, 64, 65, 127, 128, 1000] {
            let source: String = "x".repeat(len);
            let buf = SourceBuffer::new(&source);
            assert_eq!(
                buf.as_sentinel_bytes().len() % CACHE_LINE,
                0,
                "buffer length {} is not cache-line aligned for source length {}",
                buf.as_sentinel_bytes().len(),
                len
            );
        }
    }

    #[test]
    fn sentinel_and_padding_are_zero() {
        let buf = SourceBuffer::new("abc");
        let sentinel_bytes = buf.as_sentinel_bytes();
        for &b in &sentinel_bytes[3..] {
            assert_eq!(b, 0, "non-zero byte in sentinel/padding region");
        }
    }

    // === Slice ===

    #[test]
    fn slice_extracts_substring() {
        let buf = SourceBuffer::new("hello world");
        assert_eq!(buf.slice(0, 5), "hello");
        assert_eq!(buf.slice(6, 11), "world");
        assert_eq!(buf.slice(2, 2), "");
    }

    // === Large Source ===

    #[test]
    fn large_source() {
        let source: String = "x".repeat(100_000);
        let buf = SourceBuffer::new(&source);
        assert_eq!(buf.len(), 100_000);
        assert_eq!(buf.as_sentinel_bytes()[100_000], 0);
        assert_eq!(buf.as_sentinel_bytes().len() % CACHE_LINE, 0);
    }

    // === Cursor Creation ===

    #[test]
    fn cursor_starts_at_zero() {
        let buf = SourceBuffer::new("hello");
        let cursor = buf.cursor();
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.current(), b'h');
    }

    #[test]
    fn cursor_on_empty_source_is_eof() {
        let buf = SourceBuffer::new("");
        let cursor = buf.cursor();
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), 0);
    }
}
