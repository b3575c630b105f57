//! Zero-cost cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte-by-byte. EOF is detected
//! when the current byte equals the sentinel (`0x00`) and the position
//! has reached or exceeded the source length. No explicit bounds checking
//! is performed in the common case -- the sentinel guarantees safe termination.
//!
//! # Interior Null Bytes
//!
//! If the source contains interior null bytes (U+0000), the cursor
//! distinguishes them from EOF by comparing `pos` against `source_len`.
//! A null at `pos < source_len` is ordinary content; a null at
//! `pos >= source_len` is the sentinel (EOF).

/// Zero-cost cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], enabling cheap state snapshots for backtracking
/// and resumable scanning.
///
/// # Invariant
///
/// `buf` must be sentinel-terminated: `buf[source_len] == 0x00`, and all
/// bytes after `source_len` are `0x00` (cache-line padding). This is
/// guaranteed by [`SourceBuffer`](crate::SourceBuffer) construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Length of actual source content (excludes sentinel and padding).
    source_len: u32,
}

/// Size assertion: Cursor should be <= 24 bytes on 64-bit platforms.
/// &[u8] = 16 (fat pointer), u32 = 4, u32 = 4 => 24 bytes.
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    /// Create a new cursor at position 0 over a sentinel-terminated buffer.
    ///
    /// # Contract
    ///
    /// `buf[source_len]` must be `0x00` (sentinel). All bytes after the
    /// sentinel must also be `0x00` (padding). This is guaranteed by
    /// `SourceBuffer::new()`.
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Returns the byte at the current position.
    ///
    /// Returns `0x00` when at EOF (the sentinel byte). Interior null bytes
    /// also return `0x00`; use [`is_eof()`](Self::is_eof) to distinguish.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Returns the byte one position ahead of current.
    ///
    /// Safe to call at any position: the sentinel and cache-line padding
    /// guarantee valid reads beyond the source content.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    /// Returns the byte two positions ahead of current.
    ///
    /// Safe to call at any position: cache-line alignment provides at least
    /// one full cache line of zero padding after the sentinel.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.buf[self.pos as usize + 2]
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advance the cursor by `n` bytes.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Reposition the cursor to an absolute byte offset.
    ///
    /// Positions past the source content are clamped to `source_len`, so a
    /// seek can never leave the cursor outside the sentinel-guarded region.
    #[inline]
    pub fn seek(&mut self, pos: u32) {
        self.pos = pos.min(self.source_len);
    }

    /// Returns `true` if the cursor has reached EOF.
    ///
    /// EOF is when the current byte is the sentinel (`0x00`) and the
    /// position is at or past the source length. This distinguishes
    /// EOF from interior null bytes.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Length of the source content (excludes sentinel and padding).
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Extract a source byte range.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content (`end <= source_len`).
    pub fn bytes(&self, start: u32, end: u32) -> &'a [u8] {
        debug_assert!(
            end <= self.source_len,
            "range end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "range start {start} exceeds end {end}");
        &self.buf[start as usize..end as usize]
    }

    /// Extract a source substring as `&str`.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content (`end <= source_len`)
    /// and on valid UTF-8 character boundaries. This is guaranteed when
    /// `start` and `end` come from the scanner's token boundary tracking,
    /// since the source was originally valid UTF-8 (`&str`).
    #[allow(
        unsafe_code,
        reason = "from_utf8_unchecked on source originally validated as &str"
    )]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        // SAFETY: The source buffer was constructed from `&str` (valid UTF-8).
        // The scanner ensures start..end falls on character boundaries within
        // the source content.
        unsafe { std::str::from_utf8_unchecked(self.bytes(start, end)) }
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// The sentinel byte (`0x00`) naturally terminates the loop for all
    /// reasonable predicates, as `pred(0)` should return `false`.
    ///
    /// # Contract
    ///
    /// `pred(0)` must return `false`. This is true for all standard byte
    /// classification predicates (`is_ascii_alphanumeric`, `is_ascii_whitespace`,
    /// etc.). If `pred(0)` returns `true`, the cursor advances into the
    /// zero-filled padding region but will eventually stop (all padding is `0x00`,
    /// and Rust's bounds checking prevents out-of-bounds access).
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Returns `true` if the source content beginning at the current
    /// position starts with `needle`.
    ///
    /// Only matches within source content; the sentinel and padding never
    /// participate in a match.
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.buf[self.pos as usize..self.source_len as usize].starts_with(needle)
    }

    /// Find the absolute position of the next occurrence of `byte` at or
    /// after the current position, using SIMD-accelerated search.
    ///
    /// Scans only within source content (not into sentinel/padding).
    #[allow(
        clippy::cast_possible_truncation,
        reason = "match offset <= source_len which fits in u32"
    )]
    pub fn find_byte(&self, byte: u8) -> Option<u32> {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        memchr::memchr(byte, remaining).map(|off| self.pos + off as u32)
    }

    /// Find the absolute position of the next occurrence of `needle` at or
    /// after the current position, using SIMD-accelerated substring search.
    ///
    /// Scans only within source content (not into sentinel/padding).
    #[allow(
        clippy::cast_possible_truncation,
        reason = "match offset <= source_len which fits in u32"
    )]
    pub fn find(&self, needle: &[u8]) -> Option<u32> {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        memchr::memmem::find(remaining, needle).map(|off| self.pos + off as u32)
    }
}

#[cfg(test)]
mod tests {
    use crate::SourceBuffer;

    // === Basic Navigation ===

    #[test]
    fn current_returns_first_byte() {
        let buf = SourceBuffer::new("abc");
        let cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
    }

    #[test]
    fn advance_moves_forward() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn advance_n_moves_multiple() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(3);
        assert_eq!(cursor.current(), b'd');
        assert_eq!(cursor.pos(), 3);
    }

    // === Peek ===

    #[test]
    fn peek_returns_next_byte() {
        let buf = SourceBuffer::new("abc");
        let cursor = buf.cursor();
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(cursor.peek2(), b'c');
    }

    #[test]
    fn peek_near_end_returns_sentinel() {
        let buf = SourceBuffer::new("ab");
        let mut cursor = buf.cursor();
        cursor.advance(); // at 'b'
        assert_eq!(cursor.peek(), 0); // sentinel
        assert_eq!(cursor.peek2(), 0); // padding
    }

    // === EOF Detection ===

    #[test]
    fn is_eof_at_sentinel() {
        let buf = SourceBuffer::new("x");
        let mut cursor = buf.cursor();
        assert!(!cursor.is_eof());
        cursor.advance(); // past 'x', at sentinel
        assert!(cursor.is_eof());
    }

    #[test]
    fn is_eof_on_empty_source() {
        let buf = SourceBuffer::new("");
        let cursor = buf.cursor();
        assert!(cursor.is_eof());
    }

    #[test]
    fn interior_null_is_not_eof() {
        let buf = SourceBuffer::new("a\0b");
        let mut cursor = buf.cursor();
        cursor.advance(); // at '\0' (interior null)
        assert_eq!(cursor.current(), 0);
        assert!(!cursor.is_eof()); // pos=1 < source_len=3
        cursor.advance(); // at 'b'
        assert_eq!(cursor.current(), b'b');
    }

    // === Seek ===

    #[test]
    fn seek_repositions() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.seek(4);
        assert_eq!(cursor.current(), b'e');
        cursor.seek(1);
        assert_eq!(cursor.current(), b'b');
    }

    #[test]
    fn seek_clamps_to_source_len() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        cursor.seek(100);
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
    }

    // === Slice ===

    #[test]
    fn slice_extracts_substring() {
        let buf = SourceBuffer::new("hello world");
        let cursor = buf.cursor();
        assert_eq!(cursor.slice(0, 5), "hello");
        assert_eq!(cursor.slice(6, 11), "world");
        assert_eq!(cursor.slice(2, 2), "");
    }

    #[test]
    fn bytes_extracts_range() {
        let buf = SourceBuffer::new("hello");
        let cursor = buf.cursor();
        assert_eq!(cursor.bytes(1, 4), b"ell");
    }

    // === eat_while ===

    #[test]
    fn eat_while_consumes_matching_bytes() {
        let buf = SourceBuffer::new("aaabbb");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'a');
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.current(), b'b');
    }

    #[test]
    fn eat_while_stops_at_sentinel() {
        let buf = SourceBuffer::new("aaa");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'a');
        assert_eq!(cursor.pos(), 3);
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_while_no_match() {
        let buf = SourceBuffer::new("hello");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'z');
        assert_eq!(cursor.pos(), 0); // didn't move
    }

    // === starts_with ===

    #[test]
    fn starts_with_matches_at_position() {
        let buf = SourceBuffer::new("<!-- x -->");
        let mut cursor = buf.cursor();
        assert!(cursor.starts_with(b"<!--"));
        assert!(!cursor.starts_with(b"-->"));
        cursor.seek(7);
        assert!(cursor.starts_with(b"-->"));
    }

    #[test]
    fn starts_with_never_matches_into_padding() {
        let buf = SourceBuffer::new("ab");
        let mut cursor = buf.cursor();
        cursor.advance(); // at 'b'
        // "b\0" would match against sentinel if padding leaked into the search
        assert!(!cursor.starts_with(b"b\0"));
        assert!(cursor.starts_with(b"b"));
    }

    // === find / find_byte ===

    #[test]
    fn find_byte_returns_absolute_position() {
        let buf = SourceBuffer::new("hello world");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.find_byte(b' '), Some(5));
        cursor.seek(6);
        assert_eq!(cursor.find_byte(b' '), None);
        assert_eq!(cursor.find_byte(b'd'), Some(10));
    }

    #[test]
    fn find_returns_absolute_position() {
        let buf = SourceBuffer::new("ab }} cd }}");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.find(b"}}"), Some(3));
        cursor.seek(5);
        assert_eq!(cursor.find(b"}}"), Some(9));
    }

    #[test]
    fn find_misses_cleanly() {
        let buf = SourceBuffer::new("abc");
        let cursor = buf.cursor();
        assert_eq!(cursor.find(b"}}"), None);
    }

    // === Copy Semantics ===

    #[test]
    fn cursor_is_copy_for_checkpointing() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);

        // Snapshot via Copy
        let saved = cursor;

        // Advance original
        cursor.advance_n(3);
        assert_eq!(cursor.pos(), 5);

        // Saved is still at old position
        assert_eq!(saved.pos(), 2);
        assert_eq!(saved.current(), b'c');
    }
}
