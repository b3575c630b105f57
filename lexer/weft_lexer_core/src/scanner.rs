//! Hand-written markup scanner producing `(RawTag, len)` pairs.
//!
//! The scanner operates on a sentinel-terminated [`Cursor`] and produces
//! [`RawToken`] values with zero heap allocation. It recognizes tag
//! boundaries, attribute structure, comments, and text runs; it knows
//! nothing about interpolation delimiters or expansion forms — those are
//! layered on top by `weft_lexer`.
//!
//! # Design
//!
//! A seven-state machine drives a per-state dispatch. Each arm advances the
//! cursor and returns `RawToken { tag, len }`. Two arms (`AfterEq` entering
//! an unquoted value, `ValueUnq` hitting its terminator) transition state
//! without producing a token; the main loop re-dispatches so a caller never
//! sees a zero-length token.
//!
//! # Contract
//!
//! Every run-shaped token (whitespace, data, tag chars, value chars, comment
//! body) is state-preserving: consuming only part of a run and re-entering
//! the scanner at the split point yields the remainder under the same state.
//! This is what makes delimiter truncation and checkpoint restore in the
//! layer above sound. The scanner is total: any byte sequence produces a
//! defined token stream ending in `Eof`.

use crate::cursor::Cursor;
use crate::source_buffer::SourceBuffer;
use crate::tag::{RawTag, RawToken};

/// Scanner state. Fits in 4 bits for checkpoint packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Between tags: text runs, structural braces/commas, tag openers.
    Text,
    /// Inside a tag, before or between attributes.
    InTag,
    /// Just consumed `=`; expecting an attribute value.
    AfterEq,
    /// Inside a double-quoted attribute value.
    ValueDq,
    /// Inside a single-quoted attribute value.
    ValueSq,
    /// Inside an unquoted attribute value.
    ValueUnq,
    /// Inside a `<!-- ... -->` comment.
    Comment,
}

impl ScanState {
    /// Encode the state into its 4-bit wire representation.
    pub fn bits(self) -> u8 {
        match self {
            ScanState::Text => 0,
            ScanState::InTag => 1,
            ScanState::AfterEq => 2,
            ScanState::ValueDq => 3,
            ScanState::ValueSq => 4,
            ScanState::ValueUnq => 5,
            ScanState::Comment => 6,
        }
    }

    /// Decode a 4-bit wire representation. Unknown values decode to `Text`;
    /// restoring a state word captured against a different buffer is a
    /// caller-contract violation, so no error surface exists here.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            1 => ScanState::InTag,
            2 => ScanState::AfterEq,
            3 => ScanState::ValueDq,
            4 => ScanState::ValueSq,
            5 => ScanState::ValueUnq,
            6 => ScanState::Comment,
            _ => ScanState::Text,
        }
    }
}

/// Pure, allocation-free markup scanner.
///
/// Produces one token at a time as a `(tag, length)` pair. The scanner is
/// `Clone` (a [`Copy`] cursor plus one state byte), so callers can probe
/// ahead and either commit the clone or discard it.
#[derive(Clone)]
pub struct MarkupScanner<'a> {
    cursor: Cursor<'a>,
    state: ScanState,
}

/// Bytes that terminate a tag-name or attribute-name run.
fn is_tag_name_stop(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'>' | b'=' | b'/' | 0)
}

impl<'a> MarkupScanner<'a> {
    /// Create a scanner positioned at byte 0 in text state.
    pub fn new(buffer: &'a SourceBuffer) -> Self {
        Self {
            cursor: buffer.cursor(),
            state: ScanState::Text,
        }
    }

    /// Create a scanner resumed at an arbitrary `(position, state)` pair,
    /// as captured from [`pos()`](Self::pos) and [`state()`](Self::state).
    pub fn resume(buffer: &'a SourceBuffer, pos: u32, state: ScanState) -> Self {
        let mut cursor = buffer.cursor();
        cursor.seek(pos);
        Self { cursor, state }
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Current scanner state.
    #[inline]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Override the scanner state.
    ///
    /// Used by the layer above when an interpolation boundary forces a
    /// region transition the raw grammar alone would not make (an unquoted
    /// value beginning with a delimiter).
    #[inline]
    pub fn set_state(&mut self, state: ScanState) {
        self.state = state;
    }

    /// Reposition the scanner without changing state.
    ///
    /// Sound only when the target position is inside (or at the boundary
    /// of) a run belonging to the current state; all run-shaped tokens are
    /// state-preserving, so truncating a run and seeking to the split point
    /// is always valid.
    #[inline]
    pub fn seek(&mut self, pos: u32) {
        self.cursor.seek(pos);
    }

    /// A copy of the underlying cursor (cheap; [`Cursor`] is `Copy`).
    #[inline]
    pub fn cursor(&self) -> Cursor<'a> {
        self.cursor
    }

    /// Produce the next raw token.
    ///
    /// Returns `RawTag::Eof` with `len == 0` when the source is exhausted.
    /// Subsequent calls after EOF continue to return `Eof`.
    pub fn next_token(&mut self) -> RawToken {
        loop {
            if self.cursor.is_eof() {
                return RawToken {
                    tag: RawTag::Eof,
                    len: 0,
                };
            }
            let start = self.cursor.pos();
            let produced = match self.state {
                ScanState::Text => self.text(start),
                ScanState::InTag => Some(self.in_tag(start)),
                ScanState::AfterEq => self.after_eq(start),
                ScanState::ValueDq => Some(self.quoted_value(start, b'"')),
                ScanState::ValueSq => Some(self.quoted_value(start, b'\'')),
                ScanState::ValueUnq => self.unquoted_value(start),
                ScanState::Comment => Some(self.comment(start)),
            };
            if let Some(token) = produced {
                return token;
            }
            // State transitioned without consuming input; re-dispatch.
        }
    }

    // ─── Text state ───

    fn text(&mut self, start: u32) -> Option<RawToken> {
        let token = match self.cursor.current() {
            b'{' => self.single(RawTag::LBrace),
            b'}' => self.single(RawTag::RBrace),
            b',' => self.single(RawTag::Comma),
            b'<' if self.at_tag_opener() => self.tag_opener(start),
            _ => self.text_run(start),
        };
        Some(token)
    }

    /// Is the `<` at the cursor a real tag or comment opener?
    ///
    /// `<` followed by anything else (`< a`, `<3`, `<`, `</ x`) is ordinary
    /// text and joins the surrounding data run.
    fn at_tag_opener(&self) -> bool {
        self.cursor.peek().is_ascii_alphabetic()
            || (self.cursor.peek() == b'/' && self.cursor.peek2().is_ascii_alphabetic())
            || self.cursor.starts_with(b"<!--")
    }

    fn tag_opener(&mut self, start: u32) -> RawToken {
        if self.cursor.peek().is_ascii_alphabetic() {
            self.cursor.advance();
            self.state = ScanState::InTag;
            return self.token(RawTag::TagStart, start);
        }
        if self.cursor.peek() == b'/' {
            self.cursor.advance_n(2);
            self.state = ScanState::InTag;
            return self.token(RawTag::EndTagStart, start);
        }
        // `<!--`
        self.cursor.advance_n(4);
        self.state = ScanState::Comment;
        self.token(RawTag::Comment, start)
    }

    /// Consume a maximal text run: everything up to the next structural
    /// byte (`{`, `}`, `,`), real tag opener, or EOF. The run is
    /// `Whitespace` only when every byte is ASCII whitespace; runs are
    /// otherwise whitespace-inclusive (`"a b"` is one `DataChars` run).
    fn text_run(&mut self, start: u32) -> RawToken {
        let mut all_whitespace = true;
        loop {
            let b = self.cursor.current();
            match b {
                0 if self.cursor.is_eof() => break,
                b'{' | b'}' | b',' => break,
                b'<' if self.at_tag_opener() => break,
                _ => {
                    all_whitespace &= b.is_ascii_whitespace();
                    self.cursor.advance();
                }
            }
        }
        let tag = if all_whitespace {
            RawTag::Whitespace
        } else {
            RawTag::DataChars
        };
        self.token(tag, start)
    }

    // ─── In-tag state ───

    fn in_tag(&mut self, start: u32) -> RawToken {
        let b = self.cursor.current();
        if b.is_ascii_whitespace() {
            self.cursor.eat_while(|b| b.is_ascii_whitespace());
            return self.token(RawTag::Whitespace, start);
        }
        match b {
            b'>' => {
                self.cursor.advance();
                self.state = ScanState::Text;
                self.token(RawTag::TagEnd, start)
            }
            b'/' if self.cursor.peek() == b'>' => {
                self.cursor.advance_n(2);
                self.state = ScanState::Text;
                self.token(RawTag::EmptyTagEnd, start)
            }
            b'=' => {
                self.cursor.advance();
                self.state = ScanState::AfterEq;
                self.token(RawTag::Eq, start)
            }
            _ => {
                self.cursor.eat_while(|b| !is_tag_name_stop(b));
                if self.cursor.pos() == start {
                    // Stray `/` not part of `/>`, or an interior null:
                    // consume one byte as name characters.
                    self.cursor.advance();
                }
                self.token(RawTag::TagChars, start)
            }
        }
    }

    // ─── Attribute value states ───

    fn after_eq(&mut self, start: u32) -> Option<RawToken> {
        let b = self.cursor.current();
        if b.is_ascii_whitespace() {
            self.cursor.eat_while(|b| b.is_ascii_whitespace());
            return Some(self.token(RawTag::Whitespace, start));
        }
        match b {
            b'"' => {
                self.cursor.advance();
                self.state = ScanState::ValueDq;
                Some(self.token(RawTag::AttrValueStart, start))
            }
            b'\'' => {
                self.cursor.advance();
                self.state = ScanState::ValueSq;
                Some(self.token(RawTag::AttrValueStart, start))
            }
            b'>' => {
                self.cursor.advance();
                self.state = ScanState::Text;
                Some(self.token(RawTag::TagEnd, start))
            }
            b'/' if self.cursor.peek() == b'>' => {
                self.cursor.advance_n(2);
                self.state = ScanState::Text;
                Some(self.token(RawTag::EmptyTagEnd, start))
            }
            _ => {
                // Unquoted value begins; re-dispatch without a token.
                self.state = ScanState::ValueUnq;
                None
            }
        }
    }

    fn quoted_value(&mut self, start: u32, quote: u8) -> RawToken {
        if self.cursor.current() == quote {
            self.cursor.advance();
            self.state = ScanState::InTag;
            return self.token(RawTag::AttrValueEnd, start);
        }
        // Value content runs to the closing quote or EOF. Newlines and
        // interior nulls are ordinary value bytes.
        let end = self
            .cursor
            .find_byte(quote)
            .unwrap_or_else(|| self.cursor.source_len());
        self.cursor.seek(end);
        self.token(RawTag::AttrValueChars, start)
    }

    fn unquoted_value(&mut self, start: u32) -> Option<RawToken> {
        let b = self.cursor.current();
        if b.is_ascii_whitespace() || b == b'>' {
            // Terminator is not part of the value; hand it to InTag.
            self.state = ScanState::InTag;
            return None;
        }
        loop {
            let b = self.cursor.current();
            if b == 0 && self.cursor.is_eof() {
                break;
            }
            if b.is_ascii_whitespace() || b == b'>' {
                break;
            }
            self.cursor.advance();
        }
        Some(self.token(RawTag::AttrValueChars, start))
    }

    // ─── Comment state ───

    fn comment(&mut self, start: u32) -> RawToken {
        if self.cursor.starts_with(b"-->") {
            self.cursor.advance_n(3);
            self.state = ScanState::Text;
            return self.token(RawTag::Comment, start);
        }
        // Body runs to the FIRST `-->` occurrence: `<!-- x ---->` keeps the
        // surplus dashes in the body. Unterminated comments run to EOF.
        let end = self
            .cursor
            .find(b"-->")
            .unwrap_or_else(|| self.cursor.source_len());
        self.cursor.seek(end);
        self.token(RawTag::Comment, start)
    }

    // ─── Helpers ───

    fn single(&mut self, tag: RawTag) -> RawToken {
        self.cursor.advance();
        RawToken { tag, len: 1 }
    }

    fn token(&self, tag: RawTag, start: u32) -> RawToken {
        RawToken {
            tag,
            len: self.cursor.pos() - start,
        }
    }
}
