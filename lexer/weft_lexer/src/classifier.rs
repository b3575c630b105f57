//! Raw-token reclassification.
//!
//! The classifier sits between the raw markup scanner and the merge layer.
//! It turns `(RawTag, len)` pairs into spanned [`Token`]s and layers on the
//! two features the raw grammar knows nothing about:
//!
//! - **Interpolation.** In any region that can host one (text and all
//!   attribute value forms), a start-delimiter match wins over whatever the
//!   raw scanner would have produced at that offset, including structural
//!   expansion braces. Runs that contain a delimiter are truncated at it so
//!   the delimiter lands on a token boundary.
//! - **Expansion forms.** Structural `{` / `}` / `,` in text become
//!   expansion tokens when recognition is enabled, with a saturating
//!   nesting level; when disabled they are rewritten to data characters
//!   and left for the merge layer to coalesce.
//!
//! # Contract
//!
//! The classifier probes with a cloned scanner and commits only on the
//! paths that consume raw tokens whole; truncation paths reposition the
//! live scanner inside the run instead, relying on runs being
//! state-preserving.

use memchr::memmem;
use weft_lexer_core::{MarkupScanner, RawTag, ScanState, SourceBuffer};

use crate::delimiters::DelimiterConfig;
use crate::expansion::ExpansionTracker;
use crate::interpolation::{
    quoted_region_end, text_region_end, unquoted_region_end, ScanPhase,
};
use crate::token::{Token, TokenKind};

/// Can an interpolation start in a region with this scanner state?
fn hosts_interpolation(state: ScanState) -> bool {
    matches!(
        state,
        ScanState::Text
            | ScanState::AfterEq
            | ScanState::ValueDq
            | ScanState::ValueSq
            | ScanState::ValueUnq
    )
}

/// Raw tags a start delimiter may begin at.
fn delimiter_can_begin_at(tag: RawTag) -> bool {
    matches!(
        tag,
        RawTag::Whitespace
            | RawTag::DataChars
            | RawTag::AttrValueChars
            | RawTag::LBrace
            | RawTag::RBrace
            | RawTag::Comma
    )
}

/// Raw tags shaped as runs a delimiter may occur inside of.
fn run_shaped(tag: RawTag) -> bool {
    matches!(
        tag,
        RawTag::Whitespace | RawTag::DataChars | RawTag::AttrValueChars
    )
}

#[derive(Clone)]
pub(crate) struct Classifier<'a> {
    pub(crate) scanner: MarkupScanner<'a>,
    pub(crate) phase: ScanPhase,
    pub(crate) expansion: ExpansionTracker,
}

impl<'a> Classifier<'a> {
    pub(crate) fn new(buffer: &'a SourceBuffer, expansion_forms: bool) -> Self {
        Self {
            scanner: MarkupScanner::new(buffer),
            phase: ScanPhase::SeekStart,
            expansion: ExpansionTracker::new(expansion_forms),
        }
    }

    pub(crate) fn resume(
        buffer: &'a SourceBuffer,
        offset: u32,
        scan: ScanState,
        phase: ScanPhase,
        expansion_level: u8,
        expansion_forms: bool,
    ) -> Self {
        Self {
            scanner: MarkupScanner::resume(buffer, offset, scan),
            phase,
            expansion: ExpansionTracker::resume(expansion_forms, expansion_level),
        }
    }

    /// Does the start delimiter match the source at `offset`?
    pub(crate) fn delimiter_at(&self, delimiters: &DelimiterConfig, offset: u32) -> bool {
        let mut cursor = self.scanner.cursor();
        cursor.seek(offset);
        cursor.starts_with(delimiters.start_bytes())
    }

    /// Produce the next classified token, or `None` at end of input.
    pub(crate) fn next(&mut self, delimiters: &DelimiterConfig) -> Option<Token> {
        loop {
            match self.phase {
                // `seek_start` returns `None` only at EOF.
                ScanPhase::SeekStart => return self.seek_start(delimiters),
                // `content` returns `None` for zero-width steps, with the
                // phase advanced; loop to take the next step.
                ScanPhase::InContent => {
                    if let Some(token) = self.content(delimiters) {
                        return Some(token);
                    }
                }
                ScanPhase::SeekEnd => return Some(self.end_delimiter(delimiters)),
            }
        }
    }

    // ─── SeekStart ───

    /// Scan one raw token, intercepting interpolation starts.
    ///
    /// Returns `None` only at EOF.
    fn seek_start(&mut self, delimiters: &DelimiterConfig) -> Option<Token> {
        let start = self.scanner.pos();
        let state = self.scanner.state();
        let mut probe = self.scanner.clone();
        let raw = probe.next_token();
        if raw.tag == RawTag::Eof {
            return None;
        }
        let end = start + raw.len;

        if hosts_interpolation(state) && delimiter_can_begin_at(raw.tag) {
            if self.delimiter_at(delimiters, start) {
                return Some(self.enter_content(delimiters, start, state));
            }
            if run_shaped(raw.tag) {
                // The delimiter may begin inside the run (and extend past
                // its end); truncate the run so the delimiter starts on a
                // token boundary.
                let window_end = (end - 1).saturating_add(delimiters.start_len());
                if let Some(at) = self.find(delimiters.start_bytes(), start + 1, window_end) {
                    let kind = self.truncated_kind(raw.tag, start, at);
                    self.scanner.seek(at);
                    return Some(Token::new(kind, start, at));
                }
            }
        }

        self.scanner = probe;
        Some(self.map_raw(raw.tag, start, end))
    }

    fn enter_content(
        &mut self,
        delimiters: &DelimiterConfig,
        start: u32,
        state: ScanState,
    ) -> Token {
        self.scanner.seek(start + delimiters.start_len());
        if state == ScanState::AfterEq {
            // A delimiter directly after `=` begins an unquoted value.
            self.scanner.set_state(ScanState::ValueUnq);
        }
        self.phase = ScanPhase::InContent;
        Token::new(
            TokenKind::InterpolationStart,
            start,
            start + delimiters.start_len(),
        )
    }

    /// Kind of a truncated run prefix. A data run whose prefix is all
    /// whitespace becomes a whitespace token.
    fn truncated_kind(&self, tag: RawTag, start: u32, end: u32) -> TokenKind {
        match tag {
            RawTag::AttrValueChars => TokenKind::AttrValueChars,
            RawTag::Whitespace => TokenKind::Whitespace,
            _ => {
                let bytes = self.scanner.cursor().bytes(start, end);
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    TokenKind::Whitespace
                } else {
                    TokenKind::DataChars
                }
            }
        }
    }

    fn map_raw(&mut self, tag: RawTag, start: u32, end: u32) -> Token {
        let kind = match tag {
            RawTag::Whitespace => TokenKind::Whitespace,
            RawTag::TagStart => TokenKind::TagStart,
            RawTag::EndTagStart => TokenKind::EndTagStart,
            RawTag::TagEnd => TokenKind::TagEnd,
            RawTag::EmptyTagEnd => TokenKind::EmptyTagEnd,
            RawTag::TagChars => TokenKind::TagChars,
            RawTag::Eq => TokenKind::Eq,
            RawTag::AttrValueStart => TokenKind::AttrValueStart,
            RawTag::AttrValueChars => TokenKind::AttrValueChars,
            RawTag::AttrValueEnd => TokenKind::AttrValueEnd,
            RawTag::Comment => TokenKind::Comment,
            RawTag::LBrace if self.expansion.enabled() => {
                self.expansion.open();
                TokenKind::ExpansionLBrace
            }
            RawTag::RBrace if self.expansion.enabled() => {
                self.expansion.close();
                TokenKind::ExpansionRBrace
            }
            RawTag::Comma if self.expansion.enabled() => TokenKind::ExpansionComma,
            // With expansion recognition off the structural bytes are
            // ordinary text; the merge layer coalesces them with their
            // neighbors. Eof is handled before mapping.
            RawTag::DataChars | RawTag::LBrace | RawTag::RBrace | RawTag::Comma | RawTag::Eof => {
                TokenKind::DataChars
            }
        };
        Token::new(kind, start, end)
    }

    // ─── InContent ───

    /// Emit interpolation content up to the end delimiter, or an
    /// unterminated token when the enclosing region runs out first.
    ///
    /// Returns `None` (with the phase advanced) for zero-width steps: an
    /// end delimiter immediately at the cursor, or an empty region.
    fn content(&mut self, delimiters: &DelimiterConfig) -> Option<Token> {
        let pos = self.scanner.pos();
        let cursor = self.scanner.cursor();
        let region_end = match self.scanner.state() {
            ScanState::Text => text_region_end(&cursor, pos),
            ScanState::ValueDq => quoted_region_end(&cursor, pos, b'"'),
            ScanState::ValueSq => quoted_region_end(&cursor, pos, b'\''),
            ScanState::ValueUnq => unquoted_region_end(&cursor, pos),
            // Content never starts in these states; restoring a corrupted
            // state word can land here, in which case the region is empty.
            ScanState::InTag | ScanState::AfterEq | ScanState::Comment => pos,
        };
        match self.find(delimiters.end_bytes(), pos, region_end) {
            Some(at) if at == pos => {
                self.phase = ScanPhase::SeekEnd;
                None
            }
            Some(at) => {
                self.scanner.seek(at);
                self.phase = ScanPhase::SeekEnd;
                Some(Token::new(TokenKind::InterpolationContent, pos, at))
            }
            None => {
                self.phase = ScanPhase::SeekStart;
                if region_end > pos {
                    self.scanner.seek(region_end);
                    Some(Token::new(
                        TokenKind::UnterminatedInterpolation,
                        pos,
                        region_end,
                    ))
                } else {
                    None
                }
            }
        }
    }

    fn end_delimiter(&mut self, delimiters: &DelimiterConfig) -> Token {
        let pos = self.scanner.pos();
        let end = pos + delimiters.end_len();
        self.scanner.seek(end);
        self.phase = ScanPhase::SeekStart;
        Token::new(TokenKind::InterpolationEnd, pos, end)
    }

    // ─── Helpers ───

    /// Find `needle` in `[from, to)` of the source, returning the absolute
    /// match offset. The match must lie entirely within the source; `to` is
    /// clamped to it.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "match offsets are bounded by source_len which fits in u32"
    )]
    fn find(&self, needle: &[u8], from: u32, to: u32) -> Option<u32> {
        let cursor = self.scanner.cursor();
        let to = to.min(cursor.source_len());
        if from >= to {
            return None;
        }
        memmem::find(cursor.bytes(from, to), needle).map(|i| from + i as u32)
    }
}
