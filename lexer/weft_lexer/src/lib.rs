//! Template lexer: markup structure, interpolation, expansion forms, and
//! embedded expression values over one shared source buffer.
//!
//! # Architecture
//!
//! ```text
//!  &str ──> SourceBuffer ──> MarkupScanner ──> Classifier ──> TemplateLexer
//!           (sentinel)       (raw markup)      (interp. +     (merge, value
//!                                               expansion)     dispatch)
//! ```
//!
//! The raw scanner lives in `weft_lexer_core` and knows only markup
//! structure. This crate layers three things on top:
//!
//! - the classifier intercepts interpolation delimiters and expansion
//!   braces, producing spanned [`Token`]s;
//! - the merge pass coalesces adjacent run tokens under a [`MergePolicy`];
//! - the [`TemplateLexer`] watches attribute names, and mounts an embedded
//!   [`ExpressionLexer`] over binding attribute values so their content is
//!   lexed as an expression instead of markup.
//!
//! # Contract
//!
//! The lexer is total: every byte sequence yields a defined token stream.
//! Tokens are contiguous and strictly ordered; concatenating their lexemes
//! reproduces the source. [`TemplateLexer::save`] captures a resumable
//! [`Checkpoint`] after any token, and [`TemplateLexer::restore`] continues
//! the stream exactly where the checkpoint was taken.

mod attributes;
mod checkpoint;
mod classifier;
mod delimiters;
mod dispatch;
mod expansion;
mod expression;
mod interpolation;
mod merger;
mod token;

pub use weft_lexer_core::SourceBuffer;

pub use crate::attributes::{classify, AttributeClassification};
pub use crate::checkpoint::Checkpoint;
pub use crate::delimiters::{DelimiterConfig, DelimiterConfigError};
pub use crate::expression::ExpressionLexer;
pub use crate::merger::{MergePolicy, MergeSet};
pub use crate::token::{Span, Token, TokenKind};

use weft_lexer_core::ScanState;

use crate::checkpoint::LexerState;
use crate::classifier::Classifier;
use crate::dispatch::{DispatchState, Dispatcher};
use crate::interpolation::{quoted_region_end, unquoted_region_end};

/// Streaming template lexer with a one-token lookahead interface.
///
/// `current()` is the token under consideration; `advance()` moves to the
/// next. The lexer owns the layered state (scanner, interpolation phase,
/// expansion level, value dispatch, embedded sub-lexer) and exposes it only
/// through [`save`](Self::save) / [`restore`](Self::restore).
pub struct TemplateLexer<'a> {
    source: &'a SourceBuffer,
    delimiters: DelimiterConfig,
    classifier: Classifier<'a>,
    policy: MergePolicy,
    dispatcher: Dispatcher,
    embedded: Option<ExpressionLexer<'a>>,
    current: Option<Token>,
}

impl<'a> TemplateLexer<'a> {
    /// Lex `source` with the default merge policy.
    pub fn new(source: &'a SourceBuffer, delimiters: DelimiterConfig, expansion_forms: bool) -> Self {
        Self::with_policy(source, delimiters, expansion_forms, MergePolicy::default())
    }

    /// Lex `source` with an explicit merge policy.
    pub fn with_policy(
        source: &'a SourceBuffer,
        delimiters: DelimiterConfig,
        expansion_forms: bool,
        policy: MergePolicy,
    ) -> Self {
        let mut lexer = Self {
            source,
            delimiters,
            classifier: Classifier::new(source, expansion_forms),
            policy,
            dispatcher: Dispatcher::new(),
            embedded: None,
            current: None,
        };
        lexer.current = lexer.next_classified();
        lexer
    }

    /// The token under consideration, or `None` past the end of input.
    pub fn current(&self) -> Option<Token> {
        self.current
    }

    /// Kind of the current token.
    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current.map(|token| token.kind)
    }

    /// Span of the current token.
    pub fn current_span(&self) -> Option<Span> {
        self.current.map(|token| token.span)
    }

    /// Whether the input is exhausted.
    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Move to the next token.
    pub fn advance(&mut self) {
        self.current = self.next_classified();
    }

    /// The lexeme of `span` in the shared source.
    pub fn text(&self, span: Span) -> &'a str {
        self.source.slice(span.start, span.end)
    }

    // ─── Checkpointing ───

    /// Capture a resume point at the boundary after the current token.
    ///
    /// After [`restore`](Self::restore), `current()` is the token that
    /// followed the current one when the checkpoint was taken.
    pub fn save(&self) -> Checkpoint {
        let offset = self
            .embedded
            .as_ref()
            .map_or(self.classifier.scanner.pos(), ExpressionLexer::pos);
        let state = LexerState {
            scan: self.classifier.scanner.state(),
            phase: self.classifier.phase,
            dispatch: self.dispatcher.state(),
            expansion_level: self.classifier.expansion.level(),
        };
        let word = state.pack();
        tracing::trace!(offset, state = word, "checkpoint captured");
        Checkpoint::new(offset, word)
    }

    /// Rebuild the lexer at `checkpoint` and continue the stream from
    /// there. Total: corrupt state words decode field-wise to initial
    /// states, and out-of-range offsets clamp to end of input.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        let state = LexerState::unpack(checkpoint.state());
        tracing::trace!(offset = checkpoint.offset(), "checkpoint restored");
        let expansion_forms = self.classifier.expansion.enabled();
        self.classifier = Classifier::resume(
            self.source,
            checkpoint.offset(),
            state.scan,
            state.phase,
            state.expansion_level,
            expansion_forms,
        );
        self.dispatcher = Dispatcher::resume(
            state.dispatch,
            recover_tag_name(self.source, checkpoint.offset(), state.scan),
        );
        self.embedded = None;
        if state.dispatch == DispatchState::InsideValue {
            self.remount(checkpoint.offset(), state.scan);
        }
        self.current = self.next_classified();
    }

    /// Re-mount the expression sub-lexer over the remainder of the value
    /// region a checkpoint was taken inside of.
    fn remount(&mut self, offset: u32, scan: ScanState) {
        let cursor = self.classifier.scanner.cursor();
        let end = match scan {
            ScanState::ValueDq => quoted_region_end(&cursor, offset, b'"'),
            ScanState::ValueSq => quoted_region_end(&cursor, offset, b'\''),
            _ => unquoted_region_end(&cursor, offset),
        };
        self.classifier.scanner.seek(end);
        self.embedded = Some(ExpressionLexer::new(
            self.source.as_bytes(),
            Span::new(offset.min(end), end),
            TokenKind::ExpressionWhitespace,
        ));
    }

    // ─── Token production ───

    fn next_classified(&mut self) -> Option<Token> {
        loop {
            if let Some(embedded) = &mut self.embedded {
                if let Some(token) = embedded.next() {
                    return Some(token);
                }
                self.embedded = None;
                self.dispatcher.leave_value();
                continue;
            }

            if self.dispatcher.state() == DispatchState::AwaitingValue {
                return self.awaiting_value();
            }

            let token = self.classifier.next(&self.delimiters)?;
            let token = self.merge(token);
            self.observe(token);
            return Some(token);
        }
    }

    /// Produce the next token while an expression value is expected.
    ///
    /// Probes ahead: tokens that belong to tag structure pass through, a
    /// quoted value start mounts the sub-lexer over the quoted region, and
    /// anything else marks the start of an unquoted expression value.
    fn awaiting_value(&mut self) -> Option<Token> {
        let mut probe = self.classifier.clone();
        let token = probe.next(&self.delimiters)?;
        match token.kind {
            TokenKind::AttrValueStart => {
                self.classifier = probe;
                self.mount_quoted();
                Some(token)
            }
            TokenKind::Whitespace | TokenKind::Eq => {
                self.classifier = probe;
                Some(token)
            }
            TokenKind::TagChars => {
                // Another attribute name; the awaited value never came.
                self.classifier = probe;
                let token = self.merge(token);
                self.observe(token);
                Some(token)
            }
            TokenKind::TagEnd | TokenKind::EmptyTagEnd => {
                self.classifier = probe;
                self.dispatcher.end_tag();
                Some(token)
            }
            _ => {
                // Unquoted value start. The probe is discarded: the region
                // is mounted over the live scanner so interpolation phase
                // and expansion level stay untouched.
                self.mount_unquoted(token.span.start);
                self.next_classified()
            }
        }
    }

    fn mount_quoted(&mut self) {
        let quote = if self.classifier.scanner.state() == ScanState::ValueSq {
            b'\''
        } else {
            b'"'
        };
        let from = self.classifier.scanner.pos();
        let end = quoted_region_end(&self.classifier.scanner.cursor(), from, quote);
        self.classifier.scanner.seek(end);
        self.embedded = Some(ExpressionLexer::new(
            self.source.as_bytes(),
            Span::new(from, end),
            TokenKind::ExpressionWhitespace,
        ));
        self.dispatcher.enter_value();
        tracing::trace!(from, end, "expression sub-lexer mounted over quoted value");
    }

    fn mount_unquoted(&mut self, from: u32) {
        let end = unquoted_region_end(&self.classifier.scanner.cursor(), from);
        self.classifier.scanner.seek(end);
        self.classifier.scanner.set_state(ScanState::ValueUnq);
        self.embedded = Some(ExpressionLexer::new(
            self.source.as_bytes(),
            Span::new(from, end),
            TokenKind::ExpressionWhitespace,
        ));
        self.dispatcher.enter_value();
        tracing::trace!(from, end, "expression sub-lexer mounted over unquoted value");
    }

    /// Coalesce adjacent same-kind run tokens, stopping at an offset where
    /// the interpolation start delimiter matches when the kind is
    /// delimiter-bounded.
    fn merge(&mut self, first: Token) -> Token {
        if !self.policy.is_mergeable(first.kind) {
            return first;
        }
        let mut merged = first;
        loop {
            let mut probe = self.classifier.clone();
            let Some(next) = probe.next(&self.delimiters) else {
                break;
            };
            if next.kind != merged.kind || next.span.start != merged.span.end {
                break;
            }
            if self.policy.delimiter_bounded(merged.kind)
                && self
                    .classifier
                    .delimiter_at(&self.delimiters, next.span.start)
            {
                break;
            }
            merged.span.end = next.span.end;
            self.classifier = probe;
        }
        merged
    }

    /// Feed tag-structure tokens to the dispatcher.
    fn observe(&mut self, token: Token) {
        match token.kind {
            TokenKind::TagStart | TokenKind::EndTagStart => self.dispatcher.begin_tag(),
            TokenKind::TagChars => {
                let text = self.source.slice(token.span.start, token.span.end);
                self.dispatcher.observe_tag_chars(text);
            }
            TokenKind::TagEnd | TokenKind::EmptyTagEnd => self.dispatcher.end_tag(),
            _ => {}
        }
    }
}

/// Recover the enclosing tag name for a checkpoint taken inside a tag by
/// scanning backward for the nearest tag opener.
///
/// A `<` inside a quoted attribute value before the checkpoint can shadow
/// the real opener; the only downstream effect is `let-` classification,
/// which is gated on the tag name.
fn recover_tag_name(source: &SourceBuffer, offset: u32, scan: ScanState) -> Option<String> {
    if !matches!(
        scan,
        ScanState::InTag
            | ScanState::AfterEq
            | ScanState::ValueDq
            | ScanState::ValueSq
            | ScanState::ValueUnq
    ) {
        return None;
    }
    let end = (offset as usize).min(source.len() as usize);
    let bytes = &source.as_bytes()[..end];
    for lt in memchr::memrchr_iter(b'<', bytes) {
        let name_start = match bytes.get(lt + 1) {
            Some(b) if b.is_ascii_alphabetic() => lt + 1,
            Some(b'/') if bytes.get(lt + 2).is_some_and(u8::is_ascii_alphabetic) => lt + 2,
            _ => continue,
        };
        let name_end = bytes[name_start..]
            .iter()
            .position(|&b| b.is_ascii_whitespace() || matches!(b, b'>' | b'=' | b'/'))
            .map_or(bytes.len(), |i| name_start + i);
        return Some(String::from_utf8_lossy(&bytes[name_start..name_end]).into_owned());
    }
    None
}

/// Lex `source` to completion and collect the token stream.
pub fn tokenize(source: &str, delimiters: DelimiterConfig, expansion_forms: bool) -> Vec<Token> {
    let buffer = SourceBuffer::new(source);
    let mut lexer = TemplateLexer::new(&buffer, delimiters, expansion_forms);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.current() {
        tokens.push(token);
        lexer.advance();
    }
    tokens
}
