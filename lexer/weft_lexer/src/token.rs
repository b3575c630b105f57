//! Public token surface of the template lexer.
//!
//! Everything the pipeline emits is a [`Token`]: a [`TokenKind`] plus a
//! byte [`Span`]. Tokens are contiguous, non-overlapping, and emitted in
//! strictly increasing offset order; concatenating their lexemes
//! reproduces the source buffer exactly.

/// Half-open byte range `[start, end)` into the source buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    /// Inclusive start offset.
    pub start: u32,
    /// Exclusive end offset.
    pub end: u32,
}

impl Span {
    /// Create a span. `start` must not exceed `end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} exceeds end {end}");
        Self { start, end }
    }

    /// Byte length of the span.
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    /// Returns `true` for a zero-length span.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Closed token category enumeration.
///
/// Markup kinds come from the base scanner; interpolation and expansion
/// kinds from the reclassification layer; expression kinds from embedded
/// sub-lexers mounted over binding attribute values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// Markup whitespace (text or in-tag).
    Whitespace,
    /// Whitespace inside an embedded expression region. Kept distinct so it
    /// is never merged with surrounding markup whitespace.
    ExpressionWhitespace,
    /// A `<!-- ... -->` comment (merged into one token including markers).
    Comment,
    /// `<` opening a start tag.
    TagStart,
    /// `</` opening an end tag.
    EndTagStart,
    /// `>` closing a tag.
    TagEnd,
    /// `/>` closing a void tag.
    EmptyTagEnd,
    /// Tag-name or attribute-name characters.
    TagChars,
    /// `=` between attribute name and value.
    Eq,
    /// Opening quote of an attribute value.
    AttrValueStart,
    /// Attribute value content outside embedded regions.
    AttrValueChars,
    /// Closing quote of an attribute value.
    AttrValueEnd,
    /// Text content.
    DataChars,
    /// The interpolation start delimiter.
    InterpolationStart,
    /// Expression text between interpolation delimiters.
    InterpolationContent,
    /// The interpolation end delimiter.
    InterpolationEnd,
    /// Content after a start delimiter whose end delimiter never appeared
    /// before the enclosing region ended.
    UnterminatedInterpolation,
    /// `{` opening an expansion form or case body.
    ExpansionLBrace,
    /// `}` closing an expansion form or case body.
    ExpansionRBrace,
    /// `,` separating expansion form selectors.
    ExpansionComma,
    /// Non-whitespace run inside an embedded expression region.
    ExpressionChars,
}

/// A classified token: kind plus byte span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// What this span represents.
    pub kind: TokenKind,
    /// Where it sits in the buffer.
    pub span: Span,
}

impl Token {
    /// Create a token over `[start, end)`.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_len_and_empty() {
        assert_eq!(Span::new(2, 5).len(), 3);
        assert!(!Span::new(2, 5).is_empty());
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn token_construction() {
        let token = Token::new(TokenKind::DataChars, 0, 4);
        assert_eq!(token.kind, TokenKind::DataChars);
        assert_eq!(token.span, Span::new(0, 4));
    }
}
