//! Embedded expression sub-lexer.
//!
//! Binding attribute values are expressions, not markup: no tags, no
//! interpolation, no expansion forms apply inside them. The sub-lexer runs
//! over a fixed byte range of the shared source and alternates whitespace
//! runs with [`TokenKind::ExpressionChars`] runs. All spans stay absolute,
//! so checkpoints taken mid-expression restart from a plain offset.

use crate::token::{Span, Token, TokenKind};

/// Iterator over the tokens of one embedded expression region.
///
/// The whitespace kind is caller-supplied ([`TokenKind::ExpressionWhitespace`]
/// in the pipeline) so expression whitespace never merges with markup
/// whitespace around the region.
#[derive(Clone, Debug)]
pub struct ExpressionLexer<'a> {
    bytes: &'a [u8],
    pos: u32,
    end: u32,
    whitespace_kind: TokenKind,
}

impl<'a> ExpressionLexer<'a> {
    /// Lex `bytes[range.start..range.end]` as an expression. `bytes` is the
    /// whole source so emitted spans are absolute.
    pub fn new(bytes: &'a [u8], range: Span, whitespace_kind: TokenKind) -> Self {
        debug_assert!((range.end as usize) <= bytes.len());
        Self {
            bytes,
            pos: range.start,
            end: range.end,
            whitespace_kind,
        }
    }

    /// Current absolute offset; equals the range end once exhausted.
    pub fn pos(&self) -> u32 {
        self.pos
    }

    fn run_end(&self, whitespace: bool) -> u32 {
        let mut at = self.pos;
        while at < self.end && self.bytes[at as usize].is_ascii_whitespace() == whitespace {
            at += 1;
        }
        at
    }
}

impl Iterator for ExpressionLexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.end {
            return None;
        }
        let whitespace = self.bytes[self.pos as usize].is_ascii_whitespace();
        let end = self.run_end(whitespace);
        let kind = if whitespace {
            self.whitespace_kind
        } else {
            TokenKind::ExpressionChars
        };
        let token = Token::new(kind, self.pos, end);
        self.pos = end;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lex(source: &str, start: u32, end: u32) -> Vec<Token> {
        ExpressionLexer::new(
            source.as_bytes(),
            Span::new(start, end),
            TokenKind::ExpressionWhitespace,
        )
        .collect()
    }

    #[test]
    fn alternating_runs() {
        assert_eq!(
            lex("go( x )", 0, 7),
            vec![
                Token::new(TokenKind::ExpressionChars, 0, 3),
                Token::new(TokenKind::ExpressionWhitespace, 3, 4),
                Token::new(TokenKind::ExpressionChars, 4, 5),
                Token::new(TokenKind::ExpressionWhitespace, 5, 6),
                Token::new(TokenKind::ExpressionChars, 6, 7),
            ]
        );
    }

    #[test]
    fn absolute_spans_over_a_sub_range() {
        // Lexing the middle of a larger buffer keeps offsets absolute.
        assert_eq!(
            lex("<a b=\"x y\">", 6, 9),
            vec![
                Token::new(TokenKind::ExpressionChars, 6, 7),
                Token::new(TokenKind::ExpressionWhitespace, 7, 8),
                Token::new(TokenKind::ExpressionChars, 8, 9),
            ]
        );
    }

    #[test]
    fn empty_range_yields_nothing() {
        assert_eq!(lex("abc", 1, 1), vec![]);
    }

    #[test]
    fn whitespace_only_region() {
        assert_eq!(
            lex("  \t", 0, 3),
            vec![Token::new(TokenKind::ExpressionWhitespace, 0, 3)]
        );
    }

    #[test]
    fn pos_tracks_consumption() {
        let mut lexer = ExpressionLexer::new(
            b"a b",
            Span::new(0, 3),
            TokenKind::ExpressionWhitespace,
        );
        assert_eq!(lexer.pos(), 0);
        lexer.next();
        assert_eq!(lexer.pos(), 1);
        lexer.by_ref().for_each(drop);
        assert_eq!(lexer.pos(), 3);
    }
}
