//! Token merging policy.
//!
//! The base scanner and the classifier both emit maximal runs, but state
//! transitions and interpolation probing can split what a consumer thinks
//! of as one run (text interrupted by a rewritten brace, a value re-entered
//! after a delimiter search). The merge pass coalesces adjacent same-kind
//! tokens, subject to one interrupt rule: a mergeable run never absorbs
//! past an offset where the interpolation start delimiter matches, so the
//! delimiter stays on a token boundary.

use bitflags::bitflags;

use crate::token::TokenKind;

bitflags! {
    /// Set of token kinds, restricted to the run-like kinds that merging
    /// can apply to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MergeSet: u8 {
        const WHITESPACE = 1;
        const COMMENT = 1 << 1;
        const TAG_CHARS = 1 << 2;
        const DATA_CHARS = 1 << 3;
        const ATTR_VALUE_CHARS = 1 << 4;
    }
}

impl MergeSet {
    /// The singleton set for `kind`, or the empty set for kinds that never
    /// participate in merging.
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Whitespace => MergeSet::WHITESPACE,
            TokenKind::Comment => MergeSet::COMMENT,
            TokenKind::TagChars => MergeSet::TAG_CHARS,
            TokenKind::DataChars => MergeSet::DATA_CHARS,
            TokenKind::AttrValueChars => MergeSet::ATTR_VALUE_CHARS,
            _ => MergeSet::empty(),
        }
    }
}

/// Which kinds merge, and which of those stop merging at an interpolation
/// start delimiter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergePolicy {
    mergeable: MergeSet,
    delimiter_bounded: MergeSet,
}

impl MergePolicy {
    pub fn new(mergeable: MergeSet, delimiter_bounded: MergeSet) -> Self {
        Self {
            mergeable,
            delimiter_bounded,
        }
    }

    /// Whether adjacent tokens of `kind` coalesce into one.
    pub fn is_mergeable(&self, kind: TokenKind) -> bool {
        self.mergeable.intersects(MergeSet::of(kind))
    }

    /// Whether a merged run of `kind` must break where the interpolation
    /// start delimiter matches.
    pub fn delimiter_bounded(&self, kind: TokenKind) -> bool {
        self.delimiter_bounded.intersects(MergeSet::of(kind))
    }
}

impl Default for MergePolicy {
    /// All run-like kinds merge. Text, markup whitespace, and attribute
    /// value content break at a start delimiter; comments and tag chars do
    /// not, since interpolation never begins inside them.
    fn default() -> Self {
        Self {
            mergeable: MergeSet::all(),
            delimiter_bounded: MergeSet::WHITESPACE
                | MergeSet::DATA_CHARS
                | MergeSet::ATTR_VALUE_CHARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_maps_run_kinds_only() {
        assert_eq!(MergeSet::of(TokenKind::DataChars), MergeSet::DATA_CHARS);
        assert_eq!(MergeSet::of(TokenKind::Comment), MergeSet::COMMENT);
        assert_eq!(MergeSet::of(TokenKind::TagEnd), MergeSet::empty());
        assert_eq!(
            MergeSet::of(TokenKind::InterpolationContent),
            MergeSet::empty()
        );
    }

    #[test]
    fn default_policy_merges_all_runs() {
        let policy = MergePolicy::default();
        assert!(policy.is_mergeable(TokenKind::DataChars));
        assert!(policy.is_mergeable(TokenKind::Whitespace));
        assert!(policy.is_mergeable(TokenKind::Comment));
        assert!(policy.is_mergeable(TokenKind::TagChars));
        assert!(policy.is_mergeable(TokenKind::AttrValueChars));
        assert!(!policy.is_mergeable(TokenKind::ExpansionLBrace));
        assert!(!policy.is_mergeable(TokenKind::ExpressionChars));
    }

    #[test]
    fn default_policy_bounds_interpolation_hosts() {
        let policy = MergePolicy::default();
        assert!(policy.delimiter_bounded(TokenKind::DataChars));
        assert!(policy.delimiter_bounded(TokenKind::Whitespace));
        assert!(policy.delimiter_bounded(TokenKind::AttrValueChars));
        assert!(!policy.delimiter_bounded(TokenKind::Comment));
        assert!(!policy.delimiter_bounded(TokenKind::TagChars));
    }

    #[test]
    fn custom_policy() {
        let policy = MergePolicy::new(MergeSet::COMMENT, MergeSet::empty());
        assert!(policy.is_mergeable(TokenKind::Comment));
        assert!(!policy.is_mergeable(TokenKind::DataChars));
        assert!(!policy.delimiter_bounded(TokenKind::Comment));
    }
}
