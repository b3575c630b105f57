//! Raw token tags produced by the markup scanner.
//!
//! A [`RawToken`] is a `(tag, length)` pair: the scanner never allocates and
//! never looks at token text. The layer above (`weft_lexer`) reclassifies
//! these primitives into the public token surface (interpolation, expansion
//! forms, embedded expressions).

/// Primitive token category emitted by [`MarkupScanner`](crate::MarkupScanner).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawTag {
    /// Run of ASCII whitespace in text or inside a tag.
    Whitespace,
    /// Run of text content (may contain interior whitespace).
    DataChars,
    /// `{` in text. Structural only to expansion-aware layers.
    LBrace,
    /// `}` in text.
    RBrace,
    /// `,` in text.
    Comma,
    /// `<` opening a start tag (followed by a letter).
    TagStart,
    /// `</` opening an end tag (followed by a letter).
    EndTagStart,
    /// `>` closing a tag.
    TagEnd,
    /// `/>` closing a void tag.
    EmptyTagEnd,
    /// Run of tag-name or attribute-name characters.
    TagChars,
    /// `=` between an attribute name and its value.
    Eq,
    /// Opening quote of an attribute value (`"` or `'`).
    AttrValueStart,
    /// Run of attribute-value characters (quoted or unquoted).
    AttrValueChars,
    /// Closing quote of an attribute value.
    AttrValueEnd,
    /// Comment piece: the `<!--` opener, a body run, or the `-->` closer.
    Comment,
    /// End of input. Always `len == 0`; repeats forever.
    Eof,
}

/// Raw token: tag plus byte length. Position is tracked by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    /// What kind of primitive this is.
    pub tag: RawTag,
    /// Byte length of the lexeme. Zero only for [`RawTag::Eof`].
    pub len: u32,
}

/// Size assertion: RawToken is a tag byte plus a u32, 8 bytes total.
const _: () = assert!(std::mem::size_of::<RawToken>() == 8);
