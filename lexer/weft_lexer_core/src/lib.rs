//! Low-level markup tokenizer for weft.
//!
//! This crate is the bottom of the lexing pipeline: it turns raw template
//! text into primitive `(tag, len)` tokens with zero heap allocation and no
//! knowledge of interpolation delimiters, expansion forms, or attribute
//! bindings. Those concerns live one layer up, in `weft_lexer`.
//!
//! # Architecture
//!
//! ```text
//! &str ──> SourceBuffer ──> Cursor ──> MarkupScanner ──> RawToken stream
//!          (sentinel +      (Copy,     (7-state markup    (tag + length,
//!           64B padding)     u32 pos)   state machine)     no allocation)
//! ```
//!
//! # Contract
//!
//! The scanner is a total function over any byte sequence: malformed markup
//! degrades to defined token runs, never to an error. Tokens are contiguous,
//! non-overlapping, and cover the buffer exactly. The scanner state is a
//! single byte, re-encodable via [`ScanState::bits`], so a scan can be
//! suspended at any token boundary and resumed from a `(position, state)`
//! pair.

mod cursor;
mod scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use scanner::{MarkupScanner, ScanState};
pub use source_buffer::SourceBuffer;
pub use tag::{RawTag, RawToken};
