//! Checkpoint wire format.
//!
//! A [`Checkpoint`] is two `u32`s: a byte offset into the source and a
//! packed state word. The word layout is fixed so checkpoints can be
//! persisted and restored across processes:
//!
//! ```text
//!  31          16 15        8 7    6 5    4 3         0
//! ┌──────────────┬───────────┬──────┬──────┬───────────┐
//! │ reserved (0) │ expansion │ disp │ phase│ scan state│
//! └──────────────┴───────────┴──────┴──────┴───────────┘
//! ```
//!
//! Restoring never fails: unknown bit patterns in any field decode to that
//! field's initial state, and a reserved region is ignored.

use weft_lexer_core::ScanState;

use crate::dispatch::DispatchState;
use crate::interpolation::ScanPhase;

/// Bits below the expansion level field.
pub(crate) const BASE_STATE_BITS: u32 = 8;

/// Immutable resume point: byte offset plus packed lexer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    offset: u32,
    state: u32,
}

impl Checkpoint {
    pub(crate) fn new(offset: u32, state: u32) -> Self {
        Self { offset, state }
    }

    /// Byte offset the lexer resumes from.
    pub fn offset(self) -> u32 {
        self.offset
    }

    pub(crate) fn state(self) -> u32 {
        self.state
    }
}

/// The unpacked state word, one field per layered component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LexerState {
    pub(crate) scan: ScanState,
    pub(crate) phase: ScanPhase,
    pub(crate) dispatch: DispatchState,
    pub(crate) expansion_level: u8,
}

impl LexerState {
    pub(crate) fn pack(self) -> u32 {
        u32::from(self.scan.bits())
            | (u32::from(self.phase.bits()) << 4)
            | (u32::from(self.dispatch.bits()) << 6)
            | (u32::from(self.expansion_level) << BASE_STATE_BITS)
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "each field is masked to its width before the cast"
    )]
    pub(crate) fn unpack(word: u32) -> Self {
        Self {
            scan: ScanState::from_bits((word & 0xF) as u8),
            phase: ScanPhase::from_bits(((word >> 4) & 0x3) as u8),
            dispatch: DispatchState::from_bits(((word >> 6) & 0x3) as u8),
            expansion_level: ((word >> BASE_STATE_BITS) & 0xFF) as u8,
        }
    }
}
