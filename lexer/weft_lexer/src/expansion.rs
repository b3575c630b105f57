//! Expansion form nesting tracker.
//!
//! ICU-style expansion forms (`{count, plural, =0 {...} ...}`) nest via
//! braces. The tracker is a single saturating counter: opens clamp at 255
//! (the checkpoint wire format reserves 8 bits for the level), closes clamp
//! at 0 so a document that closes more forms than it opened recovers
//! instead of underflowing.

/// Bounded expansion nesting counter plus the recognition flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ExpansionTracker {
    enabled: bool,
    level: u8,
}

impl ExpansionTracker {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled, level: 0 }
    }

    pub(crate) fn resume(enabled: bool, level: u8) -> Self {
        Self { enabled, level }
    }

    /// Whether structural `{` / `}` / `,` are recognized at all.
    pub(crate) fn enabled(self) -> bool {
        self.enabled
    }

    /// Current nesting level, 0-255.
    pub(crate) fn level(self) -> u8 {
        self.level
    }

    /// Entered an expansion form or case body.
    pub(crate) fn open(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    /// Left an expansion form or case body. Close-without-open clamps at 0.
    pub(crate) fn close(&mut self) {
        self.level = self.level.saturating_sub(1);
    }
}
