//! Attribute value dispatch.
//!
//! The dispatcher watches the tag-level token stream and decides, per
//! attribute, whether the upcoming value is markup (lexed in place, with
//! interpolation) or an expression (handed to an embedded sub-lexer). The
//! decision is purely syntactic: the most recent attribute name is
//! classified against the enclosing tag name via [`classify`].

use crate::attributes::{classify, AttributeClassification};

/// Where the dispatcher is relative to attribute values. Fits in 2 bits
/// for checkpoint packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DispatchState {
    /// Not expecting an expression value.
    Idle,
    /// The last attribute name was a binding form; its value, if one
    /// follows, is an expression.
    AwaitingValue,
    /// An embedded expression sub-lexer is active over the current value.
    InsideValue,
}

impl DispatchState {
    pub(crate) fn bits(self) -> u8 {
        match self {
            DispatchState::Idle => 0,
            DispatchState::AwaitingValue => 1,
            DispatchState::InsideValue => 2,
        }
    }

    /// Unknown values decode to `Idle`.
    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits {
            1 => DispatchState::AwaitingValue,
            2 => DispatchState::InsideValue,
            _ => DispatchState::Idle,
        }
    }
}

/// Tracks the enclosing tag name and the binding status of the most recent
/// attribute name.
#[derive(Clone, Debug)]
pub(crate) struct Dispatcher {
    state: DispatchState,
    tag_name: String,
    saw_tag_name: bool,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        Self {
            state: DispatchState::Idle,
            tag_name: String::new(),
            saw_tag_name: false,
        }
    }

    /// Rebuild from checkpoint state. `tag_name` is `None` when the restore
    /// offset is outside any tag.
    pub(crate) fn resume(state: DispatchState, tag_name: Option<String>) -> Self {
        let saw_tag_name = tag_name.is_some();
        Self {
            state,
            tag_name: tag_name.unwrap_or_default(),
            saw_tag_name,
        }
    }

    pub(crate) fn state(&self) -> DispatchState {
        self.state
    }

    /// A `<` or `</` was seen; the next name run is the tag name.
    pub(crate) fn begin_tag(&mut self) {
        self.tag_name.clear();
        self.saw_tag_name = false;
        self.state = DispatchState::Idle;
    }

    /// A `>` or `/>` was seen; any pending value expectation is dropped.
    pub(crate) fn end_tag(&mut self) {
        self.state = DispatchState::Idle;
    }

    /// A name run inside a tag: the first is the tag name, the rest are
    /// attribute names classified against it.
    pub(crate) fn observe_tag_chars(&mut self, text: &str) {
        if self.saw_tag_name {
            self.state = if classify(text, &self.tag_name) == AttributeClassification::Regular {
                DispatchState::Idle
            } else {
                DispatchState::AwaitingValue
            };
        } else {
            self.tag_name.clear();
            self.tag_name.push_str(text);
            self.saw_tag_name = true;
        }
    }

    /// An expression value region was mounted.
    pub(crate) fn enter_value(&mut self) {
        self.state = DispatchState::InsideValue;
    }

    /// The mounted expression region was exhausted.
    pub(crate) fn leave_value(&mut self) {
        self.state = DispatchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_bits_round_trip() {
        for state in [
            DispatchState::Idle,
            DispatchState::AwaitingValue,
            DispatchState::InsideValue,
        ] {
            assert_eq!(DispatchState::from_bits(state.bits()), state);
            assert!(state.bits() < 4, "dispatch state must fit in 2 bits");
        }
        assert_eq!(DispatchState::from_bits(3), DispatchState::Idle);
    }

    #[test]
    fn first_name_run_is_the_tag_name() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.begin_tag();
        dispatcher.observe_tag_chars("button");
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        dispatcher.observe_tag_chars("(click)");
        assert_eq!(dispatcher.state(), DispatchState::AwaitingValue);
    }

    #[test]
    fn regular_attribute_resets_expectation() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.begin_tag();
        dispatcher.observe_tag_chars("a");
        dispatcher.observe_tag_chars("[href]");
        assert_eq!(dispatcher.state(), DispatchState::AwaitingValue);
        dispatcher.observe_tag_chars("class");
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn tag_end_drops_pending_expectation() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.begin_tag();
        dispatcher.observe_tag_chars("a");
        dispatcher.observe_tag_chars("(click)");
        dispatcher.end_tag();
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn tag_name_gates_let_bindings() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.begin_tag();
        dispatcher.observe_tag_chars("template");
        dispatcher.observe_tag_chars("let-item");
        assert_eq!(dispatcher.state(), DispatchState::AwaitingValue);

        dispatcher.begin_tag();
        dispatcher.observe_tag_chars("div");
        dispatcher.observe_tag_chars("let-item");
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn value_lifecycle() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.enter_value();
        assert_eq!(dispatcher.state(), DispatchState::InsideValue);
        dispatcher.leave_value();
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn resume_with_recovered_tag_name() {
        let mut dispatcher =
            Dispatcher::resume(DispatchState::Idle, Some("template".to_owned()));
        dispatcher.observe_tag_chars("let-x");
        assert_eq!(dispatcher.state(), DispatchState::AwaitingValue);
    }

    #[test]
    fn resume_without_tag_name_treats_next_run_as_tag_name() {
        let mut dispatcher = Dispatcher::resume(DispatchState::Idle, None);
        dispatcher.observe_tag_chars("input");
        assert_eq!(dispatcher.state(), DispatchState::Idle);
        dispatcher.observe_tag_chars("[value]");
        assert_eq!(dispatcher.state(), DispatchState::AwaitingValue);
    }
}
