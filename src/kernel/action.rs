//! State-tag transitions shared by entities with a small closed set of states.
//!
//! An entity declares its legal states as an [`ActionState`] enum. Canonical
//! variants are trusted as-is; strings arriving from outside go through
//! [`ActionState::parse`], which rejects anything outside the set with the
//! state type's own message. An [`Action`] wraps the state to move to and the
//! entity applies it through [`ApplyAction`].

use std::fmt;

use super::Failure;

/// A closed set of string-tagged states.
pub trait ActionState: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Failure message raised when a value is outside the permitted set.
    const INVALID_MESSAGE: &'static str;

    /// Every permitted state, in canonical order.
    fn all() -> &'static [Self];

    /// The tag stored and exchanged for this state.
    fn as_str(&self) -> &'static str;

    /// Validates `value` against the permitted set.
    fn parse(value: &str) -> Result<Self, Failure> {
        Self::all()
            .iter()
            .copied()
            .find(|state| state.as_str() == value)
            .ok_or_else(|| Failure::new(Self::INVALID_MESSAGE))
    }
}

/// The transition to apply: a value object wrapping exactly one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action<S: ActionState> {
    state: S,
}

impl<S: ActionState> Action<S> {
    pub const fn new(state: S) -> Self {
        Self { state }
    }

    pub fn state(&self) -> S {
        self.state
    }
}

/// Entities that move between states by applying an [`Action`].
pub trait ApplyAction<S: ActionState> {
    /// Runs the transition's side effects and replaces the current state.
    fn apply_action(&mut self, action: Action<S>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Signal {
        Red,
        Green,
    }

    impl ActionState for Signal {
        const INVALID_MESSAGE: &'static str = "Signal value is invalid.";

        fn all() -> &'static [Self] {
            &[Signal::Red, Signal::Green]
        }

        fn as_str(&self) -> &'static str {
            match self {
                Signal::Red => "red",
                Signal::Green => "green",
            }
        }
    }

    struct Crossing {
        signal: Signal,
        switches: u32,
    }

    impl ApplyAction<Signal> for Crossing {
        fn apply_action(&mut self, action: Action<Signal>) {
            if self.signal != action.state() {
                self.switches += 1;
            }
            self.signal = action.state();
        }
    }

    #[test]
    fn test_parse_accepts_permitted_tags() {
        for state in Signal::all() {
            assert_eq!(Signal::parse(state.as_str()).unwrap(), *state);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_tags() {
        let err = Signal::parse("amber").unwrap_err();
        assert_eq!(err.message(), "Signal value is invalid.");
        assert!(Signal::parse("Red").is_err());
    }

    #[test]
    fn test_actions_compare_by_wrapped_state() {
        assert_eq!(Action::new(Signal::Red), Action::new(Signal::Red));
        assert_ne!(Action::new(Signal::Red), Action::new(Signal::Green));
    }

    #[test]
    fn test_apply_action_replaces_state() {
        let mut crossing = Crossing {
            signal: Signal::Red,
            switches: 0,
        };
        crossing.apply_action(Action::new(Signal::Green));
        crossing.apply_action(Action::new(Signal::Green));
        assert_eq!(crossing.signal, Signal::Green);
        assert_eq!(crossing.switches, 1);
    }
}
