//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders, table validation and a macro for
//! writing transition tables with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod table;
pub mod transition;

pub use error::{BuildError, TableViolation};
pub use machine::StateMachineBuilder;
pub use table::validate_table;
pub use transition::TransitionBuilder;

pub(crate) use table::{canonical_states, check_table};

use crate::core::{Condition, Event, State, Transition};

/// Create a transition guarded by `condition`, naming the event `event`.
///
/// # Example
///
/// ```
/// use tripwire::builder::guarded_transition;
/// use tripwire::core::{Signals, State};
///
/// let signals = Signals::new();
/// let transition = guarded_transition(
///     State::new("closed"),
///     "open",
///     signals.predicate("user_open"),
///     State::new("opening"),
/// );
/// assert_eq!(transition.key(), ("closed", "open"));
/// ```
pub fn guarded_transition<C>(
    source: State,
    event: impl Into<String>,
    condition: C,
    target: State,
) -> Transition
where
    C: Condition + 'static,
{
    Transition::new(source, Event::new(event, condition), target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Predicate;

    #[test]
    fn guarded_transition_respects_guard() {
        let transition = guarded_transition(
            State::new("a"),
            "go",
            Predicate::Always,
            State::new("b"),
        );

        assert!(transition.event.test());
        assert!(transition.leaves(&State::new("a")));
    }
}
