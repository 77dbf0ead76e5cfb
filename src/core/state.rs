//! States of the machine.
//!
//! A state is a named node, optionally carrying an action that runs on every
//! cycle while the machine resides in it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Side-effecting procedure attached to a state.
///
/// Runs synchronously inside the evaluation loop, so a long action delays the
/// next round of guard evaluation.
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// A named state, identified by its name alone.
///
/// Two states with the same name compare equal even if only one carries an
/// action; the transition table refers to states by name.
///
/// # Example
///
/// ```rust
/// use tripwire::core::State;
///
/// let closed = State::new("closed");
/// let opening = State::with_action("opening", || println!("Opening door"));
///
/// assert_eq!(closed.name(), "closed");
/// assert!(!closed.has_action());
/// assert!(opening.has_action());
/// assert_eq!(State::new("opening"), opening);
/// ```
#[derive(Clone)]
pub struct State {
    name: String,
    action: Option<Action>,
}

impl State {
    /// Create a state with no action.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: None,
        }
    }

    /// Create a state that runs `action` every cycle while current.
    pub fn with_action<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Some(Arc::new(action)),
        }
    }

    /// Attach an already shared action.
    pub fn with_shared_action(name: impl Into<String>, action: Action) -> Self {
        Self {
            name: name.into(),
            action: Some(action),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Do both copies carry an action, and are those actions different?
    ///
    /// Clones of one state share their action, so they never conflict; a copy
    /// without an action conflicts with nothing.
    pub fn action_conflicts_with(&self, other: &State) -> bool {
        match (&self.action, &other.action) {
            (Some(mine), Some(theirs)) => !Arc::ptr_eq(mine, theirs),
            _ => false,
        }
    }

    /// Run the action if there is one. Returns whether anything ran.
    pub fn run_action(&self) -> bool {
        match &self.action {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("action", &self.action.is_some())
            .finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(State::new("opened").name(), "opened");
        assert_eq!(State::with_action("opening", || {}).name(), "opening");
    }

    #[test]
    fn identity_is_by_name() {
        let plain = State::new("closing");
        let acting = State::with_action("closing", || {});

        assert_eq!(plain, acting);
        assert_ne!(plain, State::new("closed"));

        let set: HashSet<State> = [plain, acting].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn run_action_invokes_procedure() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let state = State::with_action("busy", move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(state.run_action());
        assert!(state.run_action());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn run_action_without_action_is_noop() {
        assert!(!State::new("idle").run_action());
    }

    #[test]
    fn clones_share_action() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let state = State::with_action("busy", move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let cloned = state.clone();

        state.run_action();
        cloned.run_action();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn only_distinct_actions_conflict() {
        let acting = State::with_action("busy", || {});
        let other = State::with_action("busy", || {});

        assert!(!acting.action_conflicts_with(&acting.clone()));
        assert!(!acting.action_conflicts_with(&State::new("busy")));
        assert!(!State::new("busy").action_conflicts_with(&acting));
        assert!(acting.action_conflicts_with(&other));
    }

    #[test]
    fn display_and_debug() {
        let state = State::with_action("opening", || {});
        assert_eq!(state.to_string(), "opening");
        assert_eq!(
            format!("{state:?}"),
            "State { name: \"opening\", action: true }"
        );
    }
}
