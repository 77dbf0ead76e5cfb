//! Named events wrapping a guard condition.

use super::condition::Condition;
use std::fmt;
use std::sync::Arc;

/// Trigger label on a transition, fired when its condition tests true.
///
/// Events are identified by name; the condition is shared, so cloning an event
/// is cheap and every clone observes the same guard.
///
/// ```rust
/// use tripwire::core::{Event, Signals};
///
/// let signals = Signals::new();
/// let open = Event::new("open", signals.predicate("user_open"));
///
/// assert!(!open.test());
/// signals.set("user_open", true);
/// assert!(open.test());
/// ```
#[derive(Clone)]
pub struct Event {
    name: String,
    condition: Arc<dyn Condition>,
}

impl Event {
    pub fn new<C>(name: impl Into<String>, condition: C) -> Self
    where
        C: Condition + 'static,
    {
        Self {
            name: name.into(),
            condition: Arc::new(condition),
        }
    }

    /// Build an event around a condition that is already shared elsewhere.
    pub fn from_shared(name: impl Into<String>, condition: Arc<dyn Condition>) -> Self {
        Self {
            name: name.into(),
            condition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the guard.
    pub fn test(&self) -> bool {
        self.condition.test()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Event {}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event").field("name", &self.name).finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Predicate, Signals};

    #[test]
    fn test_delegates_to_condition() {
        assert!(Event::new("always", Predicate::Always).test());
        assert!(!Event::new("never", Predicate::Never).test());
    }

    #[test]
    fn clones_observe_same_guard() {
        let signals = Signals::new();
        let event = Event::new("close", signals.predicate("user_close"));
        let cloned = event.clone();

        signals.set("user_close", true);
        assert!(event.test());
        assert!(cloned.test());
    }

    #[test]
    fn identity_is_by_name() {
        assert_eq!(
            Event::new("open", Predicate::Always),
            Event::new("open", Predicate::Never)
        );
        assert_ne!(
            Event::new("open", Predicate::Always),
            Event::new("close", Predicate::Always)
        );
    }

    #[test]
    fn from_shared_reuses_condition() {
        let condition: Arc<dyn Condition> = Arc::new(|| true);
        let a = Event::from_shared("a", Arc::clone(&condition));
        let b = Event::from_shared("b", condition);

        assert!(a.test());
        assert!(b.test());
    }
}
