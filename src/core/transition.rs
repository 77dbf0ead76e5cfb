//! Edges of the transition table.

use super::event::Event;
use super::state::State;
use std::fmt;

/// Directed edge `(source, event) -> target`.
///
/// The pair of source and event names is the lookup key; it must be unique
/// across a machine's table. Self loops (`source == target`) are legal and
/// re-run the target's action like any other transition.
#[derive(Clone, Debug)]
pub struct Transition {
    pub source: State,
    pub event: Event,
    pub target: State,
}

impl Transition {
    pub fn new(source: State, event: Event, target: State) -> Self {
        Self {
            source,
            event,
            target,
        }
    }

    /// Lookup key: source state name and event name.
    pub fn key(&self) -> (&str, &str) {
        (self.source.name(), self.event.name())
    }

    /// Does this edge leave `state`?
    pub fn leaves(&self, state: &State) -> bool {
        self.source.name() == state.name()
    }

    /// Is this the edge for `event` out of `state`?
    pub fn matches(&self, state: &State, event: &Event) -> bool {
        self.leaves(state) && self.event.name() == event.name()
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --[{}]--> {}", self.source, self.event, self.target)
    }
}
