//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Condition, Event, State, Transition};

/// Builder for constructing transitions with a fluent API.
#[derive(Default)]
pub struct TransitionBuilder {
    source: Option<State>,
    event: Option<Event>,
    target: Option<State>,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source state (required).
    pub fn from(mut self, state: State) -> Self {
        self.source = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: Event) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the triggering event from a name and a guard.
    pub fn when<C>(mut self, name: impl Into<String>, condition: C) -> Self
    where
        C: Condition + 'static,
    {
        self.event = Some(Event::new(name, condition));
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: State) -> Self {
        self.target = Some(state);
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let target = self.target.ok_or(BuildError::MissingTarget)?;

        Ok(Transition::new(source, event, target))
    }
}
