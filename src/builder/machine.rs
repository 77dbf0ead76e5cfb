//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::table::check_table;
use crate::builder::transition::TransitionBuilder;
use crate::config::{ErrorStrategy, MachineConfig};
use crate::core::{State, Transition};
use crate::machine::StateMachine;
use std::time::Duration;

/// Builder for constructing state machines with a fluent API.
///
/// Unlike [`StateMachine::new`], the initial state can be chosen explicitly.
/// Without `.initial()`, the source of the first transition is used.
#[derive(Default)]
pub struct StateMachineBuilder {
    initial: Option<State>,
    transitions: Vec<Transition>,
    config: MachineConfig,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial state.
    pub fn initial(mut self, state: State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_poll_interval(interval);
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    pub fn on_error(mut self, strategy: ErrorStrategy) -> Self {
        self.config.on_error = strategy;
        self
    }

    /// Build the state machine.
    /// Returns an error if the table is empty or fails validation.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        check_table(&self.transitions, self.initial.as_ref())?;

        let initial = match self.initial {
            Some(state) => state,
            None => self.transitions[0].source.clone(),
        };

        Ok(StateMachine::assemble(self.transitions, initial, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Event, Predicate};

    fn edge(from: &str, event: &str, to: &str) -> Transition {
        Transition::new(
            State::new(from),
            Event::new(event, Predicate::Never),
            State::new(to),
        )
    }

    #[test]
    fn builder_requires_transitions() {
        let result = StateMachineBuilder::new()
            .initial(State::new("closed"))
            .build();

        assert!(matches!(result, Err(BuildError::EmptyTable)));
    }

    #[test]
    fn initial_defaults_to_first_source() {
        let machine = StateMachineBuilder::new()
            .add_transition(edge("opened", "close", "closing"))
            .add_transition(edge("closing", "sensor closed", "closed"))
            .build()
            .unwrap();

        assert_eq!(machine.current_state().name(), "opened");
    }

    #[test]
    fn explicit_initial_overrides_table_order() {
        let machine = StateMachineBuilder::new()
            .initial(State::new("closed"))
            .transitions(vec![
                edge("opened", "close", "closing"),
                edge("closed", "open", "opening"),
            ])
            .build()
            .unwrap();

        assert_eq!(machine.current_state().name(), "closed");
        assert_eq!(machine.initial_state().name(), "closed");
    }

    #[test]
    fn unknown_initial_is_rejected() {
        let result = StateMachineBuilder::new()
            .initial(State::new("ajar"))
            .add_transition(edge("opened", "close", "closing"))
            .build();

        assert!(matches!(result, Err(BuildError::InvalidTable(_))));
    }

    #[test]
    fn transition_builder_errors_propagate() {
        let result = StateMachineBuilder::new()
            .transition(TransitionBuilder::new().from(State::new("opened")));

        assert!(matches!(result, Err(BuildError::MissingEvent)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new()
            .name("door")
            .poll_interval(Duration::from_millis(50))
            .history_limit(4)
            .on_error(ErrorStrategy::SkipCycle)
            .transition(
                TransitionBuilder::new()
                    .from(State::new("closed"))
                    .when("open", Predicate::Never)
                    .to(State::new("opening")),
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(machine.name(), "door");
        assert_eq!(machine.config().poll_interval(), Duration::from_millis(50));
        assert_eq!(machine.history().limit(), 4);
        assert_eq!(machine.config().on_error, ErrorStrategy::SkipCycle);
    }
}
