//! Build errors for machines, transitions and transition tables.

use thiserror::Error;

/// A single problem found while validating a transition table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableViolation {
    #[error("duplicate transition for state '{state}' on event '{event}'")]
    DuplicateTransition { state: String, event: String },

    #[error("initial state '{state}' does not appear in the transition table")]
    UnknownInitialState { state: String },

    #[error("state '{state}' appears with more than one distinct action")]
    ConflictingState { state: String },
}

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No transitions defined. Add at least one transition")]
    EmptyTable,

    #[error("Invalid transition table: {}", join_violations(.0))]
    InvalidTable(Vec<TableViolation>),

    #[error("Transition source state not specified. Call .from(state)")]
    MissingSource,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingTarget,
}

fn join_violations(violations: &[TableViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_table_lists_every_violation() {
        let error = BuildError::InvalidTable(vec![
            TableViolation::DuplicateTransition {
                state: "opened".into(),
                event: "close".into(),
            },
            TableViolation::UnknownInitialState {
                state: "ajar".into(),
            },
        ]);

        assert_eq!(
            error.to_string(),
            "Invalid transition table: duplicate transition for state 'opened' on event 'close'; \
             initial state 'ajar' does not appear in the transition table"
        );
    }
}
