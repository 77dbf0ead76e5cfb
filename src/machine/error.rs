//! Errors raised while a machine is evaluating or running.

use thiserror::Error;

/// Failures of a single evaluation cycle.
///
/// Both variants point at a defect in the transition table rather than a
/// transient runtime condition, so they are never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("Conflicting events fired for state '{state}': {}", .events.join(", "))]
    ConfigurationConflict { state: String, events: Vec<String> },

    #[error("No transition from state '{state}' on event '{event}'")]
    MissingTransition { state: String, event: String },
}

/// Errors surfaced by a machine running on its own thread or task.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to spawn evaluation thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Evaluation loop panicked")]
    Panicked,

    #[error(transparent)]
    Machine(#[from] MachineError),
}
