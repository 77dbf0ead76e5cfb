//! Errors raised while loading or binding a machine definition.

use crate::builder::BuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to parse machine definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Transition refers to undeclared state '{0}'")]
    UnknownState(String),

    #[error("Transition refers to undeclared event '{0}'")]
    UnknownEvent(String),

    #[error("State '{state}' refers to unregistered action '{action}'")]
    UnknownAction { state: String, action: String },

    #[error("Event '{event}' refers to unregistered condition '{condition}'")]
    UnknownCondition { event: String, condition: String },

    #[error("'{0}' is declared more than once")]
    DuplicateName(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}
