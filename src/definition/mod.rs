//! Declarative machine definitions.
//!
//! A definition describes states, events and transitions by name in JSON and is
//! bound to real actions and conditions through a [`Registry`] at build time.
//!
//! # Example
//!
//! ```rust
//! use tripwire::definition::{MachineDefinition, Registry};
//! use tripwire::core::Signals;
//!
//! let definition = MachineDefinition::from_json(r#"{
//!     "initial": "off",
//!     "states": [{ "name": "off" }, { "name": "on", "action": "hum" }],
//!     "events": [
//!         { "name": "press", "condition": { "signal": "button" } },
//!         { "name": "release", "condition": { "not": { "signal": "button" } } }
//!     ],
//!     "transitions": [
//!         { "from": "off", "event": "press", "to": "on" },
//!         { "from": "on", "event": "release", "to": "off" }
//!     ]
//! }"#).unwrap();
//!
//! let signals = Signals::new();
//! let registry = Registry::new(signals.clone()).with_action("hum", || {});
//! let mut machine = definition.build(&registry).unwrap();
//!
//! signals.set("button", true);
//! machine.step().unwrap();
//! assert_eq!(machine.current_state().name(), "on");
//! ```

mod error;
mod registry;

pub use error::DefinitionError;
pub use registry::Registry;

use crate::builder::StateMachineBuilder;
use crate::config::MachineConfig;
use crate::core::{Event, Predicate, State, Transition};
use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whole machine described by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineDefinition {
    /// Starting state; defaults to the source of the first transition
    #[serde(default)]
    pub initial: Option<String>,
    pub states: Vec<StateDef>,
    pub events: Vec<EventDef>,
    pub transitions: Vec<TransitionDef>,
    #[serde(default)]
    pub config: MachineConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDef {
    pub name: String,
    /// Name of a registered action
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventDef {
    pub name: String,
    pub condition: ConditionDef,
}

/// Guard expression, mirroring [`Predicate`] with names in place of code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionDef {
    Always,
    Never,
    /// Value of a signal on the registry's bus
    Signal(String),
    /// Condition registered under this name
    Named(String),
    Not(Box<ConditionDef>),
    All(Vec<ConditionDef>),
    Any(Vec<ConditionDef>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionDef {
    pub from: String,
    pub event: String,
    pub to: String,
}

impl ConditionDef {
    fn resolve(&self, event: &str, registry: &Registry) -> Result<Predicate, DefinitionError> {
        Ok(match self {
            ConditionDef::Always => Predicate::Always,
            ConditionDef::Never => Predicate::Never,
            ConditionDef::Signal(name) => registry.signals().predicate(name.as_str()),
            ConditionDef::Named(name) => {
                let condition =
                    registry
                        .condition(name)
                        .ok_or_else(|| DefinitionError::UnknownCondition {
                            event: event.to_string(),
                            condition: name.clone(),
                        })?;
                Predicate::Custom(condition)
            }
            ConditionDef::Not(inner) => Predicate::not(inner.resolve(event, registry)?),
            ConditionDef::All(members) => Predicate::all(
                members
                    .iter()
                    .map(|m| m.resolve(event, registry))
                    .collect::<Result<_, _>>()?,
            ),
            ConditionDef::Any(members) => Predicate::any(
                members
                    .iter()
                    .map(|m| m.resolve(event, registry))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

impl MachineDefinition {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Bind every name against `registry` and build a validated machine.
    pub fn build(&self, registry: &Registry) -> Result<StateMachine, DefinitionError> {
        let mut states: HashMap<&str, State> = HashMap::new();
        for def in &self.states {
            let state = match &def.action {
                Some(action) => {
                    let bound =
                        registry
                            .action(action)
                            .ok_or_else(|| DefinitionError::UnknownAction {
                                state: def.name.clone(),
                                action: action.clone(),
                            })?;
                    State::with_shared_action(def.name.as_str(), bound)
                }
                None => State::new(def.name.as_str()),
            };
            if states.insert(def.name.as_str(), state).is_some() {
                return Err(DefinitionError::DuplicateName(def.name.clone()));
            }
        }

        let mut events: HashMap<&str, Event> = HashMap::new();
        for def in &self.events {
            let predicate = def.condition.resolve(&def.name, registry)?;
            if events
                .insert(def.name.as_str(), Event::new(def.name.as_str(), predicate))
                .is_some()
            {
                return Err(DefinitionError::DuplicateName(def.name.clone()));
            }
        }

        let state = |name: &str| {
            states
                .get(name)
                .cloned()
                .ok_or_else(|| DefinitionError::UnknownState(name.to_string()))
        };

        let transitions = self
            .transitions
            .iter()
            .map(|def| -> Result<Transition, DefinitionError> {
                let event = events
                    .get(def.event.as_str())
                    .cloned()
                    .ok_or_else(|| DefinitionError::UnknownEvent(def.event.clone()))?;
                Ok(Transition::new(state(&def.from)?, event, state(&def.to)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = StateMachineBuilder::new()
            .config(self.config.clone())
            .transitions(transitions);
        if let Some(initial) = &self.initial {
            builder = builder.initial(state(initial)?);
        }

        Ok(builder.build()?)
    }
}
