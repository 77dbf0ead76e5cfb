//! The condition-driven state machine and its evaluation loop.

use crate::builder::{canonical_states, check_table, BuildError};
use crate::config::{ErrorStrategy, MachineConfig};
use crate::core::{Event, State, StateHistory, Transition, TransitionRecord};
use crate::machine::cancel::CancelToken;
use crate::machine::error::MachineError;
use crate::machine::status::StatusHandle;
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Serialize;
use uuid::Uuid;

/// Result of executing a single cycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// No guard fired; the machine stayed where it was
    Stayed { state: String, acted: bool },

    /// Exactly one guard fired and its transition was applied
    Transitioned {
        from: String,
        event: String,
        to: String,
        acted: bool,
    },
}

impl StepResult {
    /// Name of the state the machine is in after the cycle.
    pub fn state(&self) -> &str {
        match self {
            StepResult::Stayed { state, .. } => state,
            StepResult::Transitioned { to, .. } => to,
        }
    }

    pub fn transitioned(&self) -> bool {
        matches!(self, StepResult::Transitioned { .. })
    }

    /// Whether the resident state's action ran during the cycle.
    pub fn acted(&self) -> bool {
        match self {
            StepResult::Stayed { acted, .. } | StepResult::Transitioned { acted, .. } => *acted,
        }
    }
}

/// Serializable diagnostic view of a machine.
#[derive(Clone, Debug, Serialize)]
pub struct MachineSnapshot {
    pub id: Uuid,
    pub name: String,
    pub initial_state: String,
    pub current_state: String,
    pub cycle: u64,
    pub history: StateHistory,
}

/// Finite-state machine driven by polling guard conditions.
///
/// Each cycle looks up the transitions leaving the current state, tests their
/// guards in table order and applies the single one that fired, then runs the
/// resident state's action. More than one fired guard is a table defect and is
/// reported as [`MachineError::ConfigurationConflict`].
///
/// # Example
///
/// ```rust
/// use tripwire::core::{Event, Signals, State, Transition};
/// use tripwire::machine::{StateMachine, StepResult};
///
/// let signals = Signals::new();
/// let closed = State::new("closed");
/// let opening = State::new("opening");
/// let open = Event::new("open", signals.predicate("user_open"));
///
/// let mut machine = StateMachine::new(vec![
///     Transition::new(closed.clone(), open, opening.clone()),
/// ]).unwrap();
/// assert_eq!(machine.current_state(), &closed);
///
/// assert!(!machine.step().unwrap().transitioned());
///
/// signals.set("user_open", true);
/// machine.step().unwrap();
/// assert_eq!(machine.current_state(), &opening);
/// ```
pub struct StateMachine {
    id: Uuid,
    config: MachineConfig,
    transitions: Vec<Transition>,
    initial: State,
    current: State,
    cycle: u64,
    history: StateHistory,
    status: StatusHandle,
}

impl StateMachine {
    /// Create a machine whose initial state is the source of the first transition.
    pub fn new(transitions: Vec<Transition>) -> Result<Self, BuildError> {
        let initial = transitions
            .first()
            .map(|t| t.source.clone())
            .ok_or(BuildError::EmptyTable)?;
        check_table(&transitions, None)?;
        Ok(Self::assemble(transitions, initial, MachineConfig::default()))
    }

    /// Create a machine starting in an explicitly chosen state.
    ///
    /// The state must appear in the table as a source or a target.
    pub fn with_initial(transitions: Vec<Transition>, initial: State) -> Result<Self, BuildError> {
        check_table(&transitions, Some(&initial))?;
        Ok(Self::assemble(transitions, initial, MachineConfig::default()))
    }

    /// Build from an already validated table.
    ///
    /// States are identified by name, so every state in the table and the
    /// initial state are replaced by one shared copy per name. The copy that
    /// carries an action wins, so a bare `State::new(name)` in any row or as
    /// the initial state still runs that name's action.
    pub(crate) fn assemble(
        transitions: Vec<Transition>,
        initial: State,
        config: MachineConfig,
    ) -> Self {
        let canonical = canonical_states(&transitions, &initial);
        let resolve = |state: State| canonical.get(state.name()).cloned().unwrap_or(state);

        let transitions: Vec<Transition> = transitions
            .into_iter()
            .map(|t| Transition::new(resolve(t.source), t.event, resolve(t.target)))
            .collect();
        let initial = resolve(initial);
        let status = StatusHandle::new(initial.name());

        Self {
            id: Uuid::new_v4(),
            history: StateHistory::with_limit(config.history_limit),
            config,
            transitions,
            current: initial.clone(),
            initial,
            cycle: 0,
            status,
        }
    }

    /// Replace the configuration. History is reset to the new limit.
    pub fn with_config(mut self, config: MachineConfig) -> Self {
        self.history = StateHistory::with_limit(config.history_limit);
        self.config = config;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    pub fn current_state(&self) -> &State {
        &self.current
    }

    /// Number of cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Handle for observing this machine once it runs elsewhere.
    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            id: self.id,
            name: self.config.name.clone(),
            initial_state: self.initial.name().to_string(),
            current_state: self.current.name().to_string(),
            cycle: self.cycle,
            history: self.history.clone(),
        }
    }

    /// Transitions leaving the current state, in table order.
    pub fn candidates(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(|t| t.leaves(&self.current))
    }

    /// Test every candidate guard and return the one event that fired, if any.
    pub fn triggered_event(&self) -> Result<Option<&Event>, MachineError> {
        let mut fired: Vec<&Event> = Vec::new();
        for transition in self.candidates() {
            let hit = transition.event.test();
            debug!(
                "{}: [{}] testing '{}': {}",
                self.config.name, self.current, transition.event, hit
            );
            if hit {
                fired.push(&transition.event);
            }
        }

        match fired.as_slice() {
            [] => Ok(None),
            [event] => Ok(Some(*event)),
            events => Err(MachineError::ConfigurationConflict {
                state: self.current.name().to_string(),
                events: events.iter().map(|e| e.name().to_string()).collect(),
            }),
        }
    }

    /// Find the transition for `event` out of `state`.
    pub fn get_transition(&self, state: &State, event: &Event) -> Result<&Transition, MachineError> {
        self.transitions
            .iter()
            .find(|t| t.matches(state, event))
            .ok_or_else(|| MachineError::MissingTransition {
                state: state.name().to_string(),
                event: event.name().to_string(),
            })
    }

    /// Move to the target of the transition for `event` out of the current state.
    ///
    /// This is the only place the current state changes. The live status is
    /// published once per cycle by [`StateMachine::step`], not here.
    pub fn execute_transition(&mut self, event: &Event) -> Result<&State, MachineError> {
        let target = self.get_transition(&self.current, event)?.target.clone();
        let from = std::mem::replace(&mut self.current, target);

        info!(
            "{}: [{}] --[{}]--> [{}]",
            self.config.name, from, event, self.current
        );
        self.history.record(TransitionRecord {
            from: from.name().to_string(),
            event: event.name().to_string(),
            to: self.current.name().to_string(),
            cycle: self.cycle,
            timestamp: Utc::now(),
        });

        Ok(&self.current)
    }

    /// Execute one cycle: lookup, evaluate, apply, act.
    ///
    /// A failed cycle neither transitions nor runs an action.
    pub fn step(&mut self) -> Result<StepResult, MachineError> {
        self.cycle += 1;
        let result = self.evaluate_and_apply();
        self.status.publish(self.current.name(), self.cycle);
        result
    }

    fn evaluate_and_apply(&mut self) -> Result<StepResult, MachineError> {
        let fired = self.triggered_event()?.cloned();

        match fired {
            Some(event) => {
                let from = self.current.name().to_string();
                self.execute_transition(&event)?;
                let acted = self.current.run_action();
                Ok(StepResult::Transitioned {
                    from,
                    event: event.name().to_string(),
                    to: self.current.name().to_string(),
                    acted,
                })
            }
            None => {
                let acted = self.current.run_action();
                Ok(StepResult::Stayed {
                    state: self.current.name().to_string(),
                    acted,
                })
            }
        }
    }

    /// Run cycles until `cancel` fires or a cycle fails under
    /// [`ErrorStrategy::Halt`].
    ///
    /// Blocks the calling thread. Returns `Ok(())` only on cancellation.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<(), MachineError> {
        info!(
            "{}: running from [{}] (id {}, polling every {:?})",
            self.config.name,
            self.current,
            self.id,
            self.config.poll_interval()
        );

        while !cancel.is_cancelled() {
            if let Err(err) = self.step() {
                match self.config.on_error {
                    ErrorStrategy::Halt => {
                        error!(
                            "{}: halting in [{}] at cycle {}: {}",
                            self.config.name, self.current, self.cycle, err
                        );
                        return Err(err);
                    }
                    ErrorStrategy::SkipCycle => {
                        warn!(
                            "{}: skipping cycle {} in [{}]: {}",
                            self.config.name, self.cycle, self.current, err
                        );
                    }
                }
            }

            if cancel.wait_timeout(self.config.poll_interval()) {
                break;
            }
        }

        info!(
            "{}: cancelled in [{}] after {} cycles",
            self.config.name, self.current, self.cycle
        );
        Ok(())
    }
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("current", &self.current.name())
            .field("cycle", &self.cycle)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}
