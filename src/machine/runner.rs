//! Running a machine on its own thread of control.

use crate::machine::cancel::CancelToken;
use crate::machine::engine::StateMachine;
use crate::machine::error::{MachineError, RunnerError};
use crate::machine::status::{MachineStatus, StatusHandle};
use log::info;
use std::thread::{self, JoinHandle};
use uuid::Uuid;

/// Owner's handle to a machine running on a dedicated thread.
///
/// Dropping the handle detaches the thread; the machine keeps running until the
/// process exits or a cycle fails. Use [`MachineHandle::stop`] to cancel it and
/// get the machine back for inspection.
#[derive(Debug)]
pub struct MachineHandle {
    id: Uuid,
    name: String,
    cancel: CancelToken,
    status: StatusHandle,
    join_handle: JoinHandle<Result<StateMachine, MachineError>>,
}

impl MachineHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state and cycle count as last published by the loop.
    pub fn status(&self) -> MachineStatus {
        self.status.get()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the loop has exited (cancelled or failed).
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Cancel the loop and wait for it to hand the machine back.
    pub fn stop(self) -> Result<StateMachine, RunnerError> {
        info!("{}: stop requested", self.name);
        self.cancel.cancel();
        self.join()
    }

    /// Wait for the loop to exit without cancelling it.
    pub fn join(self) -> Result<StateMachine, RunnerError> {
        let outcome = self
            .join_handle
            .join()
            .map_err(|_| RunnerError::Panicked)?;
        Ok(outcome?)
    }
}

impl StateMachine {
    /// Start the evaluation loop on a new thread named after the machine.
    pub fn spawn(mut self) -> Result<MachineHandle, RunnerError> {
        let cancel = CancelToken::new();
        let loop_cancel = cancel.clone();
        let id = self.id();
        let name = self.name().to_string();
        let status = self.status_handle();

        let join_handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || -> Result<StateMachine, MachineError> {
                self.run(&loop_cancel)?;
                Ok(self)
            })?;

        info!("{}: spawned evaluation thread (id {})", name, id);
        Ok(MachineHandle {
            id,
            name,
            cancel,
            status,
            join_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::core::{Event, Predicate, Signals, State, Transition};
    use std::time::{Duration, Instant};

    fn wait_for<F: Fn() -> bool>(check: F) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn spawned_machine_reacts_to_signals_and_stops() {
        let signals = Signals::new();
        let machine = StateMachine::new(vec![Transition::new(
            State::new("idle"),
            Event::new("go", signals.predicate("go")),
            State::new("busy"),
        )])
        .unwrap()
        .with_config(
            MachineConfig::default()
                .with_name("spawn-test")
                .with_poll_interval(Duration::from_millis(1)),
        );

        let handle = machine.spawn().unwrap();
        assert_eq!(handle.name(), "spawn-test");
        assert!(wait_for(|| handle.status().cycle > 0));

        signals.set("go", true);
        assert!(wait_for(|| handle.status().current_state == "busy"));

        let machine = handle.stop().unwrap();
        assert_eq!(machine.current_state().name(), "busy");
        assert_eq!(machine.history().get_path(), vec!["idle", "busy"]);
    }

    #[test]
    fn failing_machine_reports_error_on_join() {
        let machine = StateMachine::new(vec![
            Transition::new(
                State::new("a"),
                Event::new("x", Predicate::Always),
                State::new("b"),
            ),
            Transition::new(
                State::new("a"),
                Event::new("y", Predicate::Always),
                State::new("c"),
            ),
        ])
        .unwrap()
        .with_config(MachineConfig::default().with_poll_interval(Duration::from_millis(1)));

        let handle = machine.spawn().unwrap();
        assert!(wait_for(|| handle.is_finished()));
        assert!(matches!(
            handle.join(),
            Err(RunnerError::Machine(MachineError::ConfigurationConflict { .. }))
        ));
    }

    #[test]
    fn panicking_action_is_reported() {
        let machine = StateMachine::new(vec![Transition::new(
            State::with_action("a", || panic!("actuator jammed")),
            Event::new("go", Predicate::Never),
            State::new("b"),
        )])
        .unwrap();

        let handle = machine.spawn().unwrap();
        assert!(matches!(handle.join(), Err(RunnerError::Panicked)));
    }
}
