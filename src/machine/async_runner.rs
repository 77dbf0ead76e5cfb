//! Driving a machine from a tokio task.
//!
//! Guards and actions are synchronous and may block, so each cycle runs on the
//! blocking pool while the task itself only waits on the poll interval and the
//! shutdown signal. As with the threaded runner, the full poll interval elapses
//! after each cycle finishes, however long its action took.

use crate::config::ErrorStrategy;
use crate::machine::engine::StateMachine;
use crate::machine::error::RunnerError;
use crate::machine::status::{MachineStatus, StatusHandle};
use log::{error, info, warn};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use uuid::Uuid;

/// Owner's handle to a machine running as a tokio task.
///
/// Dropping the handle detaches the task; it keeps polling.
pub struct AsyncMachineHandle {
    id: Uuid,
    name: String,
    status: StatusHandle,
    shutdown: watch::Sender<bool>,
    join_handle: JoinHandle<Result<StateMachine, RunnerError>>,
}

impl AsyncMachineHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> MachineStatus {
        self.status.get()
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Signal shutdown and wait for the machine to be handed back.
    pub async fn stop(self) -> Result<StateMachine, RunnerError> {
        info!("{}: stop requested", self.name);
        let _ = self.shutdown.send(true);
        self.join().await
    }

    pub async fn join(self) -> Result<StateMachine, RunnerError> {
        self.join_handle.await.map_err(|_| RunnerError::Panicked)?
    }
}

impl StateMachine {
    /// Start the evaluation loop as a tokio task. Must be called from within a
    /// runtime.
    pub fn spawn_async(self) -> AsyncMachineHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let id = self.id();
        let name = self.name().to_string();
        let status = self.status_handle();

        let join_handle = tokio::spawn(run_async_loop(self, shutdown_rx));
        info!("{}: spawned evaluation task (id {})", name, id);

        AsyncMachineHandle {
            id,
            name,
            status,
            shutdown,
            join_handle,
        }
    }
}

async fn run_async_loop(
    mut machine: StateMachine,
    mut shutdown: watch::Receiver<bool>,
) -> Result<StateMachine, RunnerError> {
    let poll_interval = machine.config().poll_interval();
    let mut owner_attached = true;

    loop {
        let (returned, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = machine.step();
            (machine, outcome)
        })
        .await
        .map_err(|_| RunnerError::Panicked)?;
        machine = returned;

        if let Err(err) = outcome {
            match machine.config().on_error {
                ErrorStrategy::Halt => {
                    error!(
                        "{}: halting in [{}] at cycle {}: {}",
                        machine.name(), machine.current_state(), machine.cycles(), err
                    );
                    return Err(err.into());
                }
                ErrorStrategy::SkipCycle => {
                    warn!(
                        "{}: skipping cycle {} in [{}]: {}",
                        machine.name(), machine.cycles(), machine.current_state(), err
                    );
                }
            }
        }

        let pause = sleep(poll_interval);
        tokio::pin!(pause);
        loop {
            tokio::select! {
                _ = &mut pause => break,
                changed = shutdown.changed(), if owner_attached => {
                    match changed {
                        Ok(()) if *shutdown.borrow() => {
                            info!(
                                "{}: cancelled in [{}] after {} cycles",
                                machine.name(), machine.current_state(), machine.cycles()
                            );
                            return Ok(machine);
                        }
                        Ok(()) => {}
                        // Handle dropped: keep running detached.
                        Err(_) => owner_attached = false,
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::core::{Event, Predicate, Signals, State, Transition};
    use crate::machine::MachineError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    fn conflicting() -> StateMachine {
        StateMachine::new(vec![
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
    }

    fn fast() -> MachineConfig {
        MachineConfig::default()
            .with_name("async-test")
            .with_poll_interval(Duration::from_millis(1))
    }

    async fn wait_for<F: Fn() -> bool>(check: F) -> bool {
        for _ in 0..2500 {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        false
    }

    #[tokio::test]
    async fn async_machine_transitions_and_stops() {
        let signals = Signals::new();
        let machine = StateMachine::new(vec![Transition::new(
            State::new("idle"),
            Event::new("go", signals.predicate("go")),
            State::new("busy"),
        )])
        .unwrap()
        .with_config(fast());

        let handle = machine.spawn_async();
        assert!(wait_for(|| handle.status().cycle > 0).await);

        signals.set("go", true);
        assert!(wait_for(|| handle.status().current_state == "busy").await);

        let machine = handle.stop().await.unwrap();
        assert_eq!(machine.current_state().name(), "busy");
    }

    #[tokio::test]
    async fn async_machine_halts_on_conflict() {
        let machine = conflicting().with_config(fast());

        let result = machine.spawn_async().join().await;
        assert!(matches!(
            result,
            Err(RunnerError::Machine(MachineError::ConfigurationConflict { .. }))
        ));
    }

    #[tokio::test]
    async fn skip_cycle_keeps_conflicting_machine_alive() {
        let machine =
            conflicting().with_config(fast().with_error_strategy(ErrorStrategy::SkipCycle));

        let handle = machine.spawn_async();
        assert!(wait_for(|| handle.status().cycle >= 5).await);
        assert!(!handle.is_finished());

        let machine = handle.stop().await.unwrap();
        assert_eq!(machine.current_state().name(), "a");
        assert!(machine.history().is_empty());
    }

    #[tokio::test]
    async fn dropped_handle_leaves_task_running() {
        let machine = StateMachine::new(vec![Transition::new(
            State::new("idle"),
            Event::new("go", Predicate::Never),
            State::new("busy"),
        )])
        .unwrap()
        .with_config(fast());
        let status = machine.status_handle();

        drop(machine.spawn_async());
        assert!(wait_for(|| status.get().cycle > 0).await);

        let seen = status.get().cycle;
        assert!(wait_for(|| status.get().cycle > seen + 3).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn poll_interval_follows_each_cycle() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let machine = StateMachine::new(vec![Transition::new(
            State::with_action("slow", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(30));
            }),
            Event::new("go", Predicate::Never),
            State::new("done"),
        )])
        .unwrap()
        .with_config(fast().with_poll_interval(Duration::from_millis(30)));

        let started = Instant::now();
        let handle = machine.spawn_async();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let machine = handle.stop().await.unwrap();
        let elapsed = started.elapsed();

        // Each cycle takes at least the action plus a full interval.
        let ceiling = elapsed.as_millis() / 60 + 1;
        assert!(machine.cycles() as u128 <= ceiling);
        assert_eq!(runs.load(Ordering::SeqCst) as u64, machine.cycles());
    }
}
