//! The evaluation engine and ways to run it.
//!
//! # Key Concepts
//!
//! - **Cycle**: lookup, evaluate, apply, act. One call to [`StateMachine::step`].
//! - **Loop**: [`StateMachine::run`] repeats cycles with a fixed poll interval
//!   until cancelled or a cycle fails.
//! - **Runners**: [`StateMachine::spawn`] moves the loop onto its own thread;
//!   with the `async` feature, `spawn_async` drives it from a tokio task.

#[cfg(feature = "async")]
mod async_runner;
mod cancel;
mod engine;
mod error;
mod runner;
mod status;

#[cfg(feature = "async")]
pub use async_runner::AsyncMachineHandle;
pub use cancel::CancelToken;
pub use engine::{MachineSnapshot, StateMachine, StepResult};
pub use error::{MachineError, RunnerError};
pub use runner::MachineHandle;
pub use status::{MachineStatus, StatusHandle};
