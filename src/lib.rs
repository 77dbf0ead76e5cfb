//! Tripwire: a condition-driven polling state machine
//!
//! A machine holds a current state and, once per cycle, tests the guard
//! conditions of every event leaving that state. When exactly one guard fires
//! the matching transition is applied; the resident state's action then runs.
//! Two guards firing together means the transition table is ambiguous and is
//! reported as an error rather than resolved silently.
//!
//! # Core Concepts
//!
//! - **Condition**: pure predicate gating an event (`core::Condition`, `core::Predicate`)
//! - **Signals**: synchronized boolean bus that conditions read and actions write
//! - **State / Event / Transition**: immutable descriptors forming the table
//! - **StateMachine**: the evaluation loop, runnable in place, on a thread or
//!   (with the `async` feature) on a tokio task
//!
//! # Example
//!
//! ```rust
//! use tripwire::builder::StateMachineBuilder;
//! use tripwire::core::{Event, Signals, State};
//! use tripwire::transition_table;
//!
//! let signals = Signals::new();
//! let closed = State::new("closed");
//! let opening = {
//!     let signals = signals.clone();
//!     State::with_action("opening", move || signals.set("door_opened", true))
//! };
//! let opened = State::new("opened");
//!
//! let open = Event::new("open", signals.predicate("user_open"));
//! let sensor_opened = Event::new("sensor opened", signals.predicate("door_opened"));
//!
//! let mut machine = StateMachineBuilder::new()
//!     .initial(closed.clone())
//!     .transitions(transition_table! {
//!         (closed, open) => opening,
//!         (opening, sensor_opened) => opened,
//!     })
//!     .build()
//!     .unwrap();
//!
//! signals.set("user_open", true);
//! machine.step().unwrap();
//! assert_eq!(machine.current_state(), &opening);
//!
//! machine.step().unwrap();
//! assert_eq!(machine.current_state(), &opened);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod definition;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use config::{ErrorStrategy, MachineConfig};
pub use core::{Condition, Event, Predicate, Signals, State, Transition};
pub use machine::{CancelToken, MachineError, MachineHandle, StateMachine, StepResult};
