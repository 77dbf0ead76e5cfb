//! Data model of the state machine.
//!
//! - Conditions and the `Predicate` variants that gate events
//! - The `Signals` bus conditions read and actions write
//! - States, events and transitions, all immutable once built
//! - Bounded transition history

mod condition;
mod event;
mod history;
mod signals;
mod state;
mod transition;

pub use condition::{Condition, Predicate};
pub use event::Event;
pub use history::{StateHistory, TransitionRecord};
pub use signals::Signals;
pub use state::{Action, State};
pub use transition::Transition;
