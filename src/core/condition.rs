//! Guard conditions gating whether an event may fire.
//!
//! A condition is a pure predicate with respect to the engine: it may read any
//! external state it captured at construction (usually a [`Signals`] handle),
//! but it never mutates engine state and never fails. A condition that cannot
//! decide must answer `false`.

use super::signals::Signals;
use std::fmt;
use std::sync::Arc;

/// Predicate tested once per cycle for every outgoing event of the current state.
///
/// Any `Fn() -> bool + Send + Sync` closure is a condition, so ad-hoc guards can be
/// written inline:
///
/// ```rust
/// use tripwire::core::{Condition, Signals};
///
/// let signals = Signals::new();
/// let reader = signals.clone();
/// let door_open = move || reader.get("door_open");
///
/// assert!(!door_open.test());
/// signals.set("door_open", true);
/// assert!(door_open.test());
/// ```
pub trait Condition: Send + Sync {
    /// Should the event guarded by this condition fire now?
    fn test(&self) -> bool;
}

impl<F> Condition for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn test(&self) -> bool {
        (self)()
    }
}

/// Closed set of commonly needed conditions.
///
/// Covers fixed answers, direct reads of a named signal and boolean combinations,
/// with [`Predicate::Custom`] as the escape hatch for anything else.
///
/// ```rust
/// use tripwire::core::{Condition, Predicate, Signals};
///
/// let signals = Signals::new();
/// // Door reported open by the sensor, and the user is not asking to close it.
/// let settled_open = Predicate::all(vec![
///     signals.predicate("door_opened"),
///     Predicate::not(signals.predicate("user_close")),
/// ]);
///
/// signals.set("door_opened", true);
/// assert!(settled_open.test());
/// signals.set("user_close", true);
/// assert!(!settled_open.test());
/// ```
#[derive(Clone)]
pub enum Predicate {
    Always,
    Never,
    Signal { signals: Signals, name: String },
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Custom(Arc<dyn Condition>),
}

impl Predicate {
    /// Read one named signal from a bus.
    pub fn signal(signals: &Signals, name: impl Into<String>) -> Self {
        Predicate::Signal {
            signals: signals.clone(),
            name: name.into(),
        }
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// True when every member is true. An empty list is true.
    pub fn all(members: Vec<Predicate>) -> Self {
        Predicate::All(members)
    }

    /// True when at least one member is true. An empty list is false.
    pub fn any(members: Vec<Predicate>) -> Self {
        Predicate::Any(members)
    }

    pub fn custom<C>(condition: C) -> Self
    where
        C: Condition + 'static,
    {
        Predicate::Custom(Arc::new(condition))
    }
}

impl Condition for Predicate {
    fn test(&self) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Never => false,
            Predicate::Signal { signals, name } => signals.get(name),
            Predicate::Not(inner) => !inner.test(),
            Predicate::All(members) => members.iter().all(|member| member.test()),
            Predicate::Any(members) => members.iter().any(|member| member.test()),
            Predicate::Custom(condition) => condition.test(),
        }
    }
}

impl From<bool> for Predicate {
    fn from(value: bool) -> Self {
        if value {
            Predicate::Always
        } else {
            Predicate::Never
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Always => write!(f, "Always"),
            Predicate::Never => write!(f, "Never"),
            Predicate::Signal { name, .. } => write!(f, "Signal({name})"),
            Predicate::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Predicate::All(members) => f.debug_tuple("All").field(members).finish(),
            Predicate::Any(members) => f.debug_tuple("Any").field(members).finish(),
            Predicate::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
