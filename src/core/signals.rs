//! Shared boolean signal bus read by conditions and written by actions and
//! external producers (user input, sensors).

use super::condition::Predicate;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Cloneable handle to a synchronized table of named boolean signals.
///
/// All clones share the same table. Unknown signals read as `false`.
///
/// ```rust
/// use tripwire::core::Signals;
///
/// let signals = Signals::new();
/// let producer = signals.clone();
///
/// producer.set("user_open", true);
/// assert!(signals.get("user_open"));
/// assert!(!signals.get("never_written"));
/// ```
#[derive(Clone, Default)]
pub struct Signals {
    inner: Arc<RwLock<HashMap<String, bool>>>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus pre-populated with initial values.
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        let table = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Current value of a signal; `false` when it was never written.
    pub fn get(&self, name: &str) -> bool {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        table.get(name).copied().unwrap_or(false)
    }

    pub fn set(&self, name: impl Into<String>, value: bool) {
        let mut table = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        table.insert(name.into(), value);
    }

    /// Apply several writes under a single lock acquisition.
    ///
    /// Readers never observe a partially applied update, which matters when an
    /// action flips a pair of mutually exclusive sensor signals.
    ///
    /// ```rust
    /// use tripwire::core::Signals;
    ///
    /// let signals = Signals::with_values([("door_opened", true), ("door_closed", false)]);
    /// signals.update(|s| {
    ///     s.insert("door_opened".into(), false);
    ///     s.insert("door_closed".into(), true);
    /// });
    /// assert!(signals.get("door_closed"));
    /// ```
    pub fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut HashMap<String, bool>),
    {
        let mut table = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut table);
    }

    /// Copy of every signal currently on the bus.
    pub fn snapshot(&self) -> HashMap<String, bool> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Condition that is true while the named signal is set.
    pub fn predicate(&self, name: impl Into<String>) -> Predicate {
        Predicate::signal(self, name)
    }
}

impl std::fmt::Debug for Signals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signals")
            .field("values", &self.snapshot())
            .finish()
    }
}
