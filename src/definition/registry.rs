//! Named actions and conditions that definitions bind against.

use crate::core::{Action, Condition, Signals};
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup table from names used in a definition to the code they stand for.
///
/// The registry also owns the [`Signals`] bus that `{"signal": ...}` conditions
/// read, so actions registered here usually capture a clone of
/// [`Registry::signals`].
#[derive(Clone, Default)]
pub struct Registry {
    signals: Signals,
    actions: HashMap<String, Action>,
    conditions: HashMap<String, Arc<dyn Condition>>,
}

impl Registry {
    pub fn new(signals: Signals) -> Self {
        Self {
            signals,
            actions: HashMap::new(),
            conditions: HashMap::new(),
        }
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn with_action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    pub fn with_condition<C>(mut self, name: impl Into<String>, condition: C) -> Self
    where
        C: Condition + 'static,
    {
        self.conditions.insert(name.into(), Arc::new(condition));
        self
    }

    pub fn action(&self, name: &str) -> Option<Action> {
        self.actions.get(name).cloned()
    }

    pub fn condition(&self, name: &str) -> Option<Arc<dyn Condition>> {
        self.conditions.get(name).cloned()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut actions: Vec<&String> = self.actions.keys().collect();
        let mut conditions: Vec<&String> = self.conditions.keys().collect();
        actions.sort();
        conditions.sort();
        f.debug_struct("Registry")
            .field("signals", &self.signals)
            .field("actions", &actions)
            .field("conditions", &conditions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn lookups_return_registered_entries() {
        let ran = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&ran);
        let registry = Registry::default()
            .with_action("ring", move || seen.store(true, Ordering::SeqCst))
            .with_condition("yes", || true);

        (registry.action("ring").unwrap())();
        assert!(ran.load(Ordering::SeqCst));
        assert!(registry.condition("yes").unwrap().test());
        assert!(registry.action("missing").is_none());
        assert!(registry.condition("missing").is_none());
    }

    #[test]
    fn registry_shares_signal_bus() {
        let signals = Signals::new();
        let registry = Registry::new(signals.clone());

        registry.signals().set("flag", true);
        assert!(signals.get("flag"));
    }
}
