//! Live view of a machine that may be running on another thread.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Current state and cycle count as last published by the evaluation loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineStatus {
    pub current_state: String,
    pub cycle: u64,
}

/// Shared, read-mostly cell holding a [`MachineStatus`].
#[derive(Clone, Debug)]
pub struct StatusHandle {
    inner: Arc<RwLock<MachineStatus>>,
}

impl StatusHandle {
    pub(crate) fn new(current_state: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MachineStatus {
                current_state: current_state.to_string(),
                cycle: 0,
            })),
        }
    }

    pub(crate) fn publish(&self, current_state: &str, cycle: u64) {
        let mut status = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if status.current_state != current_state {
            status.current_state = current_state.to_string();
        }
        status.cycle = cycle;
    }

    pub fn get(&self) -> MachineStatus {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current_state(&self) -> String {
        self.get().current_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_is_visible_to_clones() {
        let status = StatusHandle::new("closed");
        let reader = status.clone();

        status.publish("opening", 3);
        assert_eq!(
            reader.get(),
            MachineStatus {
                current_state: "opening".into(),
                cycle: 3
            }
        );
        assert_eq!(reader.current_state(), "opening");
    }
}
