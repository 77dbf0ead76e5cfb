//! Runtime configuration of a machine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the evaluation loop does when a cycle fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStrategy {
    /// Stop the loop and return the error to the owner
    #[default]
    Halt,

    /// Log the error, skip the rest of the cycle and keep polling
    SkipCycle,
}

/// Configuration applied to a machine at build time.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust
/// use tripwire::config::{ErrorStrategy, MachineConfig};
/// use std::time::Duration;
///
/// let config = MachineConfig::from_json(r#"{ "name": "door", "poll_interval_ms": 250 }"#).unwrap();
/// assert_eq!(config.name, "door");
/// assert_eq!(config.poll_interval(), Duration::from_millis(250));
/// assert_eq!(config.on_error, ErrorStrategy::Halt);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Name used in log lines and as the evaluation thread's name
    pub name: String,

    /// Delay between the end of one cycle and the start of the next
    pub poll_interval_ms: u64,

    /// Maximum number of transitions kept in history
    pub history_limit: usize,

    pub on_error: ErrorStrategy,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: "state-machine".to_string(),
            poll_interval_ms: 1000,
            history_limit: 64,
            on_error: ErrorStrategy::Halt,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.on_error = strategy;
        self
    }
}
