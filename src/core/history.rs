//! In-memory record of transitions taken by a machine.
//!
//! History is bounded and never persisted; it exists for diagnostics and tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single applied transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the state left
    pub from: String,
    /// Name of the event that fired
    pub event: String,
    /// Name of the state entered
    pub to: String,
    /// Cycle number in which the transition was applied (first cycle is 1)
    pub cycle: u64,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of transitions.
///
/// Once `limit` records are held, recording a new one evicts the oldest.
/// A limit of zero disables recording.
///
/// # Example
///
/// ```rust
/// use tripwire::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_limit(8);
/// history.record(TransitionRecord {
///     from: "closed".into(),
///     event: "open".into(),
///     to: "opening".into(),
///     cycle: 1,
///     timestamp: Utc::now(),
/// });
/// history.record(TransitionRecord {
///     from: "opening".into(),
///     event: "sensor opened".into(),
///     to: "opened".into(),
///     cycle: 3,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec!["closed", "opening", "opened"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    limit: usize,
    transitions: VecDeque<TransitionRecord>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::with_limit(64)
    }
}

impl StateHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            transitions: VecDeque::with_capacity(limit.min(64)),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn record(&mut self, transition: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.transitions.len() >= self.limit {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Names of the states traversed: the source of the oldest retained record,
    /// then the target of every record in order.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.transitions.iter().map(|t| t.to.as_str()));
        path
    }

    /// Time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        match (self.transitions.front(), self.transitions.back()) {
            (Some(first), Some(last)) => last
                .timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok(),
            _ => None,
        }
    }

    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &TransitionRecord> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
