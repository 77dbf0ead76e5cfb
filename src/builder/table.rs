//! Validation of transition tables.
//!
//! Uses `Validation` so that every problem in a table is reported in one pass
//! instead of stopping at the first duplicate.

use crate::builder::error::{BuildError, TableViolation};
use crate::core::{State, Transition};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type TableCheck = Validation<(), NonEmptyVec<TableViolation>>;

/// Validate a table, accumulating ALL violations.
///
/// Checks that every `(source, event)` key is unique, that no state name is
/// bound to two different actions and, when given, that the initial state is a
/// source or target somewhere in the table. Each duplicated key and each
/// conflicting name is reported once regardless of how many times it repeats.
pub fn validate_table(transitions: &[Transition], initial: Option<&State>) -> TableCheck {
    let mut checks: Vec<TableCheck> = Vec::new();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for transition in transitions {
        let key = transition.key();
        let check = if seen.insert(key) || !reported.insert(key) {
            Validation::success(())
        } else {
            Validation::fail(TableViolation::DuplicateTransition {
                state: key.0.to_string(),
                event: key.1.to_string(),
            })
        };
        checks.push(check);
    }

    let mut acting: HashMap<&str, &State> = HashMap::new();
    let mut conflicting = HashSet::new();
    for state in table_states(transitions).chain(initial) {
        if !state.has_action() {
            continue;
        }
        let first = *acting.entry(state.name()).or_insert(state);
        if first.action_conflicts_with(state) && conflicting.insert(state.name()) {
            checks.push(Validation::fail(TableViolation::ConflictingState {
                state: state.name().to_string(),
            }));
        }
    }

    if let Some(initial) = initial {
        let known = transitions
            .iter()
            .any(|t| t.source == *initial || t.target == *initial);
        let check = if known {
            Validation::success(())
        } else {
            Validation::fail(TableViolation::UnknownInitialState {
                state: initial.name().to_string(),
            })
        };
        checks.push(check);
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Every state mentioned by the table, sources and targets, in row order.
fn table_states(transitions: &[Transition]) -> impl Iterator<Item = &State> {
    transitions.iter().flat_map(|t| [&t.source, &t.target])
}

/// One representative per state name: the copy carrying an action when there
/// is one, otherwise the first copy seen.
pub(crate) fn canonical_states<'a>(
    transitions: &'a [Transition],
    initial: &'a State,
) -> HashMap<String, State> {
    let mut canonical: HashMap<String, State> = HashMap::new();
    for state in table_states(transitions).chain(std::iter::once(initial)) {
        let keep_seen = canonical
            .get(state.name())
            .map_or(false, |seen| seen.has_action() || !state.has_action());
        if !keep_seen {
            canonical.insert(state.name().to_string(), state.clone());
        }
    }
    canonical
}

/// Full construction-time check: non-empty, then [`validate_table`].
pub(crate) fn check_table(
    transitions: &[Transition],
    initial: Option<&State>,
) -> Result<(), BuildError> {
    if transitions.is_empty() {
        return Err(BuildError::EmptyTable);
    }
    match validate_table(transitions, initial) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => Err(BuildError::InvalidTable(
            violations.iter().cloned().collect(),
        )),
    }
}
