//! Macros for ergonomic transition table construction.

/// Build a `Vec<Transition>` from `(source, event) => target` rows.
///
/// Each operand is cloned, so the same state and event bindings can appear in
/// as many rows as needed.
///
/// # Example
///
/// ```
/// use tripwire::core::{Event, Predicate, State};
/// use tripwire::transition_table;
///
/// let opened = State::new("opened");
/// let closing = State::new("closing");
/// let closed = State::new("closed");
/// let open = Event::new("open", Predicate::Never);
/// let close = Event::new("close", Predicate::Never);
///
/// let table = transition_table! {
///     (opened, close) => closing,
///     (closing, open) => closing,
///     (closed, open) => opened,
/// };
///
/// assert_eq!(table.len(), 3);
/// assert!(table[1].is_self_loop());
/// ```
#[macro_export]
macro_rules! transition_table {
    (
        $( ($source:expr, $event:expr) => $target:expr ),* $(,)?
    ) => {
        vec![
            $(
                $crate::core::Transition::new(
                    ::std::clone::Clone::clone(&$source),
                    ::std::clone::Clone::clone(&$event),
                    ::std::clone::Clone::clone(&$target),
                )
            ),*
        ]
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, Predicate, State, Transition};

    #[test]
    fn transition_table_macro_preserves_order() {
        let a = State::new("a");
        let b = State::new("b");
        let go = Event::new("go", Predicate::Never);
        let back = Event::new("back", Predicate::Never);

        let table: Vec<Transition> = transition_table! {
            (a, go) => b,
            (b, back) => a,
        };

        let keys: Vec<_> = table.iter().map(Transition::key).collect();
        assert_eq!(keys, vec![("a", "go"), ("b", "back")]);
        assert_eq!(table[0].target, b);
    }

    #[test]
    fn transition_table_macro_accepts_empty_input() {
        let table: Vec<Transition> = transition_table! {};
        assert!(table.is_empty());
    }
}
