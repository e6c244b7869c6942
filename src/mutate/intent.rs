//! Mutation intents and the toggle decision table.

use crate::model::Reaction;

/// A user-requested change to one target.
///
/// Created synchronously on the user action and handed straight to the
/// mutator. `observed` is the value the decision was computed against —
/// the last-known authoritative-or-optimistic value, not the value from
/// the start of the session — and rides along so a failure can be
/// reconciled against what the user actually saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationIntent<K, V> {
    pub target: K,
    /// Value in effect when the user acted.
    pub observed: Option<V>,
    /// Value the action resolves to; `None` is a clear.
    pub next: Option<V>,
}

impl<K, V> MutationIntent<K, V> {
    pub fn new(target: K, observed: Option<V>, next: Option<V>) -> Self {
        Self {
            target,
            observed,
            next,
        }
    }
}

/// The reaction toggle decision table. Pure; computed before any I/O.
///
/// - same reaction tapped again → clear
/// - different reaction → replace
/// - no existing reaction → set
pub fn next_reaction(current: Option<Reaction>, tapped: Reaction) -> Option<Reaction> {
    match current {
        Some(existing) if existing == tapped => None,
        _ => Some(tapped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tapping_same_reaction_clears() {
        assert_eq!(next_reaction(Some(Reaction::Like), Reaction::Like), None);
    }

    #[test]
    fn tapping_different_reaction_replaces() {
        assert_eq!(
            next_reaction(Some(Reaction::Like), Reaction::Love),
            Some(Reaction::Love)
        );
    }

    #[test]
    fn tapping_with_no_existing_sets() {
        assert_eq!(next_reaction(None, Reaction::Laugh), Some(Reaction::Laugh));
    }

    #[test]
    fn double_tap_nets_to_clear() {
        // First tap sets, second tap against the *optimistic* value clears.
        let after_first = next_reaction(None, Reaction::Sad);
        assert_eq!(after_first, Some(Reaction::Sad));
        let after_second = next_reaction(after_first, Reaction::Sad);
        assert_eq!(after_second, None);
    }
}
