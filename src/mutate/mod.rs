//! Optimistic mutation with debounced background persistence.
//!
//! A toggle-like action (reactions, watched-marking, list membership) must
//! feel instantaneous: the decision is computed purely, the slices are
//! updated immediately, and only the *final* value after a short debounce
//! reaches the network. A newer intent for the same target supersedes an
//! older one that has not committed yet.

mod intent;
mod mutator;

pub use intent::{next_reaction, MutationIntent};
pub use mutator::{MutationErrorCallback, OptimisticMutator, MUTATION_DEBOUNCE};
