//! Reactions and their aggregate distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The reaction kinds a viewer can attach to a comment or media item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Like,
    Love,
    Laugh,
    Shocked,
    Sad,
    Angry,
}

/// Aggregate reaction counts for one target.
///
/// Updated only by deltas (`shift`), never re-derived from the whole
/// collection. Counts saturate at zero so a stale starting point can never
/// push an entry negative.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionSummary {
    counts: BTreeMap<Reaction, u64>,
}

impl ReactionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a summary from authoritative per-kind counts.
    pub fn from_counts(counts: impl IntoIterator<Item = (Reaction, u64)>) -> Self {
        Self {
            counts: counts.into_iter().filter(|(_, n)| *n > 0).collect(),
        }
    }

    /// Count for one reaction kind.
    pub fn count(&self, reaction: Reaction) -> u64 {
        self.counts.get(&reaction).copied().unwrap_or(0)
    }

    /// Total reactions across all kinds.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Apply the delta of one viewer moving from `from` to `to`.
    ///
    /// `from == to` is a no-op: the caller's decision table has already
    /// collapsed "same reaction tapped again" into `to = None`.
    pub fn shift(&mut self, from: Option<Reaction>, to: Option<Reaction>) {
        if from == to {
            return;
        }
        if let Some(old) = from {
            let entry = self.counts.entry(old).or_insert(0);
            *entry = entry.saturating_sub(1);
            if *entry == 0 {
                self.counts.remove(&old);
            }
        }
        if let Some(new) = to {
            *self.counts.entry(new).or_insert(0) += 1;
        }
    }

    /// Non-zero entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = (Reaction, u64)> + '_ {
        self.counts.iter().map(|(r, n)| (*r, *n))
    }
}
