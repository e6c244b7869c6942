//! Pagination cursor and order-stability math.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Identity for items in a paginated list.
pub trait ListEntry: Clone + Send + Sync + 'static {
    type Key: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

/// Tracks pagination progress for one list-bearing screen.
///
/// `observed_order` is the key sequence from the last successful load; a
/// background refresh re-sorts into it so items whose upstream sort key
/// moved do not visually jump.
#[derive(Debug, Clone)]
pub struct PageCursor<K> {
    pages: u32,
    has_more: bool,
    observed_order: Vec<K>,
}

impl<K: Clone> PageCursor<K> {
    pub fn new() -> Self {
        Self {
            pages: 0,
            has_more: true,
            observed_order: Vec::new(),
        }
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn observed_order(&self) -> &[K] {
        &self.observed_order
    }

    /// Reset for a user-initiated full load. Drops the observed order so
    /// the fetch's natural order is adopted.
    pub fn reset(&mut self) {
        self.pages = 0;
        self.has_more = true;
        self.observed_order.clear();
    }

    /// Record a successful load of `pages` pages.
    pub fn commit(&mut self, pages: u32, has_more: bool, order: Vec<K>) {
        self.pages = pages;
        self.has_more = has_more;
        self.observed_order = order;
    }
}

impl<K: Clone> Default for PageCursor<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-sort `fetched` into the previously observed key order.
///
/// Keys already observed keep their old relative positions; keys new to
/// the list append afterwards in the fetch's natural order. An empty
/// observed order (first load) returns the fetch untouched.
pub fn stabilize_order<T: ListEntry>(fetched: Vec<T>, observed: &[T::Key]) -> Vec<T> {
    if observed.is_empty() {
        return fetched;
    }
    let positions: HashMap<&T::Key, usize> = observed
        .iter()
        .enumerate()
        .map(|(index, key)| (key, index))
        .collect();

    let mut known: Vec<(usize, T)> = Vec::new();
    let mut fresh: Vec<T> = Vec::new();
    for item in fetched {
        match positions.get(&item.key()) {
            Some(&index) => known.push((index, item)),
            None => fresh.push(item),
        }
    }
    known.sort_by_key(|(index, _)| *index);

    let mut result: Vec<T> = known.into_iter().map(|(_, item)| item).collect();
    result.extend(fresh);
    result
}

/// Append a new page onto the current list, deduplicating by key.
///
/// An item present in both keeps its current position and takes the newer
/// page's copy; genuinely new items append in page order.
pub fn merge_page<T: ListEntry>(current: Vec<T>, page: Vec<T>) -> Vec<T> {
    let mut positions: HashMap<T::Key, usize> = current
        .iter()
        .enumerate()
        .map(|(index, item)| (item.key(), index))
        .collect();

    let mut merged = current;
    for item in page {
        match positions.get(&item.key()) {
            Some(&index) => merged[index] = item,
            None => {
                positions.insert(item.key(), merged.len());
                merged.push(item);
            }
        }
    }
    merged
}
