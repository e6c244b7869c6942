//! Incremental list loading.
//!
//! Lists load local-first (fast path), reconcile from the remote, paginate
//! append-only with dedup, and stay visually stable when a background
//! refresh returns the same items in a new natural order.

mod cursor;
mod loader;

pub use cursor::{merge_page, stabilize_order, ListEntry, PageCursor};
pub use loader::{ListLoader, ListSlice, INVALIDATION_DEBOUNCE};
