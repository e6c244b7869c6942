//! State-management core for a media-tracking client.
//!
//! Screens for shows, movies, episodes, comments and collections all share
//! the same shape: independent state slices combined into an immutable
//! snapshot, optimistic mutations with debounced background persistence,
//! and paginated lists that load local-first and stay visually stable
//! across background refreshes. This crate owns that shape; rendering,
//! navigation and the actual network/cache clients are collaborators
//! behind the traits in [`sources`].
//!
//! # Architecture
//!
//! ```text
//! user action ──→ screen model ──→ pure update ──→ StateStore ──→ snapshot stream
//!                      │                                               │
//!                      └──→ OptimisticMutator / ListLoader ──→ collaborators
//! ```
//!
//! Every screen owns a [`scope::ScreenScope`]; tearing it down cancels all
//! outstanding work, debounce timers included, without touching state.

pub mod error;
pub mod list;
pub mod model;
pub mod mutate;
pub mod scope;
pub mod screens;
pub mod sources;
pub mod state;
pub mod updates;
