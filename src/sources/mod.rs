//! Collaborator seams.
//!
//! The state core consumes these interfaces and never reimplements what
//! sits behind them (HTTP clients, databases, the session service). Fakes
//! implementing them back the integration tests.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::model::{Comment, CommentId, MediaId, Reaction, ReactionSummary, Viewer};

/// Fast local cache for a list-bearing screen.
///
/// An empty result means "no cache"; it is not an error.
#[async_trait]
pub trait LocalSource<T>: Send + Sync {
    async fn local_list(&self) -> Vec<T>;
}

/// Remote paged fetch for a list-bearing screen.
#[async_trait]
pub trait RemoteSource<T>: Send + Sync {
    async fn page(&self, page: u32, page_size: usize) -> Result<Vec<T>, SyncError>;
}

/// Backend persistence for toggle-like mutations.
///
/// Fire-and-forget from the caller's perspective; failures stay observable
/// through the mutator's error callback.
#[async_trait]
pub trait MutationBackend<K, V>: Send + Sync {
    /// Create or replace the viewer's value for `target`.
    async fn upsert(&self, target: K, value: V) -> Result<(), SyncError>;

    /// Clear the viewer's value for `target`.
    async fn remove(&self, target: K) -> Result<(), SyncError>;
}

/// Per-comment reaction data as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentReactions {
    pub comment_id: CommentId,
    /// The viewer's own reaction, if any.
    pub mine: Option<Reaction>,
    pub summary: ReactionSummary,
}

/// Comments and their reaction data for one media item.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn comments(&self, media: MediaId) -> Result<Vec<Comment>, SyncError>;

    async fn reactions(&self, media: MediaId) -> Result<Vec<CommentReactions>, SyncError>;
}

/// Who is signed in, if anyone.
pub trait SessionOracle: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn current_user(&self) -> Option<Viewer>;
}
