//! Shared test fixtures: fake collaborators and entity builders.

#![allow(dead_code, unused_imports)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use watchdeck::error::SyncError;
use watchdeck::model::{
    Comment, CommentId, LibraryEntry, MediaId, Reaction, ReactionSummary, Show, Viewer,
};
use watchdeck::sources::{
    CommentReactions, CommentSource, LocalSource, MutationBackend, RemoteSource, SessionOracle,
};

/// Install a test subscriber once so `RUST_LOG` can surface core logs.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Session oracle with a fixed answer.
pub struct FakeSession {
    pub authenticated: bool,
}

impl FakeSession {
    pub fn signed_in() -> Arc<Self> {
        Arc::new(Self {
            authenticated: true,
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self {
            authenticated: false,
        })
    }
}

impl SessionOracle for FakeSession {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn current_user(&self) -> Option<Viewer> {
        self.authenticated.then(|| Viewer {
            username: "maren".into(),
            display_name: Some("Maren".into()),
        })
    }
}

/// Local cache with fixed contents.
pub struct FakeLocal<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Clone + Send + Sync + 'static> FakeLocal<T> {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(Vec::new()),
        })
    }

    pub fn with(items: Vec<T>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(items),
        })
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> LocalSource<T> for FakeLocal<T> {
    async fn local_list(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

/// Remote source that replays scripted responses in order and records
/// every call it receives.
pub struct ScriptedRemote<T> {
    responses: Mutex<VecDeque<Result<Vec<T>, SyncError>>>,
    calls: Mutex<Vec<(u32, usize)>>,
}

impl<T: Clone + Send + Sync + 'static> ScriptedRemote<T> {
    pub fn new(responses: Vec<Result<Vec<T>, SyncError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(u32, usize)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> RemoteSource<T> for ScriptedRemote<T> {
    async fn page(&self, page: u32, page_size: usize) -> Result<Vec<T>, SyncError> {
        self.calls.lock().push((page, page_size));
        // Real fetches suspend; give observers a chance to see the
        // pre-fetch snapshot.
        tokio::task::yield_now().await;
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Mutation backend that records calls and can be told to fail.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Mutex<Vec<(CommentId, Option<Reaction>)>>,
    pub fail: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let backend = Self::default();
        backend.fail.store(true, Ordering::SeqCst);
        Arc::new(backend)
    }

    pub fn calls(&self) -> Vec<(CommentId, Option<Reaction>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MutationBackend<CommentId, Reaction> for RecordingBackend {
    async fn upsert(&self, target: CommentId, value: Reaction) -> Result<(), SyncError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Service {
                status: 500,
                message: "persist failed".into(),
            });
        }
        self.calls.lock().push((target, Some(value)));
        Ok(())
    }

    async fn remove(&self, target: CommentId) -> Result<(), SyncError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SyncError::Service {
                status: 500,
                message: "persist failed".into(),
            });
        }
        self.calls.lock().push((target, None));
        Ok(())
    }
}

/// Comment source with fixed data.
pub struct FakeComments {
    pub comments: Vec<Comment>,
    pub reactions: Vec<CommentReactions>,
}

impl FakeComments {
    pub fn new(comments: Vec<Comment>, reactions: Vec<CommentReactions>) -> Arc<Self> {
        Arc::new(Self { comments, reactions })
    }
}

#[async_trait]
impl CommentSource for FakeComments {
    async fn comments(&self, _media: MediaId) -> Result<Vec<Comment>, SyncError> {
        Ok(self.comments.clone())
    }

    async fn reactions(&self, _media: MediaId) -> Result<Vec<CommentReactions>, SyncError> {
        Ok(self.reactions.clone())
    }
}

pub fn show(id: u64, title: &str) -> Show {
    Show {
        id: MediaId(id),
        title: title.into(),
        year: Some(2020),
    }
}

pub fn entry(id: u64, title: &str, watched: u32, last_watched_at: u64) -> LibraryEntry {
    LibraryEntry {
        show: show(id, title),
        episodes_watched: watched,
        episodes_aired: 10,
        last_watched_at,
    }
}

pub fn comment(id: u64, media: u64, author: &str) -> Comment {
    Comment {
        id: CommentId(id),
        media_id: MediaId(media),
        author: author.into(),
        body: format!("comment {id} from {author}"),
        posted_at: 1_700_000_000 + id,
        spoiler: false,
    }
}

pub fn reactions_for(id: u64, mine: Option<Reaction>, counts: &[(Reaction, u64)]) -> CommentReactions {
    CommentReactions {
        comment_id: CommentId(id),
        mine,
        summary: ReactionSummary::from_counts(counts.iter().copied()),
    }
}
