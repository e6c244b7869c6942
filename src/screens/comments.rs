//! Comments screen: a media item's comments with per-comment reactions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SyncError;
use crate::model::{Comment, CommentId, MediaId, Reaction, ReactionSummary, Viewer};
use crate::mutate::{next_reaction, MutationIntent, OptimisticMutator};
use crate::scope::ScreenScope;
use crate::sources::{CommentSource, MutationBackend, SessionOracle};
use crate::state::{LoadStatus, Notice, ScreenState, StateStore, Subscription};

/// Reaction state for one comment: the viewer's own choice plus the
/// aggregate distribution, kept consistent by delta math.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentReactionSlice {
    pub mine: Option<Reaction>,
    pub summary: ReactionSummary,
}

/// Immutable snapshot of the comments screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentsSnapshot {
    pub comments: Vec<Comment>,
    pub reactions: HashMap<CommentId, CommentReactionSlice>,
    pub viewer: Option<Viewer>,
    pub status: LoadStatus,
    pub notice: Option<Notice>,
    pub error: Option<SyncError>,
}

impl ScreenState for CommentsSnapshot {}

/// View-model for one media item's comments.
pub struct CommentsModel {
    media_id: MediaId,
    store: StateStore<CommentsSnapshot>,
    scope: ScreenScope,
    source: Arc<dyn CommentSource>,
    session: Arc<dyn SessionOracle>,
    mutator: OptimisticMutator<CommentId, Reaction>,
}

impl CommentsModel {
    pub fn new(
        media_id: MediaId,
        source: Arc<dyn CommentSource>,
        session: Arc<dyn SessionOracle>,
        backend: Arc<dyn MutationBackend<CommentId, Reaction>>,
    ) -> Self {
        let store = StateStore::new(CommentsSnapshot::default());
        let scope = ScreenScope::new();

        // Keep-and-flag: a failed mutation keeps the optimistic value and
        // surfaces through the error slice; the next load reconciles.
        let error_store = store.clone();
        let mutator = OptimisticMutator::new(
            backend,
            scope.handle(),
            Arc::new(move |_intent: MutationIntent<CommentId, Reaction>, err| {
                error_store.update(move |snapshot| snapshot.error = Some(err));
            }),
        );

        Self {
            media_id,
            store,
            scope,
            source,
            session,
            mutator,
        }
    }

    pub fn media_id(&self) -> MediaId {
        self.media_id
    }

    pub fn snapshot(&self) -> CommentsSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> Subscription<CommentsSnapshot> {
        self.store.subscribe()
    }

    /// Access the mutator, mainly for tests inspecting in-flight work.
    pub fn mutator(&self) -> &OptimisticMutator<CommentId, Reaction> {
        &self.mutator
    }

    /// Load comments and reactions, joined before a single publication.
    ///
    /// Fire-and-forget; progress and results arrive through the snapshot
    /// stream.
    pub fn load(&self) {
        let store = self.store.clone();
        let source = Arc::clone(&self.source);
        let viewer = self.session.current_user();
        let media_id = self.media_id;

        self.scope.handle().spawn(async move {
            store.update(|snapshot| {
                if snapshot.comments.is_empty() {
                    snapshot.status = LoadStatus::Loading;
                }
                snapshot.viewer = viewer.clone();
            });

            // Both fetches run concurrently and land in one snapshot so
            // observers never see comments without their reactions.
            let (comments, reactions) =
                tokio::join!(source.comments(media_id), source.reactions(media_id));

            match (comments, reactions) {
                (Ok(comments), Ok(reactions)) => {
                    let reactions: HashMap<CommentId, CommentReactionSlice> = reactions
                        .into_iter()
                        .map(|r| {
                            (
                                r.comment_id,
                                CommentReactionSlice {
                                    mine: r.mine,
                                    summary: r.summary,
                                },
                            )
                        })
                        .collect();
                    store.update(move |snapshot| {
                        snapshot.comments = comments;
                        snapshot.reactions = reactions;
                        snapshot.status = LoadStatus::Done;
                        snapshot.error = None;
                    });
                }
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(media_id = %media_id, error = %err, "comments load failed");
                    store.update(move |snapshot| {
                        snapshot.status = LoadStatus::Done;
                        snapshot.error = Some(err);
                    });
                }
            }
        });
    }

    /// Toggle the viewer's reaction on one comment.
    ///
    /// The decision table runs against the last published value — the
    /// optimistic one if a mutation is still in flight — so two rapid taps
    /// of the same reaction net out to set-then-clear. Slices update
    /// immediately; the backend call is debounced and superseded per
    /// target by the mutator.
    pub fn toggle_reaction(&self, comment_id: CommentId, tapped: Reaction) {
        if !self.session.is_authenticated() {
            self.store.update(|snapshot| {
                snapshot.notice = Some(Notice::new("Sign in to react"));
            });
            return;
        }

        let mut observed: Option<Reaction> = None;
        let mut next: Option<Reaction> = None;
        self.store.update(|snapshot| {
            let slice = snapshot.reactions.entry(comment_id).or_default();
            observed = slice.mine;
            next = next_reaction(observed, tapped);
            slice.summary.shift(observed, next);
            slice.mine = next;
        });

        self.mutator
            .queue(MutationIntent::new(comment_id, observed, next));
    }

    /// Consume the transient notice.
    pub fn clear_notice(&self) {
        self.store.update(|snapshot| snapshot.notice = None);
    }

    /// Dismiss the surfaced error.
    pub fn clear_error(&self) {
        self.store.update(|snapshot| snapshot.error = None);
    }

    /// Tear down the screen: cancels every outstanding fetch, debounce and
    /// scheduled backend call.
    pub fn shutdown(&self) {
        self.scope.shutdown();
    }
}
