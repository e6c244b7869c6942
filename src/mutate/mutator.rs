//! Debounced, supersession-aware mutation dispatch.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

use crate::error::SyncError;
use crate::scope::ScopeHandle;
use crate::sources::MutationBackend;

use super::intent::MutationIntent;

/// Fixed debounce before a mutation reaches the network, so rapid repeated
/// toggles collapse into one call reflecting only the final state.
pub const MUTATION_DEBOUNCE: Duration = Duration::from_secs(1);

/// Callback invoked when a mutation fails after the debounce.
///
/// Receives the intent so the caller can apply its reconciliation policy
/// against the value the user actually observed.
pub type MutationErrorCallback<K, V> = Arc<dyn Fn(MutationIntent<K, V>, SyncError) + Send + Sync>;

struct InflightMutation {
    generation: u64,
    abort: AbortHandle,
}

/// Persists optimistic mutations in the background.
///
/// At most one mutation is outstanding per target: queueing a newer intent
/// aborts the older one before it reaches the network. All tasks live in
/// the owning screen's scope, so teardown mid-debounce cancels the backend
/// call entirely — silently.
///
/// Failure policy: the optimistic value is kept and the failure is flagged
/// through the error callback; the next full refresh reconciles.
pub struct OptimisticMutator<K, V> {
    backend: Arc<dyn MutationBackend<K, V>>,
    scope: ScopeHandle,
    debounce: Duration,
    inflight: Arc<Mutex<HashMap<K, InflightMutation>>>,
    generations: AtomicU64,
    on_error: MutationErrorCallback<K, V>,
}

impl<K, V> OptimisticMutator<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(
        backend: Arc<dyn MutationBackend<K, V>>,
        scope: ScopeHandle,
        on_error: MutationErrorCallback<K, V>,
    ) -> Self {
        Self {
            backend,
            scope,
            debounce: MUTATION_DEBOUNCE,
            inflight: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
            on_error,
        }
    }

    /// Override the debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Number of targets with an uncommitted mutation.
    pub fn inflight_targets(&self) -> usize {
        self.inflight.lock().len()
    }

    /// Queue the backend call for an already-applied optimistic mutation.
    ///
    /// The caller has updated its slices before this; `queue` only owns
    /// the debounce, the supersession bookkeeping and the backend call.
    pub fn queue(&self, intent: MutationIntent<K, V>) {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let target = intent.target.clone();

        let backend = Arc::clone(&self.backend);
        let inflight = Arc::clone(&self.inflight);
        let on_error = Arc::clone(&self.on_error);
        let debounce = self.debounce;

        // Hold the in-flight lock across abort-spawn-insert so the new
        // task cannot observe the map before its own entry exists.
        let mut map = self.inflight.lock();
        if let Some(previous) = map.remove(&target) {
            tracing::debug!(target_id = ?target, "superseding in-flight mutation");
            previous.abort.abort();
        }

        let handle = self.scope.spawn(async move {
            tokio::time::sleep(debounce).await;

            let result = match intent.next.clone() {
                Some(value) => backend.upsert(intent.target.clone(), value).await,
                None => backend.remove(intent.target.clone()).await,
            };

            // A superseded call's outcome must never land after its
            // successor has started: only the still-current generation may
            // clear the entry and report.
            let still_current = {
                let mut map = inflight.lock();
                match map.get(&intent.target) {
                    Some(entry) if entry.generation == generation => {
                        map.remove(&intent.target);
                        true
                    }
                    _ => false,
                }
            };
            if !still_current {
                return;
            }

            if let Err(err) = result {
                tracing::warn!(
                    target_id = ?intent.target,
                    error = %err,
                    "mutation failed; keeping optimistic value"
                );
                on_error(intent, err);
            }
        });

        map.insert(
            target,
            InflightMutation {
                generation,
                abort: handle.abort_handle(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommentId, Reaction};
    use crate::scope::ScreenScope;
    use async_trait::async_trait;

    /// Records backend calls in arrival order.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<(CommentId, Option<Reaction>)>>,
    }

    #[async_trait]
    impl MutationBackend<CommentId, Reaction> for RecordingBackend {
        async fn upsert(&self, target: CommentId, value: Reaction) -> Result<(), SyncError> {
            self.calls.lock().push((target, Some(value)));
            Ok(())
        }

        async fn remove(&self, target: CommentId) -> Result<(), SyncError> {
            self.calls.lock().push((target, None));
            Ok(())
        }
    }

    fn noop_errors() -> MutationErrorCallback<CommentId, Reaction> {
        Arc::new(|_, _| {})
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_collapses_rapid_toggles() {
        let backend = Arc::new(RecordingBackend::default());
        let scope = ScreenScope::new();
        let mutator = OptimisticMutator::new(backend.clone(), scope.handle(), noop_errors());

        let target = CommentId(1);
        mutator.queue(MutationIntent::new(target, None, Some(Reaction::Like)));
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(200)).await;
        mutator.queue(MutationIntent::new(target, Some(Reaction::Like), None));
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;

        // Only the final state reached the backend.
        let calls = backend.calls.lock().clone();
        assert_eq!(calls, vec![(target, None)]);
        assert_eq!(mutator.inflight_targets(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn independent_targets_do_not_supersede() {
        let backend = Arc::new(RecordingBackend::default());
        let scope = ScreenScope::new();
        let mutator = OptimisticMutator::new(backend.clone(), scope.handle(), noop_errors());

        mutator.queue(MutationIntent::new(CommentId(1), None, Some(Reaction::Like)));
        mutator.queue(MutationIntent::new(CommentId(2), None, Some(Reaction::Love)));
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;

        let mut calls = backend.calls.lock().clone();
        calls.sort_by_key(|(id, _)| *id);
        assert_eq!(
            calls,
            vec![
                (CommentId(1), Some(Reaction::Like)),
                (CommentId(2), Some(Reaction::Love)),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_scheduled_call() {
        let backend = Arc::new(RecordingBackend::default());
        let scope = ScreenScope::new();
        let mutator = OptimisticMutator::new(backend.clone(), scope.handle(), noop_errors());

        mutator.queue(MutationIntent::new(CommentId(9), None, Some(Reaction::Sad)));
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(300)).await;
        scope.shutdown();
        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;

        assert!(backend.calls.lock().is_empty());
    }
}
