//! Atomic snapshot publication with replay-of-latest semantics.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{watch, Notify};

use crate::error::StoreClosed;
use crate::scope::ScopeHandle;

use super::snapshot::ScreenState;

/// Default grace period before the idle hook runs once the last
/// subscription drops. Long enough to survive a screen rotation's
/// detach/reattach, short enough to release upstream work promptly.
pub const IDLE_GRACE: Duration = Duration::from_millis(500);

/// Publishes immutable snapshots of one screen's state.
///
/// Updates are pure closures applied to the current snapshot under the
/// store lock and published atomically: an observer either sees the whole
/// effect of an update or none of it, never a torn mix. New subscribers
/// replay the latest snapshot.
///
/// Cloning the store clones a handle to the same shared state.
pub struct StateStore<S: ScreenState> {
    shared: Arc<StoreShared<S>>,
}

impl<S: ScreenState> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct StoreShared<S> {
    /// Serializes update-and-publish so no two publications interleave.
    publish: Mutex<()>,
    tx: watch::Sender<S>,
    observers: AtomicUsize,
    /// Bumped on every subscribe; lets a pending idle grace period detect
    /// that the store was re-observed in the meantime.
    epoch: AtomicU64,
    /// Signalled on every subscribe and on every drop-to-zero.
    activity: Notify,
}

impl<S: ScreenState> StateStore<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            shared: Arc::new(StoreShared {
                publish: Mutex::new(()),
                tx,
                observers: AtomicUsize::new(0),
                epoch: AtomicU64::new(0),
                activity: Notify::new(),
            }),
        }
    }

    /// Current snapshot. Never partially updated.
    pub fn snapshot(&self) -> S {
        self.shared.tx.borrow().clone()
    }

    /// Apply a pure update to the current snapshot and publish the result.
    ///
    /// The closure must not fail; callers catch their own errors before
    /// reaching the store. Changes made by one closure land together in a
    /// single published snapshot.
    pub fn update(&self, apply: impl FnOnce(&mut S)) {
        let _guard = self.shared.publish.lock();
        let mut next = self.shared.tx.borrow().clone();
        apply(&mut next);
        self.shared.tx.send_replace(next);
    }

    /// Subscribe to snapshot changes, replaying the latest value.
    pub fn subscribe(&self) -> Subscription<S> {
        self.shared.observers.fetch_add(1, Ordering::SeqCst);
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.activity.notify_waiters();
        Subscription {
            rx: self.shared.tx.subscribe(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.shared.observers.load(Ordering::SeqCst)
    }

    /// Run `hook` whenever the store has had zero subscribers for `grace`.
    ///
    /// Resubscribing inside the grace window suppresses the pending hook
    /// and the last snapshot stays available for replay. The monitor task
    /// lives in `scope` and dies with it.
    pub fn spawn_idle_hook(
        &self,
        scope: &ScopeHandle,
        grace: Duration,
        hook: impl Fn() + Send + 'static,
    ) {
        let shared = Arc::clone(&self.shared);
        scope.spawn(async move {
            // Epoch 0 means "never subscribed"; the hook only fires after
            // the last observer of some epoch has gone away.
            let mut fired_for_epoch: Option<u64> = Some(0);
            loop {
                // Arm the notification before inspecting the count so a
                // subscribe/drop between the check and the await cannot be
                // lost.
                let activity = shared.activity.notified();
                tokio::pin!(activity);
                activity.as_mut().enable();

                let epoch = shared.epoch.load(Ordering::SeqCst);
                let idle = shared.observers.load(Ordering::SeqCst) == 0;
                if !idle || fired_for_epoch == Some(epoch) {
                    activity.await;
                    continue;
                }

                tokio::select! {
                    _ = tokio::time::sleep(grace) => {
                        if shared.observers.load(Ordering::SeqCst) == 0
                            && shared.epoch.load(Ordering::SeqCst) == epoch
                        {
                            tracing::debug!(grace_ms = grace.as_millis() as u64,
                                "store idle, running release hook");
                            hook();
                            fired_for_epoch = Some(epoch);
                        }
                    }
                    // A subscription arrived mid-grace; go back to waiting.
                    _ = &mut activity => {}
                }
            }
        });
    }
}

/// A live subscription to a [`StateStore`].
///
/// Holding one keeps the store "observed"; dropping the last one starts
/// the idle grace period.
pub struct Subscription<S: ScreenState> {
    rx: watch::Receiver<S>,
    shared: Arc<StoreShared<S>>,
}

impl<S: ScreenState> Subscription<S> {
    /// Latest published snapshot.
    pub fn current(&self) -> S {
        self.rx.borrow().clone()
    }

    /// Wait for the next published snapshot.
    pub async fn changed(&mut self) -> Result<S, StoreClosed> {
        self.rx.changed().await.map_err(|_| StoreClosed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

impl<S: ScreenState> Drop for Subscription<S> {
    fn drop(&mut self) {
        if self.shared.observers.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.shared.activity.notify_waiters();
        }
    }
}
