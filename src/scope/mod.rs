//! Per-screen lifecycle scope for background work.
//!
//! Every screen model owns one [`ScreenScope`]. All background work —
//! fetches, debounce sleeps, invalidation listeners — is spawned through a
//! [`ScopeHandle`] so that a single `shutdown()` cancels everything the
//! screen still has outstanding, including timers that have not fired yet.
//! Cancellation is silent: aborted tasks never touch a state slice and
//! never produce an error.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::{AbortHandle, JoinHandle};

/// Owns the lifetime of one screen's background work.
///
/// Dropping the scope shuts it down; `shutdown()` does the same thing
/// deterministically at a chosen point.
pub struct ScreenScope {
    shared: Arc<ScopeShared>,
}

struct ScopeShared {
    cancelled: AtomicBool,
    notify: Notify,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ScopeShared {
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a handle for spawning work inside this scope.
    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Cancel every outstanding task spawned through this scope.
    ///
    /// Idempotent. Tasks are aborted at their next suspension point, so a
    /// debounce sleep that has not elapsed never reaches its backend call.
    pub fn shutdown(&self) {
        if !self.shared.cancelled.swap(true, Ordering::SeqCst) {
            tracing::debug!("screen scope shutting down");
            self.shared.notify.notify_waiters();
        }
        let mut tasks = self.shared.tasks.lock();
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for ScreenScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Lightweight handle for spawning work inside a [`ScreenScope`].
#[derive(Clone)]
pub struct ScopeHandle {
    shared: Arc<ScopeShared>,
}

impl ScopeHandle {
    /// Spawn a task tracked by the scope.
    ///
    /// If the scope has already shut down, the task is aborted before it
    /// can run.
    pub fn spawn<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(fut);
        if self.shared.cancelled.load(Ordering::SeqCst) {
            handle.abort();
            return handle;
        }
        let mut tasks = self.shared.tasks.lock();
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle.abort_handle());
        handle
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until the scope shuts down.
    pub async fn cancelled(&self) {
        // Subscribe to Notify BEFORE checking the flag: without this,
        // shutdown() could fire between the check and the await and the
        // notification would have no subscriber to wake.
        let notified = self.shared.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_pending_sleep() {
        let fired = Arc::new(AtomicU32::new(0));
        let scope = ScreenScope::new();
        let handle = scope.handle();

        let fired_in_task = Arc::clone(&fired);
        handle.spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            fired_in_task.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::advance(Duration::from_millis(100)).await;
        scope.shutdown();
        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn spawn_after_shutdown_never_runs() {
        let fired = Arc::new(AtomicU32::new(0));
        let scope = ScreenScope::new();
        scope.shutdown();

        let fired_in_task = Arc::clone(&fired);
        let join = scope.handle().spawn(async move {
            fired_in_task.fetch_add(1, Ordering::SeqCst);
        });
        let _ = join.await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancelled_wakes_on_shutdown() {
        let scope = ScreenScope::new();
        let handle = scope.handle();
        let waiter = tokio::spawn({
            let handle = handle.clone();
            async move { handle.cancelled().await }
        });
        scope.shutdown();
        waiter.await.expect("waiter completes");
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_after_shutdown() {
        let scope = ScreenScope::new();
        scope.shutdown();
        scope.handle().cancelled().await;
    }
}
