//! Paginated list loading with a local fast path and background refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::SyncError;
use crate::scope::ScopeHandle;
use crate::sources::{LocalSource, RemoteSource, SessionOracle};
use crate::state::{LoadStatus, ScreenState, StateStore};
use crate::updates::{UpdateHub, UpdateTopic};

use super::cursor::{merge_page, stabilize_order, ListEntry, PageCursor};

/// Debounce applied to invalidation events before reloading, so a burst of
/// notifications collapses into one fetch.
pub const INVALIDATION_DEBOUNCE: Duration = Duration::from_millis(200);

/// The list-bearing portion of a screen snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSlice<T> {
    pub items: Vec<T>,
    pub status: LoadStatus,
    /// Status of an in-flight "load more", kept separate so appending does
    /// not disturb the primary status.
    pub more_status: LoadStatus,
    pub has_more: bool,
    pub error: Option<SyncError>,
}

impl<T> Default for ListSlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            more_status: LoadStatus::Idle,
            has_more: true,
            error: None,
        }
    }
}

/// Loads a paginated list into one slice of a screen snapshot.
///
/// The slice is addressed through a plain `fn` lens so the loader stays
/// reusable across screens whose snapshots embed a [`ListSlice`].
pub struct ListLoader<S: ScreenState, T: ListEntry> {
    store: StateStore<S>,
    lens: fn(&mut S) -> &mut ListSlice<T>,
    local: Arc<dyn LocalSource<T>>,
    remote: Arc<dyn RemoteSource<T>>,
    session: Arc<dyn SessionOracle>,
    scope: ScopeHandle,
    page_size: usize,
    cursor: Mutex<PageCursor<T::Key>>,
    /// Re-entrancy guard: a second load/load-more while one is in flight
    /// is a no-op, not a queue.
    busy: AtomicBool,
}

impl<S: ScreenState, T: ListEntry> ListLoader<S, T> {
    pub fn new(
        store: StateStore<S>,
        lens: fn(&mut S) -> &mut ListSlice<T>,
        local: Arc<dyn LocalSource<T>>,
        remote: Arc<dyn RemoteSource<T>>,
        session: Arc<dyn SessionOracle>,
        scope: ScopeHandle,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            lens,
            local,
            remote,
            session,
            scope,
            page_size,
            cursor: Mutex::new(PageCursor::new()),
            busy: AtomicBool::new(false),
        }
    }

    fn read_slice(&self) -> ListSlice<T> {
        let mut snapshot = self.store.snapshot();
        (self.lens)(&mut snapshot).clone()
    }

    fn begin(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn finish(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    /// User-initiated full load: local cache first, remote reconcile after.
    ///
    /// Unauthenticated sessions publish an empty list and `Done` without
    /// touching the network. When cache data already satisfies the screen
    /// the primary status never enters `Loading`.
    pub async fn load(&self) {
        if !self.begin() {
            return;
        }
        self.cursor.lock().reset();

        if !self.session.is_authenticated() {
            let lens = self.lens;
            self.store.update(move |snapshot| {
                let slice = lens(snapshot);
                slice.items.clear();
                slice.status = LoadStatus::Done;
                slice.more_status = LoadStatus::Idle;
                slice.has_more = false;
                slice.error = None;
            });
            self.finish();
            return;
        }

        let cached = self.local.local_list().await;
        let cache_visible = !cached.is_empty();
        let lens = self.lens;
        self.store.update(move |snapshot| {
            let slice = lens(snapshot);
            if cache_visible {
                slice.items = cached;
                slice.status = LoadStatus::Done;
            } else {
                slice.status = LoadStatus::Loading;
            }
        });

        match self.remote.page(1, self.page_size).await {
            Ok(fetched) => {
                let has_more = fetched.len() >= self.page_size;
                let order: Vec<T::Key> = fetched.iter().map(|item| item.key()).collect();
                self.cursor.lock().commit(1, has_more, order);
                self.store.update(move |snapshot| {
                    let slice = lens(snapshot);
                    slice.items = fetched;
                    slice.status = LoadStatus::Done;
                    slice.has_more = has_more;
                    slice.error = None;
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "list load failed");
                self.store.update(move |snapshot| {
                    let slice = lens(snapshot);
                    slice.status = LoadStatus::Done;
                    slice.error = Some(err);
                });
            }
        }
        self.finish();
    }

    /// Append the next page.
    ///
    /// No-op when the list is empty, when no more data is believed to
    /// exist, or while another load is in flight.
    pub async fn load_more(&self) {
        if !self.begin() {
            return;
        }
        let current = self.read_slice();
        if current.items.is_empty() || !current.has_more {
            self.finish();
            return;
        }

        let lens = self.lens;
        self.store.update(move |snapshot| {
            lens(snapshot).more_status = LoadStatus::Loading;
        });

        let next_page = self.cursor.lock().pages() + 1;
        match self.remote.page(next_page, self.page_size).await {
            Ok(fetched) => {
                let has_more = fetched.len() >= self.page_size;
                let mut order: Vec<T::Key> = Vec::new();
                self.store.update(|snapshot| {
                    let slice = lens(snapshot);
                    let merged = merge_page(std::mem::take(&mut slice.items), fetched);
                    order = merged.iter().map(|item| item.key()).collect();
                    slice.items = merged;
                    slice.more_status = LoadStatus::Done;
                    slice.has_more = has_more;
                    slice.error = None;
                });
                self.cursor.lock().commit(next_page, has_more, order);
            }
            Err(err) => {
                tracing::warn!(page = next_page, error = %err, "load more failed");
                self.store.update(move |snapshot| {
                    let slice = lens(snapshot);
                    slice.more_status = LoadStatus::Done;
                    slice.error = Some(err);
                });
            }
        }
        self.finish();
    }

    /// Background reconciliation after an invalidation event.
    ///
    /// Re-fetches the window currently on screen, re-sorts it into the
    /// previously observed order, and never surfaces failures — they are
    /// logged and the current data stays up.
    pub async fn refresh(&self) {
        if !self.begin() {
            return;
        }
        if !self.session.is_authenticated() {
            self.finish();
            return;
        }

        let (pages, observed) = {
            let cursor = self.cursor.lock();
            (cursor.pages().max(1), cursor.observed_order().to_vec())
        };
        // One request covering every page currently shown.
        let window = self.page_size * pages as usize;

        match self.remote.page(1, window).await {
            Ok(fetched) => {
                let has_more = fetched.len() >= window;
                let stable = stabilize_order(fetched, &observed);
                let order: Vec<T::Key> = stable.iter().map(|item| item.key()).collect();
                self.cursor.lock().commit(pages, has_more, order);
                let lens = self.lens;
                self.store.update(move |snapshot| {
                    let slice = lens(snapshot);
                    slice.items = stable;
                    slice.status = LoadStatus::Done;
                    slice.has_more = has_more;
                    slice.error = None;
                });
            }
            Err(err) => {
                tracing::debug!(error = %err, "background refresh failed, keeping current data");
            }
        }
        self.finish();
    }

    /// Reload (debounced) whenever the hub reports a matching change.
    ///
    /// Runs until the scope shuts down or the hub closes.
    pub fn watch_updates(self: Arc<Self>, hub: &UpdateHub, topics: Vec<UpdateTopic>) {
        let loader = self;
        let mut stream = hub.subscribe();
        let scope = loader.scope.clone();
        scope.spawn(async move {
            loop {
                if !stream.changed(&topics).await {
                    break;
                }
                // Collapse a burst of notifications into one reload.
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(INVALIDATION_DEBOUNCE) => break,
                        more = stream.changed(&topics) => {
                            if !more {
                                break;
                            }
                        }
                    }
                }
                loader.refresh().await;
            }
        });
    }
}
