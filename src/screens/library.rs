//! Library screen: the viewer's in-progress shows.

use std::sync::Arc;

use crate::list::{ListLoader, ListSlice};
use crate::model::{LibraryEntry, Viewer};
use crate::scope::ScreenScope;
use crate::sources::{LocalSource, RemoteSource, SessionOracle};
use crate::state::{Notice, ScreenState, StateStore, Subscription, IDLE_GRACE};
use crate::updates::{UpdateHub, UpdateTopic};

/// Immutable snapshot of the library screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LibrarySnapshot {
    pub list: ListSlice<LibraryEntry>,
    pub viewer: Option<Viewer>,
    pub notice: Option<Notice>,
}

impl ScreenState for LibrarySnapshot {}

fn list_lens(snapshot: &mut LibrarySnapshot) -> &mut ListSlice<LibraryEntry> {
    &mut snapshot.list
}

/// View-model for the in-progress library list.
///
/// Composes a [`ListLoader`] with the update hub so progress changes made
/// on other screens (marking an episode watched) show up here without the
/// entries visually jumping around.
pub struct LibraryModel {
    store: StateStore<LibrarySnapshot>,
    scope: ScreenScope,
    session: Arc<dyn SessionOracle>,
    loader: Arc<ListLoader<LibrarySnapshot, LibraryEntry>>,
}

impl LibraryModel {
    pub fn new(
        local: Arc<dyn LocalSource<LibraryEntry>>,
        remote: Arc<dyn RemoteSource<LibraryEntry>>,
        session: Arc<dyn SessionOracle>,
        hub: &UpdateHub,
        page_size: usize,
    ) -> Self {
        let store = StateStore::new(LibrarySnapshot {
            viewer: session.current_user(),
            ..LibrarySnapshot::default()
        });
        let scope = ScreenScope::new();

        let loader = Arc::new(ListLoader::new(
            store.clone(),
            list_lens,
            local,
            remote,
            Arc::clone(&session),
            scope.handle(),
            page_size,
        ));
        Arc::clone(&loader).watch_updates(
            hub,
            vec![UpdateTopic::Progress, UpdateTopic::Collection],
        );

        // Once nobody observes the screen for a while, note it; the host
        // can drop the model entirely on the strength of this signal.
        store.spawn_idle_hook(&scope.handle(), IDLE_GRACE, || {
            tracing::debug!("library screen unobserved past grace period");
        });

        Self {
            store,
            scope,
            session,
            loader,
        }
    }

    pub fn snapshot(&self) -> LibrarySnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> Subscription<LibrarySnapshot> {
        self.store.subscribe()
    }

    /// Full load: cache fast path, then remote reconcile.
    pub fn load(&self) {
        if !self.session.is_authenticated() {
            self.store.update(|snapshot| {
                snapshot.notice = Some(Notice::new("Sign in to see your shows"));
            });
        }
        let loader = Arc::clone(&self.loader);
        self.scope.handle().spawn(async move {
            loader.load().await;
        });
    }

    /// Append the next page, if one may exist.
    pub fn load_more(&self) {
        let loader = Arc::clone(&self.loader);
        self.scope.handle().spawn(async move {
            loader.load_more().await;
        });
    }

    /// Consume the transient notice.
    pub fn clear_notice(&self) {
        self.store.update(|snapshot| snapshot.notice = None);
    }

    /// Dismiss the surfaced error.
    pub fn clear_error(&self) {
        self.store.update(|snapshot| snapshot.list.error = None);
    }

    /// Tear down the screen and everything it still has in flight.
    pub fn shutdown(&self) {
        self.scope.shutdown();
    }
}
