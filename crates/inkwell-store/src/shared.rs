//! Shareable store handle for concurrent callers

use crate::{SqliteStore, StoreError};
use inkwell_domain::traits::{ContentCatalog, ViewCounter, ViewLedger};
use inkwell_domain::{ContentItem, Fingerprint, PostViews, Slug, SlugActivity, ViewEvent};
use std::sync::{Arc, Mutex};

/// Cloneable handle to one [`SqliteStore`] behind a mutex
///
/// Request handlers and the janitor each hold a clone. Calls block while the
/// connection is in use, so async callers should run them on the blocking pool.
/// A poisoned lock is reported as [`StoreError::Unavailable`].
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<SqliteStore>>,
}

impl SharedStore {
    /// Wrap a store for shared use
    pub fn new(store: SqliteStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Open a store at `path` and wrap it
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self::new(SqliteStore::new(path)?))
    }

    /// Run `f` with exclusive access to the underlying store
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut SqliteStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        f(&mut guard)
    }
}

impl ViewLedger for SharedStore {
    type Error = StoreError;

    fn can_view(&self, slug: &Slug, fingerprint: &Fingerprint, window_start: u64) -> Result<bool, Self::Error> {
        self.with(|store| store.can_view(slug, fingerprint, window_start))
    }

    fn log_view(&mut self, event: ViewEvent) -> Result<(), Self::Error> {
        self.with(|store| store.log_view(event))
    }

    fn log_view_if_absent(&mut self, event: ViewEvent, window_start: u64) -> Result<bool, Self::Error> {
        self.with(|store| store.log_view_if_absent(event, window_start))
    }

    fn prune_before(&mut self, cutoff: u64) -> Result<usize, Self::Error> {
        self.with(|store| store.prune_before(cutoff))
    }

    fn count_before(&self, cutoff: u64) -> Result<usize, Self::Error> {
        self.with(|store| store.count_before(cutoff))
    }

    fn count_events(&self, since: Option<u64>) -> Result<u64, Self::Error> {
        self.with(|store| store.count_events(since))
    }

    fn activity_since(&self, since: u64, limit: usize) -> Result<Vec<SlugActivity>, Self::Error> {
        self.with(|store| store.activity_since(since, limit))
    }

    fn recent_for_fingerprint(&self, fingerprint: &Fingerprint, since: u64) -> Result<Vec<ViewEvent>, Self::Error> {
        self.with(|store| store.recent_for_fingerprint(fingerprint, since))
    }
}

impl ViewCounter for SharedStore {
    type Error = StoreError;

    fn increment(&mut self, slug: &Slug) -> Result<Option<u64>, Self::Error> {
        self.with(|store| store.increment(slug))
    }

    fn get_count(&self, slug: &Slug) -> Result<Option<u64>, Self::Error> {
        self.with(|store| store.get_count(slug))
    }
}

impl ContentCatalog for SharedStore {
    type Error = StoreError;

    fn upsert_item(&mut self, item: ContentItem) -> Result<ContentItem, Self::Error> {
        self.with(|store| store.upsert_item(item))
    }

    fn get_item(&self, slug: &Slug) -> Result<Option<ContentItem>, Self::Error> {
        self.with(|store| store.get_item(slug))
    }

    fn top_items(&self, limit: usize) -> Result<Vec<PostViews>, Self::Error> {
        self.with(|store| store.top_items(limit))
    }

    fn total_views(&self) -> Result<u64, Self::Error> {
        self.with(|store| store.total_views())
    }
}
