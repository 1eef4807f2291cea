//! Trait definitions for storage interactions
//!
//! These traits define the boundaries between the view-counting rules and the
//! store. Implementations live in `inkwell-store`. Every mutation must be a
//! single atomic operation at the storage layer; callers never read-modify-write.

use crate::{ContentItem, Fingerprint, PostViews, Slug, SlugActivity, ViewEvent};

/// Append-only log of counted views, used to decide eligibility
///
/// Implemented by the infrastructure layer (inkwell-store)
pub trait ViewLedger {
    /// Error type for ledger operations
    type Error;

    /// True iff no event for (slug, fingerprint) was observed at or after `window_start`
    fn can_view(&self, slug: &Slug, fingerprint: &Fingerprint, window_start: u64) -> Result<bool, Self::Error>;

    /// Append an event without checking eligibility
    fn log_view(&mut self, event: ViewEvent) -> Result<(), Self::Error>;

    /// Append an event only if no event for the same (slug, fingerprint) was
    /// observed at or after `window_start`, as one atomic step
    ///
    /// Returns whether the event was inserted.
    fn log_view_if_absent(&mut self, event: ViewEvent, window_start: u64) -> Result<bool, Self::Error>;

    /// Delete events observed strictly before `cutoff`, returning how many were removed
    fn prune_before(&mut self, cutoff: u64) -> Result<usize, Self::Error>;

    /// Count events observed strictly before `cutoff`
    fn count_before(&self, cutoff: u64) -> Result<usize, Self::Error>;

    /// Count events, optionally only those observed at or after `since`
    fn count_events(&self, since: Option<u64>) -> Result<u64, Self::Error>;

    /// Per-slug activity since `since`, busiest first
    fn activity_since(&self, since: u64, limit: usize) -> Result<Vec<SlugActivity>, Self::Error>;

    /// Events for one fingerprint observed at or after `since`, newest first
    fn recent_for_fingerprint(&self, fingerprint: &Fingerprint, since: u64) -> Result<Vec<ViewEvent>, Self::Error>;
}

/// Authoritative per-item view counters
///
/// Implemented by the infrastructure layer (inkwell-store)
pub trait ViewCounter {
    /// Error type for counter operations
    type Error;

    /// Atomically add one to the counter of the published item `slug`
    ///
    /// Returns the new count, or `None` if no published item matches.
    fn increment(&mut self, slug: &Slug) -> Result<Option<u64>, Self::Error>;

    /// Current count of the published item `slug`, `None` if it does not resolve
    fn get_count(&self, slug: &Slug) -> Result<Option<u64>, Self::Error>;
}

/// Registry of content items known to the core
///
/// Authoring lives elsewhere; this is the minimal surface needed to seed items
/// and report on them.
pub trait ContentCatalog {
    /// Error type for catalog operations
    type Error;

    /// Insert or update an item, returning the stored version
    ///
    /// An existing counter is never lowered.
    fn upsert_item(&mut self, item: ContentItem) -> Result<ContentItem, Self::Error>;

    /// Look up an item regardless of its publication flag
    fn get_item(&self, slug: &Slug) -> Result<Option<ContentItem>, Self::Error>;

    /// Published items with the highest counters
    fn top_items(&self, limit: usize) -> Result<Vec<PostViews>, Self::Error>;

    /// Sum of counters over published items
    fn total_views(&self) -> Result<u64, Self::Error>;
}
