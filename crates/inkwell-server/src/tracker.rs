//! View-tracking service
//!
//! Sits between the HTTP handlers and the store. Every store call runs on the
//! blocking pool so handlers never stall the runtime while SQLite works.

use crate::config::ServerConfig;
use crate::error::TrackerError;
use inkwell_domain::traits::{ContentCatalog, ViewCounter, ViewLedger};
use inkwell_domain::{
    Clock, ContentItem, Fingerprint, PostViews, Slug, SlugActivity, ViewEvent, ViewWindows,
};
use inkwell_janitor::{Janitor, JanitorConfig, SweepReport};
use inkwell_store::{SharedStore, StoreError};
use std::sync::Arc;

/// Period covered by per-slug activity in the statistics report
pub const ACTIVITY_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Items listed in the top posts ranking
pub const TOP_POSTS_LIMIT: usize = 5;

/// Slugs listed in the activity breakdown
pub const ACTIVITY_LIMIT: usize = 10;

/// Result of asking to count a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOutcome {
    /// The view was logged and the counter incremented
    Counted {
        /// Counter after the increment
        views: u64,
    },
    /// The visitor was already counted inside the dedup window
    AlreadyViewed {
        /// Counter, unchanged
        views: u64,
    },
}

/// Log `event` and bump its item's counter, unless already counted since `window_start`
///
/// The ledger record is written before the counter moves. If the increment
/// then fails or finds the item gone, the record stays and the mismatch is
/// reported on the `inkwell::reconcile` target.
pub fn count_once<S>(store: &mut S, event: ViewEvent, window_start: u64) -> Result<CountOutcome, TrackerError>
where
    S: ViewLedger<Error = StoreError> + ViewCounter<Error = StoreError>,
{
    let slug = event.slug.clone();
    let short = event.fingerprint.short().to_string();

    let Some(current) = store.get_count(&slug)? else {
        return Err(TrackerError::NotFound(slug));
    };

    if !store.log_view_if_absent(event, window_start)? {
        tracing::debug!(%slug, visitor = %short, "Already counted inside window");
        return Ok(CountOutcome::AlreadyViewed { views: current });
    }

    match store.increment(&slug) {
        Ok(Some(views)) => {
            tracing::info!(%slug, views, "Counted engaged view");
            Ok(CountOutcome::Counted { views })
        }
        Ok(None) => {
            tracing::error!(
                target: "inkwell::reconcile",
                %slug,
                visitor = %short,
                "View logged but item vanished before increment"
            );
            Err(TrackerError::NotFound(slug))
        }
        Err(e) => {
            tracing::error!(
                target: "inkwell::reconcile",
                %slug,
                visitor = %short,
                error = %e,
                "View logged but counter increment failed"
            );
            Err(e.into())
        }
    }
}

/// Snapshot for the admin statistics endpoint
#[derive(Debug, Clone)]
pub struct ViewStats {
    /// Ledger records currently stored
    pub total_view_logs: u64,
    /// Ledger records inside the dedup window
    pub recent_view_logs: u64,
    /// Sum of published counters
    pub total_post_views: u64,
    /// Highest counters
    pub top_posts: Vec<PostViews>,
    /// Ledger activity over the last week
    pub views_by_post: Vec<SlugActivity>,
}

/// What the ledger holds for one visitor
#[derive(Debug, Clone)]
pub struct VisitorReport {
    /// Eligibility for the requested slug, if any
    pub can_view: Option<bool>,
    /// Events inside the dedup window, newest first
    pub recent: Vec<ViewEvent>,
}

/// Engagement-gated view counting over a shared store
pub struct ViewTracker {
    store: SharedStore,
    clock: Arc<dyn Clock>,
    windows: ViewWindows,
    salt: String,
    dwell_secs: u64,
    janitor: JanitorConfig,
}

impl ViewTracker {
    /// Build a tracker from server configuration
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>, config: &ServerConfig) -> Self {
        Self {
            store,
            clock,
            windows: config.janitor.windows(),
            salt: config.salt.clone(),
            dwell_secs: config.dwell_seconds,
            janitor: config.janitor.clone(),
        }
    }

    /// Salt applied to visitor addresses
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Engagement threshold clients should wait before counting
    pub fn dwell_secs(&self) -> u64 {
        self.dwell_secs
    }

    /// Dedup and retention windows in force
    pub fn windows(&self) -> ViewWindows {
        self.windows
    }

    /// Current time according to the tracker's clock
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    async fn run<T, F>(&self, f: F) -> Result<T, TrackerError>
    where
        F: FnOnce(SharedStore) -> Result<T, TrackerError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store)).await?
    }

    /// Whether `fingerprint` may be counted for `slug` right now
    ///
    /// A pure read; does not check that the item exists.
    pub async fn can_view(&self, slug: Slug, fingerprint: Fingerprint) -> Result<bool, TrackerError> {
        let window_start = self.windows.dedup_start(self.clock.now());
        let short = fingerprint.short().to_string();

        let eligible = self
            .run(move |store| Ok(store.can_view(&slug, &fingerprint, window_start)?))
            .await?;

        tracing::debug!(visitor = %short, eligible, "Eligibility check");
        Ok(eligible)
    }

    /// Log and count a view if the visitor has not been counted in the window
    ///
    /// See [`count_once`] for the ordering of the two writes.
    pub async fn count_view(
        &self,
        slug: Slug,
        fingerprint: Fingerprint,
        user_agent: String,
    ) -> Result<CountOutcome, TrackerError> {
        let now = self.clock.now();
        let window_start = self.windows.dedup_start(now);
        let event = ViewEvent::new(slug, fingerprint, user_agent, now)
            .with_engagement_secs(self.dwell_secs);

        self.run(move |mut store| count_once(&mut store, event, window_start))
            .await
    }

    /// Current counter of a published item
    pub async fn get_count(&self, slug: Slug) -> Result<u64, TrackerError> {
        self.run(move |store| store.get_count(&slug)?.ok_or(TrackerError::NotFound(slug)))
            .await
    }

    /// Ledger and counter statistics
    pub async fn stats(&self) -> Result<ViewStats, TrackerError> {
        let now = self.clock.now();
        let recent_since = self.windows.dedup_start(now);
        let activity_since = now.saturating_sub(ACTIVITY_WINDOW_SECS);

        self.run(move |store| {
            Ok(ViewStats {
                total_view_logs: store.count_events(None)?,
                recent_view_logs: store.count_events(Some(recent_since))?,
                total_post_views: store.total_views()?,
                top_posts: store.top_items(TOP_POSTS_LIMIT)?,
                views_by_post: store.activity_since(activity_since, ACTIVITY_LIMIT)?,
            })
        })
        .await
    }

    /// Recent ledger entries for one visitor, plus eligibility for `slug`
    pub async fn visitor(&self, fingerprint: Fingerprint, slug: Option<Slug>) -> Result<VisitorReport, TrackerError> {
        let window_start = self.windows.dedup_start(self.clock.now());

        self.run(move |store| {
            let can_view = match slug {
                Some(slug) => Some(store.can_view(&slug, &fingerprint, window_start)?),
                None => None,
            };
            let recent = store.recent_for_fingerprint(&fingerprint, window_start)?;
            Ok(VisitorReport { can_view, recent })
        })
        .await
    }

    /// Round-trip to the store
    pub async fn ping(&self) -> Result<(), TrackerError> {
        self.run(|store| {
            store.total_views()?;
            Ok(())
        })
        .await
    }

    /// Insert or update a content item
    pub async fn register(&self, item: ContentItem) -> Result<ContentItem, TrackerError> {
        self.run(move |mut store| Ok(store.upsert_item(item)?)).await
    }

    /// Run one retention sweep now
    pub async fn sweep(&self) -> Result<SweepReport, TrackerError> {
        let mut janitor = Janitor::with_clock(self.janitor.clone(), Arc::clone(&self.clock));
        self.run(move |mut store| Ok(janitor.sweep(&mut store)?)).await
    }
}
