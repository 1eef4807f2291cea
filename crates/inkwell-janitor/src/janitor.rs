//! Core Janitor implementation for ledger retention

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use inkwell_domain::traits::ViewLedger;
use inkwell_domain::{Clock, SystemClock, ViewWindows};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of a single sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Records observed before this time were eligible for deletion
    pub cutoff: u64,
    /// Records deleted, or that would have been deleted in dry-run mode
    pub pruned: usize,
    /// Whether the sweep left the ledger untouched
    pub dry_run: bool,
}

/// Janitor service that prunes expired view ledger records
///
/// Only records older than the retention window are removed. The retention
/// window always covers the dedup window, so a sweep never changes whether a
/// visitor may be counted.
///
/// # Examples
///
/// ```no_run
/// use inkwell_janitor::Janitor;
/// use inkwell_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("inkwell.db")?;
/// let mut janitor = Janitor::default_config();
///
/// let report = janitor.sweep(&mut store)?;
/// println!("pruned {} records", report.pruned);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Janitor {
    config: JanitorConfig,
    windows: ViewWindows,
    clock: Arc<dyn Clock>,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor reading the wall clock
    pub fn new(config: JanitorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a Janitor with an injected time source
    pub fn with_clock(config: JanitorConfig, clock: Arc<dyn Clock>) -> Self {
        let windows = config.windows();
        Self {
            config,
            windows,
            clock,
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Get the active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Perform one sweep of the ledger
    pub fn sweep<S>(&mut self, store: &mut S) -> Result<SweepReport, JanitorError>
    where
        S: ViewLedger,
        S::Error: std::fmt::Display,
    {
        let started = Instant::now();
        let cutoff = self.windows.retention_cutoff(self.clock.now());

        let result = if self.config.dry_run {
            store.count_before(cutoff)
        } else {
            store.prune_before(cutoff)
        };

        self.metrics.total_runtime_ms += started.elapsed().as_millis() as u64;

        let pruned = match result {
            Ok(count) => count,
            Err(e) => {
                self.metrics.record_failure();
                return Err(JanitorError::Store(e.to_string()));
            }
        };

        self.metrics.record_sweep(cutoff, pruned, self.config.dry_run);

        if self.config.dry_run {
            tracing::info!(cutoff, would_prune = pruned, "DRY RUN: ledger sweep");
        } else if pruned > 0 {
            tracing::info!(cutoff, pruned, "Pruned expired view records");
        } else {
            tracing::debug!(cutoff, "No expired view records");
        }

        Ok(SweepReport {
            cutoff,
            pruned,
            dry_run: self.config.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_domain::{ContentItem, Fingerprint, ManualClock, Slug, ViewEvent, DEDUP_WINDOW_SECS};
    use inkwell_domain::traits::ContentCatalog;
    use inkwell_store::SqliteStore;

    const DAY: u64 = 24 * 60 * 60;
    const NOW: u64 = 1_750_000_000;

    fn seeded_store() -> SqliteStore {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let slug = Slug::parse("post").unwrap();
        store.upsert_item(ContentItem::new(slug.clone(), "Post", 0)).unwrap();

        for (addr, age_days) in [("10.0.0.1", 45), ("10.0.0.2", 31), ("10.0.0.3", 29), ("10.0.0.4", 0)] {
            let fp = Fingerprint::derive(addr, "salt");
            store
                .log_view(ViewEvent::new(slug.clone(), fp, "", NOW - age_days * DAY))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_sweep_prunes_records_past_retention() {
        let mut store = seeded_store();
        let clock = ManualClock::new(NOW);
        let mut janitor = Janitor::with_clock(JanitorConfig::default(), Arc::new(clock));

        let report = janitor.sweep(&mut store).unwrap();

        assert_eq!(report.pruned, 2);
        assert_eq!(report.cutoff, NOW - 30 * DAY);
        assert!(!report.dry_run);
        assert_eq!(store.count_events(None).unwrap(), 2);
        assert_eq!(janitor.metrics().pruned, 2);
        assert_eq!(janitor.metrics().sweep_count, 1);
    }

    #[test]
    fn test_dry_run_leaves_ledger_intact() {
        let mut store = seeded_store();
        let config = JanitorConfig {
            dry_run: true,
            ..Default::default()
        };
        let mut janitor = Janitor::with_clock(config, Arc::new(ManualClock::new(NOW)));

        let report = janitor.sweep(&mut store).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.pruned, 2);
        assert_eq!(store.count_events(None).unwrap(), 4);
        assert_eq!(janitor.metrics().pruned, 0);
        assert_eq!(janitor.metrics().would_prune, 2);
    }

    #[test]
    fn test_repeated_sweeps_follow_the_clock() {
        let mut store = seeded_store();
        let clock = ManualClock::new(NOW);
        let mut janitor = Janitor::with_clock(JanitorConfig::default(), Arc::new(clock.clone()));

        assert_eq!(janitor.sweep(&mut store).unwrap().pruned, 2);
        assert_eq!(janitor.sweep(&mut store).unwrap().pruned, 0);

        clock.advance(2 * DAY);
        assert_eq!(janitor.sweep(&mut store).unwrap().pruned, 1);
        assert_eq!(janitor.metrics().pruned, 3);
        assert_eq!(janitor.metrics().sweep_count, 3);
    }

    #[test]
    fn test_sweep_never_reopens_dedup_window() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let slug = Slug::parse("post").unwrap();
        let fp = Fingerprint::derive("10.1.1.1", "salt");
        store.log_view(ViewEvent::new(slug.clone(), fp.clone(), "", NOW - 60)).unwrap();

        // Shortest retention the config accepts
        let config = JanitorConfig {
            retention_days: 1,
            ..Default::default()
        };
        let mut janitor = Janitor::with_clock(config, Arc::new(ManualClock::new(NOW)));
        janitor.sweep(&mut store).unwrap();

        assert!(!store.can_view(&slug, &fp, NOW - DEDUP_WINDOW_SECS).unwrap());
    }

    struct FailingLedger;

    impl ViewLedger for FailingLedger {
        type Error = String;

        fn can_view(&self, _: &Slug, _: &Fingerprint, _: u64) -> Result<bool, Self::Error> {
            Err("offline".to_string())
        }
        fn log_view(&mut self, _: ViewEvent) -> Result<(), Self::Error> {
            Err("offline".to_string())
        }
        fn log_view_if_absent(&mut self, _: ViewEvent, _: u64) -> Result<bool, Self::Error> {
            Err("offline".to_string())
        }
        fn prune_before(&mut self, _: u64) -> Result<usize, Self::Error> {
            Err("offline".to_string())
        }
        fn count_before(&self, _: u64) -> Result<usize, Self::Error> {
            Err("offline".to_string())
        }
        fn count_events(&self, _: Option<u64>) -> Result<u64, Self::Error> {
            Err("offline".to_string())
        }
        fn activity_since(&self, _: u64, _: usize) -> Result<Vec<inkwell_domain::SlugActivity>, Self::Error> {
            Err("offline".to_string())
        }
        fn recent_for_fingerprint(&self, _: &Fingerprint, _: u64) -> Result<Vec<ViewEvent>, Self::Error> {
            Err("offline".to_string())
        }
    }

    #[test]
    fn test_store_failure_is_counted() {
        let mut janitor = Janitor::with_clock(JanitorConfig::default(), Arc::new(ManualClock::new(NOW)));

        let err = janitor.sweep(&mut FailingLedger).unwrap_err();

        assert!(matches!(err, JanitorError::Store(ref msg) if msg == "offline"));
        assert_eq!(janitor.metrics().failed_sweeps, 1);
        assert_eq!(janitor.metrics().sweep_count, 0);
    }
}
