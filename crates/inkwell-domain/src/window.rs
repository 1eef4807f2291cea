//! Time windows governing eligibility and retention

/// Trailing window in which a (slug, fingerprint) pair is counted once
pub const DEDUP_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Age after which ledger records may be pruned
pub const RETENTION_WINDOW_SECS: u64 = 30 * 24 * 60 * 60;

/// Dwell time a reader must stay before the client asks to count a view
pub const DEFAULT_DWELL_SECS: u64 = 60;

/// Dedup and retention windows in effect for a deployment
///
/// The dedup window only decides eligibility. The retention window only decides
/// when records may be deleted; it must be at least as long as the dedup window
/// so that pruning never changes an eligibility answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindows {
    dedup_secs: u64,
    retention_secs: u64,
}

impl ViewWindows {
    /// Create windows, widening retention to at least the dedup window
    pub fn new(dedup_secs: u64, retention_secs: u64) -> Self {
        Self {
            dedup_secs,
            retention_secs: retention_secs.max(dedup_secs),
        }
    }

    /// Dedup window length in seconds
    pub fn dedup_secs(&self) -> u64 {
        self.dedup_secs
    }

    /// Retention window length in seconds
    pub fn retention_secs(&self) -> u64 {
        self.retention_secs
    }

    /// Oldest observation time that still blocks a new view at `now`
    ///
    /// An event observed exactly at the returned instant is still inside the window.
    pub fn dedup_start(&self, now: u64) -> u64 {
        now.saturating_sub(self.dedup_secs)
    }

    /// Events observed strictly before the returned instant may be pruned
    pub fn retention_cutoff(&self, now: u64) -> u64 {
        now.saturating_sub(self.retention_secs)
    }
}

impl Default for ViewWindows {
    fn default() -> Self {
        Self::new(DEDUP_WINDOW_SECS, RETENTION_WINDOW_SECS)
    }
}
