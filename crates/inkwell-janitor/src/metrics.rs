//! Metrics collection for Janitor operations

/// Metrics collected across sweep cycles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JanitorMetrics {
    /// Ledger records deleted
    pub pruned: usize,

    /// Ledger records a dry run would have deleted
    pub would_prune: usize,

    /// Sweep cycles completed
    pub sweep_count: usize,

    /// Sweep cycles that failed on the store
    pub failed_sweeps: usize,

    /// Cutoff used by the most recent sweep (unix seconds)
    pub last_cutoff: Option<u64>,

    /// Total time spent sweeping, in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed sweep
    pub fn record_sweep(&mut self, cutoff: u64, pruned: usize, dry_run: bool) {
        self.sweep_count += 1;
        self.last_cutoff = Some(cutoff);
        if dry_run {
            self.would_prune += pruned;
        } else {
            self.pruned += pruned;
        }
    }

    /// Record a sweep that failed
    pub fn record_failure(&mut self) {
        self.failed_sweeps += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Failed sweeps: {}", self.failed_sweeps),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!("Records pruned: {}", self.pruned),
        ];

        if self.would_prune > 0 {
            lines.push(format!("Records a dry run would prune: {}", self.would_prune));
        }
        if let Some(cutoff) = self.last_cutoff {
            lines.push(format!("Last cutoff: {}", cutoff));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sweep_accumulates() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(100, 5, false);
        metrics.record_sweep(200, 3, false);
        metrics.record_sweep(300, 9, true);

        assert_eq!(metrics.sweep_count, 3);
        assert_eq!(metrics.pruned, 8);
        assert_eq!(metrics.would_prune, 9);
        assert_eq!(metrics.last_cutoff, Some(300));
    }

    #[test]
    fn test_reset() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(100, 10, false);
        metrics.record_failure();

        metrics.reset();

        assert_eq!(metrics, JanitorMetrics::default());
    }

    #[test]
    fn test_summary() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(1_000, 4, false);
        metrics.total_runtime_ms = 120;

        let summary = metrics.summary();
        assert!(summary.contains("Sweep cycles: 1"));
        assert!(summary.contains("Total runtime: 120ms"));
        assert!(summary.contains("Records pruned: 4"));
        assert!(summary.contains("Last cutoff: 1000"));
        assert!(!summary.contains("dry run"));
    }
}
