//! Configuration for Janitor operations
//!
//! Defines how long ledger records are kept and how often they are swept.

use crate::JanitorError;
use inkwell_domain::{ViewWindows, DEDUP_WINDOW_SECS, RETENTION_WINDOW_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Longest accepted sweep interval (one week)
pub const MAX_SWEEP_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use inkwell_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.retention_days, 30);
/// assert_eq!(config.sweep_interval_minutes, 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Days a ledger record is kept before it may be pruned
    /// Default: 30 days
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,

    /// How often to run the sweep cycle (in minutes)
    /// Default: every 60 minutes
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,

    /// Dry-run mode: report what would be pruned without deleting
    #[serde(default)]
    pub dry_run: bool,

    /// Run the background worker inside the server process
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_retention_days() -> u64 {
    RETENTION_WINDOW_SECS / SECS_PER_DAY
}

fn default_sweep_interval_minutes() -> u64 {
    60
}

fn default_enabled() -> bool {
    true
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            sweep_interval_minutes: default_sweep_interval_minutes(),
            dry_run: false,
            enabled: default_enabled(),
        }
    }
}

impl JanitorConfig {
    /// Reject values the worker cannot run with
    ///
    /// Retention shorter than the dedup window would let a sweep reopen an
    /// active window, and a zero interval would spin the worker.
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.sweep_interval_minutes == 0 {
            return Err(JanitorError::Config(
                "sweep_interval_minutes must be at least 1".to_string(),
            ));
        }
        if self.sweep_interval_minutes > MAX_SWEEP_INTERVAL_MINUTES {
            return Err(JanitorError::Config(format!(
                "sweep_interval_minutes ({}) exceeds {}",
                self.sweep_interval_minutes, MAX_SWEEP_INTERVAL_MINUTES
            )));
        }
        if self.retention() < Duration::from_secs(DEDUP_WINDOW_SECS) {
            return Err(JanitorError::Config(format!(
                "retention_days ({}) must cover the 24h dedup window",
                self.retention_days
            )));
        }
        Ok(())
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.saturating_mul(60))
    }

    /// Get retention period as Duration
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_days.saturating_mul(SECS_PER_DAY))
    }

    /// Windows implied by this configuration
    pub fn windows(&self) -> ViewWindows {
        ViewWindows::new(DEDUP_WINDOW_SECS, self.retention().as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JanitorConfig::default();
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.sweep_interval_minutes, 60);
        assert!(!config.dry_run);
        assert!(config.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duration_conversions() {
        let config = JanitorConfig::default();

        assert_eq!(config.sweep_interval(), Duration::from_secs(60 * 60));
        assert_eq!(config.retention(), Duration::from_secs(RETENTION_WINDOW_SECS));
        assert_eq!(config.windows().retention_secs(), RETENTION_WINDOW_SECS);
    }

    #[test]
    fn test_huge_values_saturate() {
        let config = JanitorConfig {
            sweep_interval_minutes: u64::MAX,
            retention_days: u64::MAX,
            ..Default::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(u64::MAX));
        assert_eq!(config.retention(), Duration::from_secs(u64::MAX));
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));

        let long_retention = JanitorConfig {
            retention_days: u64::MAX,
            ..Default::default()
        };
        assert!(long_retention.validate().is_ok());
        assert_eq!(long_retention.windows().retention_cutoff(1_000), 0);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = JanitorConfig {
            sweep_interval_minutes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_retention_below_dedup_window() {
        let config = JanitorConfig {
            retention_days: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));

        let one_day = JanitorConfig {
            retention_days: 1,
            ..Default::default()
        };
        assert!(one_day.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: JanitorConfig = toml::from_str("dry_run = true").unwrap();

        assert!(config.dry_run);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.sweep_interval_minutes, 60);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = JanitorConfig {
            retention_days: 7,
            ..Default::default()
        };
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: JanitorConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }
}
