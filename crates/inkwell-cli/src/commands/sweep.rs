//! Sweep command implementation.

use crate::cli::SweepArgs;
use crate::commands::admin_client;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use inkwell_domain::traits::ViewLedger;
use inkwell_janitor::{Janitor, JanitorConfig};
use inkwell_sdk::SweepResult;
use inkwell_store::SqliteStore;

/// Execute the sweep command.
///
/// With `--db` the sweep runs against the local database; otherwise the
/// server runs one sweep with its own retention settings.
pub async fn execute_sweep(args: SweepArgs, url: &str, formatter: &Formatter) -> Result<()> {
    let result = match &args.db {
        Some(path) => {
            let config = JanitorConfig {
                retention_days: args.retention_days,
                dry_run: args.dry_run,
                ..JanitorConfig::default()
            };
            let mut store = SqliteStore::new(path)?;
            sweep_local(&mut Janitor::new(config), &mut store)?
        }
        None => {
            if args.dry_run {
                return Err(CliError::InvalidInput(
                    "--dry-run is only supported with --db".to_string(),
                ));
            }
            admin_client(url, &args.admin).await?.sweep().await?
        }
    };

    println!("{}", formatter.format_sweep(&result)?);
    Ok(())
}

/// Run one janitor sweep over a local ledger
pub fn sweep_local<S>(janitor: &mut Janitor, store: &mut S) -> Result<SweepResult>
where
    S: ViewLedger,
    S::Error: std::fmt::Display,
{
    janitor.config().validate()?;
    let report = janitor.sweep(store)?;

    Ok(SweepResult {
        pruned: report.pruned,
        cutoff: report.cutoff,
        dry_run: report.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_domain::{Fingerprint, ManualClock, Slug, ViewEvent};
    use std::sync::Arc;

    const NOW: u64 = 1_750_000_000;
    const DAY: u64 = 86_400;

    fn store_with_events() -> SqliteStore {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let slug = Slug::parse("hello").unwrap();
        for (i, age_days) in [1u64, 10, 31, 45].iter().enumerate() {
            let fp = Fingerprint::derive(&format!("198.51.100.{}", i), "salt");
            store
                .log_view(ViewEvent::new(slug.clone(), fp, "test", NOW - age_days * DAY))
                .unwrap();
        }
        store
    }

    fn janitor(retention_days: u64, dry_run: bool) -> Janitor {
        let config = JanitorConfig {
            retention_days,
            dry_run,
            ..JanitorConfig::default()
        };
        Janitor::with_clock(config, Arc::new(ManualClock::new(NOW)))
    }

    #[test]
    fn test_sweep_local_prunes_expired() {
        let mut store = store_with_events();

        let result = sweep_local(&mut janitor(30, false), &mut store).unwrap();
        assert_eq!(result.pruned, 2);
        assert_eq!(result.cutoff, NOW - 30 * DAY);
        assert_eq!(store.count_events(None).unwrap(), 2);
    }

    #[test]
    fn test_sweep_local_dry_run() {
        let mut store = store_with_events();

        let result = sweep_local(&mut janitor(7, true), &mut store).unwrap();
        assert!(result.dry_run);
        assert_eq!(result.pruned, 3);
        assert_eq!(store.count_events(None).unwrap(), 4);
    }

    #[test]
    fn test_sweep_local_rejects_zero_retention() {
        let mut store = store_with_events();
        assert!(sweep_local(&mut janitor(0, false), &mut store).is_err());
    }
}
