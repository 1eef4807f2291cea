//! CLI operations against a file-backed database

use inkwell_cli::commands::seed::seed_local;
use inkwell_cli::commands::sweep::sweep_local;
use inkwell_domain::traits::{ViewCounter, ViewLedger};
use inkwell_domain::{ContentItem, Fingerprint, ManualClock, Slug, ViewEvent};
use inkwell_janitor::{Janitor, JanitorConfig};
use inkwell_store::SqliteStore;
use std::sync::Arc;
use tempfile::TempDir;

const NOW: u64 = 1_750_000_000;

#[test]
fn test_seed_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("views.db");
    let slug = Slug::parse("launch-notes").unwrap();

    {
        let mut store = SqliteStore::new(&path).unwrap();
        seed_local(&mut store, ContentItem::new(slug.clone(), "Launch notes", NOW).with_views(120)).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.get_count(&slug).unwrap(), Some(120));
}

#[test]
fn test_sweep_file_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("views.db");
    let slug = Slug::parse("launch-notes").unwrap();

    {
        let mut store = SqliteStore::new(&path).unwrap();
        let old = Fingerprint::derive("198.51.100.1", "salt");
        let fresh = Fingerprint::derive("198.51.100.2", "salt");
        store
            .log_view(ViewEvent::new(slug.clone(), old, "cli", NOW - 40 * 86_400))
            .unwrap();
        store
            .log_view(ViewEvent::new(slug.clone(), fresh, "cli", NOW - 3_600))
            .unwrap();
    }

    let mut store = SqliteStore::new(&path).unwrap();
    let mut janitor = Janitor::with_clock(JanitorConfig::default(), Arc::new(ManualClock::new(NOW)));

    let result = sweep_local(&mut janitor, &mut store).unwrap();
    assert_eq!(result.pruned, 1);
    assert!(!result.dry_run);
    assert_eq!(store.count_events(None).unwrap(), 1);
    assert_eq!(janitor.metrics().sweep_count, 1);
}
