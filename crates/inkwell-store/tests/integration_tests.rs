//! Integration tests for inkwell-store
//!
//! These tests exercise the ledger, counter and catalog against a real SQLite
//! database, in memory and on disk.

use inkwell_domain::traits::{ContentCatalog, ViewCounter, ViewLedger};
use inkwell_domain::{ContentItem, Fingerprint, Slug, ViewEvent, ViewWindows, DEDUP_WINDOW_SECS};
use inkwell_store::{SharedStore, SqliteStore, StoreError};

const T0: u64 = 1_700_000_000;

fn slug(s: &str) -> Slug {
    Slug::parse(s).unwrap()
}

fn visitor(addr: &str) -> Fingerprint {
    Fingerprint::derive(addr, "test-salt")
}

fn store_with_post(s: &str, views: u64) -> SqliteStore {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .upsert_item(ContentItem::new(slug(s), "A post", T0).with_views(views))
        .unwrap();
    store
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_schema_is_idempotent_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inkwell.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.upsert_item(ContentItem::new(slug("kept"), "Kept", T0).with_views(7)).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.get_count(&slug("kept")).unwrap(), Some(7));
}

#[test]
fn test_fresh_visitor_can_view() {
    let store = store_with_post("hello", 0);
    let windows = ViewWindows::default();

    let eligible = store
        .can_view(&slug("hello"), &visitor("203.0.113.7"), windows.dedup_start(T0))
        .unwrap();
    assert!(eligible);
}

#[test]
fn test_logged_view_blocks_until_window_passes() {
    let mut store = store_with_post("hello", 0);
    let windows = ViewWindows::default();
    let fp = visitor("203.0.113.7");

    store.log_view(ViewEvent::new(slug("hello"), fp.clone(), "test-agent", T0)).unwrap();

    assert!(!store.can_view(&slug("hello"), &fp, windows.dedup_start(T0)).unwrap());

    // Exactly 24 hours later the event still sits on the window boundary
    let at_boundary = T0 + DEDUP_WINDOW_SECS;
    assert!(!store.can_view(&slug("hello"), &fp, windows.dedup_start(at_boundary)).unwrap());

    let past_boundary = at_boundary + 1;
    assert!(store.can_view(&slug("hello"), &fp, windows.dedup_start(past_boundary)).unwrap());
}

#[test]
fn test_eligibility_is_per_slug_and_per_visitor() {
    let mut store = store_with_post("first", 0);
    store.upsert_item(ContentItem::new(slug("second"), "Second", T0)).unwrap();
    let start = ViewWindows::default().dedup_start(T0);

    let alice = visitor("198.51.100.1");
    let bob = visitor("198.51.100.2");
    store.log_view(ViewEvent::new(slug("first"), alice.clone(), "", T0)).unwrap();

    assert!(!store.can_view(&slug("first"), &alice, start).unwrap());
    assert!(store.can_view(&slug("second"), &alice, start).unwrap());
    assert!(store.can_view(&slug("first"), &bob, start).unwrap());
}

#[test]
fn test_conditional_log_inserts_once_per_window() {
    let mut store = store_with_post("hello", 0);
    let windows = ViewWindows::default();
    let fp = visitor("203.0.113.9");

    let first = store
        .log_view_if_absent(ViewEvent::new(slug("hello"), fp.clone(), "", T0), windows.dedup_start(T0))
        .unwrap();
    let later = T0 + 3_600;
    let second = store
        .log_view_if_absent(ViewEvent::new(slug("hello"), fp.clone(), "", later), windows.dedup_start(later))
        .unwrap();

    assert!(first);
    assert!(!second);
    assert_eq!(store.count_events(None).unwrap(), 1);

    let next_day = T0 + DEDUP_WINDOW_SECS + 1;
    let third = store
        .log_view_if_absent(ViewEvent::new(slug("hello"), fp, "", next_day), windows.dedup_start(next_day))
        .unwrap();
    assert!(third);
    assert_eq!(store.count_events(None).unwrap(), 2);
}

#[test]
fn test_increment_counts_every_call() {
    let mut store = store_with_post("counted", 5);

    for expected in 6..=15 {
        assert_eq!(store.increment(&slug("counted")).unwrap(), Some(expected));
    }
    assert_eq!(store.get_count(&slug("counted")).unwrap(), Some(15));
}

#[test]
fn test_missing_and_unpublished_items_do_not_resolve() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .upsert_item(ContentItem::new(slug("draft"), "Draft", T0).with_published(false).with_views(3))
        .unwrap();

    assert_eq!(store.increment(&slug("missing")).unwrap(), None);
    assert_eq!(store.get_count(&slug("missing")).unwrap(), None);
    assert_eq!(store.increment(&slug("draft")).unwrap(), None);
    assert_eq!(store.get_count(&slug("draft")).unwrap(), None);

    // The draft's counter is untouched by the failed increment
    let draft = store.get_item(&slug("draft")).unwrap().unwrap();
    assert_eq!(draft.views, 3);
    assert!(!draft.published);
}

#[test]
fn test_upsert_never_lowers_views() {
    let mut store = store_with_post("hello", 40);

    let stored = store
        .upsert_item(ContentItem::new(slug("hello"), "Renamed", T0).with_views(2))
        .unwrap();

    assert_eq!(stored.title, "Renamed");
    assert_eq!(stored.views, 40);

    let raised = store
        .upsert_item(ContentItem::new(slug("hello"), "Renamed", T0).with_views(90))
        .unwrap();
    assert_eq!(raised.views, 90);
}

#[test]
fn test_upsert_rejects_counts_beyond_storage() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let result = store.upsert_item(ContentItem::new(slug("huge"), "Huge", T0).with_views(u64::MAX));

    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[test]
fn test_prune_removes_only_expired_events() {
    let mut store = store_with_post("hello", 0);
    let windows = ViewWindows::default();
    let now = T0 + windows.retention_secs() + 10;

    let old = visitor("192.0.2.1");
    let fresh = visitor("192.0.2.2");
    store.log_view(ViewEvent::new(slug("hello"), old, "", T0)).unwrap();
    store.log_view(ViewEvent::new(slug("hello"), fresh.clone(), "", now - 60)).unwrap();

    let cutoff = windows.retention_cutoff(now);
    assert_eq!(store.count_before(cutoff).unwrap(), 1);
    assert_eq!(store.prune_before(cutoff).unwrap(), 1);
    assert_eq!(store.count_before(cutoff).unwrap(), 0);
    assert_eq!(store.count_events(None).unwrap(), 1);

    // Pruning never reopens a window that is still active
    assert!(!store.can_view(&slug("hello"), &fresh, windows.dedup_start(now)).unwrap());
}

#[test]
fn test_stats_queries() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store.upsert_item(ContentItem::new(slug("popular"), "Popular", T0).with_views(100)).unwrap();
    store.upsert_item(ContentItem::new(slug("quiet"), "Quiet", T0).with_views(4)).unwrap();
    store
        .upsert_item(ContentItem::new(slug("hidden"), "Hidden", T0).with_views(1_000).with_published(false))
        .unwrap();

    let top = store.top_items(10).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].slug, slug("popular"));
    assert_eq!(top[1].views, 4);
    assert_eq!(store.total_views().unwrap(), 104);

    for addr in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        store.log_view(ViewEvent::new(slug("popular"), visitor(addr), "", T0 + 10)).unwrap();
    }
    store.log_view(ViewEvent::new(slug("quiet"), visitor("10.0.0.1"), "", T0 + 20)).unwrap();
    store.log_view(ViewEvent::new(slug("quiet"), visitor("10.0.0.1"), "", T0 - 5_000)).unwrap();

    let activity = store.activity_since(T0, 10).unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0].slug, slug("popular"));
    assert_eq!(activity[0].view_count, 3);
    assert_eq!(activity[0].unique_visitors, 3);
    assert_eq!(activity[1].view_count, 1);

    assert_eq!(store.count_events(Some(T0)).unwrap(), 4);
    assert_eq!(store.count_events(None).unwrap(), 5);
}

#[test]
fn test_recent_for_fingerprint_newest_first() {
    let mut store = store_with_post("one", 0);
    store.upsert_item(ContentItem::new(slug("two"), "Two", T0)).unwrap();
    let fp = visitor("172.16.0.4");

    store.log_view(ViewEvent::new(slug("one"), fp.clone(), "agent/1", T0)).unwrap();
    store
        .log_view(ViewEvent::new(slug("two"), fp.clone(), "agent/1", T0 + 30).with_engagement_secs(95))
        .unwrap();
    store.log_view(ViewEvent::new(slug("two"), visitor("172.16.0.5"), "", T0 + 40)).unwrap();

    let recent = store.recent_for_fingerprint(&fp, T0).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].slug, slug("two"));
    assert_eq!(recent[0].engagement_secs, 95);
    assert_eq!(recent[0].user_agent, "agent/1");
    assert_eq!(recent[1].slug, slug("one"));
    assert_eq!(recent[1].fingerprint, fp);
}

#[test]
fn test_shared_store_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let shared = SharedStore::open(dir.path().join("shared.db")).unwrap();
    let mut writer = shared.clone();

    writer.upsert_item(ContentItem::new(slug("disk"), "Disk", T0)).unwrap();
    let fp = visitor("203.0.113.50");
    let start = ViewWindows::default().dedup_start(T0);

    assert!(writer.log_view_if_absent(ViewEvent::new(slug("disk"), fp.clone(), "", T0), start).unwrap());
    assert_eq!(writer.increment(&slug("disk")).unwrap(), Some(1));
    assert!(!shared.can_view(&slug("disk"), &fp, start).unwrap());
    assert_eq!(shared.get_count(&slug("disk")).unwrap(), Some(1));
}
