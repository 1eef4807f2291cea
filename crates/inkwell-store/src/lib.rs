//! Inkwell Storage Layer
//!
//! Implements the view ledger, view counter and content catalog traits on SQLite.
//!
//! # Architecture
//!
//! - `posts` holds content items and their counters; increments are a single
//!   `UPDATE ... SET views = views + 1`, never read-modify-write
//! - `view_events` is the eligibility ledger, indexed by
//!   `(post_slug, ip_hash, observed_at DESC)` for dedup lookups and by
//!   `observed_at` for retention sweeps
//! - Conditional logging is one `INSERT ... SELECT ... WHERE NOT EXISTS`
//!   statement, so two racing requests cannot both insert inside a window
//!
//! # Examples
//!
//! ```no_run
//! use inkwell_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for view operations
//! ```

#![warn(missing_docs)]

mod shared;

pub use shared::SharedStore;

use inkwell_domain::traits::{ContentCatalog, ViewCounter, ViewLedger};
use inkwell_domain::{ContentItem, EventId, Fingerprint, PostViews, Slug, SlugActivity, ViewEvent};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// How long a writer waits on a locked database file before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Store cannot be reached (poisoned lock, closed connection)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// SQLite-based store for content counters and the view ledger
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Wrap the store in a [`SharedStore`]
/// to use it from concurrent request handlers.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing). File
    /// databases run in WAL mode with a busy timeout.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use inkwell_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("inkwell.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let in_memory = path.as_ref().as_os_str() == ":memory:";
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        if !in_memory {
            let mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            tracing::debug!("SQLite journal mode: {}", mode);
        }

        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert EventId to bytes for storage
    fn event_id_to_bytes(id: EventId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Read a slug column, surfacing bad rows as conversion failures
    fn slug_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Slug> {
        let raw: String = row.get(idx)?;
        Slug::parse(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    /// Convert bytes to EventId
    fn bytes_to_event_id(bytes: &[u8]) -> Result<EventId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for EventId, got {}", bytes.len()))
        })?;
        Ok(EventId::from_value(u128::from_be_bytes(arr)))
    }

    fn view_event_from_row(row: &Row<'_>) -> rusqlite::Result<ViewEvent> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_event_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let hash: String = row.get(2)?;
        let fingerprint = Fingerprint::from_hex(&hash).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!("Malformed fingerprint: {}", hash))),
            )
        })?;

        Ok(ViewEvent {
            id,
            slug: Self::slug_column(row, 1)?,
            fingerprint,
            user_agent: row.get(3)?,
            observed_at: row.get::<_, i64>(4)? as u64,
            engagement_secs: row.get::<_, i64>(5)? as u64,
        })
    }

    fn content_item_from_row(row: &Row<'_>) -> rusqlite::Result<ContentItem> {
        Ok(ContentItem {
            slug: Self::slug_column(row, 0)?,
            title: row.get(1)?,
            published: row.get(2)?,
            views: row.get::<_, i64>(3)? as u64,
            created_at: row.get::<_, i64>(4)? as u64,
        })
    }
}

impl ViewLedger for SqliteStore {
    type Error = StoreError;

    fn can_view(&self, slug: &Slug, fingerprint: &Fingerprint, window_start: u64) -> Result<bool, Self::Error> {
        let seen: bool = self.conn.query_row(
            "SELECT EXISTS(
                 SELECT 1 FROM view_events
                 WHERE post_slug = ?1 AND ip_hash = ?2 AND observed_at >= ?3
             )",
            params![slug.as_str(), fingerprint.as_str(), window_start as i64],
            |row| row.get(0),
        )?;

        Ok(!seen)
    }

    fn log_view(&mut self, event: ViewEvent) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO view_events (id, post_slug, ip_hash, user_agent, observed_at, engagement_secs)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Self::event_id_to_bytes(event.id),
                event.slug.as_str(),
                event.fingerprint.as_str(),
                &event.user_agent,
                event.observed_at as i64,
                event.engagement_secs as i64,
            ],
        )?;

        Ok(())
    }

    fn log_view_if_absent(&mut self, event: ViewEvent, window_start: u64) -> Result<bool, Self::Error> {
        let inserted = self.conn.execute(
            "INSERT INTO view_events (id, post_slug, ip_hash, user_agent, observed_at, engagement_secs)
             SELECT ?1, ?2, ?3, ?4, ?5, ?6
             WHERE NOT EXISTS (
                 SELECT 1 FROM view_events
                 WHERE post_slug = ?2 AND ip_hash = ?3 AND observed_at >= ?7
             )",
            params![
                Self::event_id_to_bytes(event.id),
                event.slug.as_str(),
                event.fingerprint.as_str(),
                &event.user_agent,
                event.observed_at as i64,
                event.engagement_secs as i64,
                window_start as i64,
            ],
        )?;

        Ok(inserted == 1)
    }

    fn prune_before(&mut self, cutoff: u64) -> Result<usize, Self::Error> {
        let deleted = self.conn.execute(
            "DELETE FROM view_events WHERE observed_at < ?1",
            params![cutoff as i64],
        )?;

        Ok(deleted)
    }

    fn count_before(&self, cutoff: u64) -> Result<usize, Self::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM view_events WHERE observed_at < ?1",
            params![cutoff as i64],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    fn count_events(&self, since: Option<u64>) -> Result<u64, Self::Error> {
        let count: i64 = match since {
            Some(since) => self.conn.query_row(
                "SELECT COUNT(*) FROM view_events WHERE observed_at >= ?1",
                params![since as i64],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM view_events", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }

    fn activity_since(&self, since: u64, limit: usize) -> Result<Vec<SlugActivity>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT post_slug, COUNT(*) AS view_count, COUNT(DISTINCT ip_hash)
             FROM view_events
             WHERE observed_at >= ?1
             GROUP BY post_slug
             ORDER BY view_count DESC, post_slug ASC
             LIMIT ?2",
        )?;

        let activity = stmt
            .query_map(params![since as i64, limit as i64], |row| {
                Ok(SlugActivity {
                    slug: Self::slug_column(row, 0)?,
                    view_count: row.get::<_, i64>(1)? as u64,
                    unique_visitors: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(activity)
    }

    fn recent_for_fingerprint(&self, fingerprint: &Fingerprint, since: u64) -> Result<Vec<ViewEvent>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, post_slug, ip_hash, user_agent, observed_at, engagement_secs
             FROM view_events
             WHERE ip_hash = ?1 AND observed_at >= ?2
             ORDER BY observed_at DESC",
        )?;

        let events = stmt
            .query_map(params![fingerprint.as_str(), since as i64], Self::view_event_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(events)
    }
}

impl ViewCounter for SqliteStore {
    type Error = StoreError;

    fn increment(&mut self, slug: &Slug) -> Result<Option<u64>, Self::Error> {
        let views: Option<i64> = self
            .conn
            .query_row(
                "UPDATE posts SET views = views + 1
                 WHERE slug = ?1 AND published = 1
                 RETURNING views",
                params![slug.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(views.map(|v| v as u64))
    }

    fn get_count(&self, slug: &Slug) -> Result<Option<u64>, Self::Error> {
        let views: Option<i64> = self
            .conn
            .query_row(
                "SELECT views FROM posts WHERE slug = ?1 AND published = 1",
                params![slug.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(views.map(|v| v as u64))
    }
}

impl ContentCatalog for SqliteStore {
    type Error = StoreError;

    fn upsert_item(&mut self, item: ContentItem) -> Result<ContentItem, Self::Error> {
        if item.views > i64::MAX as u64 {
            return Err(StoreError::InvalidData(format!(
                "View count {} does not fit in storage",
                item.views
            )));
        }

        let stored = self.conn.query_row(
            "INSERT INTO posts (slug, title, published, views, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(slug) DO UPDATE SET
                 title = excluded.title,
                 published = excluded.published,
                 views = MAX(posts.views, excluded.views)
             RETURNING slug, title, published, views, created_at",
            params![
                item.slug.as_str(),
                &item.title,
                item.published,
                item.views as i64,
                item.created_at as i64,
            ],
            Self::content_item_from_row,
        )?;

        Ok(stored)
    }

    fn get_item(&self, slug: &Slug) -> Result<Option<ContentItem>, Self::Error> {
        let item = self
            .conn
            .query_row(
                "SELECT slug, title, published, views, created_at FROM posts WHERE slug = ?1",
                params![slug.as_str()],
                Self::content_item_from_row,
            )
            .optional()?;

        Ok(item)
    }

    fn top_items(&self, limit: usize) -> Result<Vec<PostViews>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT slug, title, views FROM posts
             WHERE published = 1
             ORDER BY views DESC, slug ASC
             LIMIT ?1",
        )?;

        let items = stmt
            .query_map(params![limit as i64], |row| {
                Ok(PostViews {
                    slug: Self::slug_column(row, 0)?,
                    title: row.get(1)?,
                    views: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn total_views(&self) -> Result<u64, Self::Error> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(views), 0) FROM posts WHERE published = 1",
            [],
            |row| row.get(0),
        )?;

        Ok(total as u64)
    }
}
