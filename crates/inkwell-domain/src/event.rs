//! View events - the records kept by the eligibility ledger

use crate::{Fingerprint, Slug, DEFAULT_DWELL_SECS};
use std::fmt;

/// Unique identifier for a view event based on UUIDv7
///
/// UUIDv7 keeps ledger rows chronologically sortable without coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u128);

impl EventId {
    /// Generate a new UUIDv7-based EventId
    ///
    /// # Examples
    ///
    /// ```
    /// use inkwell_domain::EventId;
    ///
    /// let id = EventId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EventId from a raw u128 value (storage deserialization)
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EventId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid event id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// One observed, counted engagement of a visitor with a content item
///
/// At most one event per (slug, fingerprint) may exist inside any trailing
/// dedup window. Events are immutable; the janitor deletes them once they
/// fall out of the retention window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    /// Unique identifier
    pub id: EventId,

    /// Content item this view belongs to
    pub slug: Slug,

    /// Salted hash of the visitor address
    pub fingerprint: Fingerprint,

    /// Observation time (unix seconds)
    pub observed_at: u64,

    /// Visitor user agent, diagnostic only
    pub user_agent: String,

    /// Dwell time the client required before counting (audit only)
    pub engagement_secs: u64,
}

impl ViewEvent {
    /// Create an event observed at `observed_at` with the default dwell requirement
    pub fn new(slug: Slug, fingerprint: Fingerprint, user_agent: impl Into<String>, observed_at: u64) -> Self {
        Self {
            id: EventId::new(),
            slug,
            fingerprint,
            observed_at,
            user_agent: user_agent.into(),
            engagement_secs: DEFAULT_DWELL_SECS,
        }
    }

    /// Record the dwell threshold the client enforced
    pub fn with_engagement_secs(mut self, secs: u64) -> Self {
        self.engagement_secs = secs;
        self
    }
}
