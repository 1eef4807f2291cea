//! Inkwell Domain Layer
//!
//! Core types and trait interfaces for engagement-gated view counting.
//! Storage, HTTP and scheduling live in other crates; this crate only knows
//! what a view is and when one may be counted.
//!
//! ## Key Concepts
//!
//! - **Slug**: stable identifier of a content item
//! - **Fingerprint**: salted SHA-256 of a visitor address, never the raw address
//! - **ViewEvent**: one ledger record per counted engagement
//! - **Dedup window**: trailing 24 hours in which a (slug, fingerprint) pair counts once
//! - **Retention window**: 30 days after which ledger records may be pruned
//!
//! ## Architecture
//!
//! - Minimal external dependencies (uuid, sha2, hex)
//! - Time is injected through [`Clock`] so windows can be tested deterministically
//! - Infrastructure implements [`traits::ViewLedger`], [`traits::ViewCounter`]
//!   and [`traits::ContentCatalog`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod content;
pub mod event;
pub mod fingerprint;
pub mod slug;
pub mod stats;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use content::ContentItem;
pub use event::{EventId, ViewEvent};
pub use fingerprint::Fingerprint;
pub use slug::{Slug, SlugError, RESERVED_SLUGS};
pub use stats::{PostViews, SlugActivity};
pub use window::{ViewWindows, DEDUP_WINDOW_SECS, DEFAULT_DWELL_SECS, RETENTION_WINDOW_SECS};
