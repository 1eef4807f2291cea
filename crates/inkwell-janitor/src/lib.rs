//! Inkwell Janitor
//!
//! Background maintenance for the view ledger.
//!
//! # Overview
//!
//! Every counted view leaves a ledger record so that the same visitor is not
//! counted twice within 24 hours. Those records are only needed for the dedup
//! window, so the Janitor deletes anything older than the retention window
//! (30 days by default). Counters on content items are never touched.
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use inkwell_janitor::Janitor;
//! use inkwell_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("inkwell.db")?;
//! let mut janitor = Janitor::default_config();
//!
//! janitor.sweep(&mut store)?;
//! println!("{}", janitor.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use inkwell_janitor::{JanitorWorker, JanitorConfig};
//! use inkwell_store::SharedStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SharedStore::open("inkwell.db")?;
//!     let mut worker = JanitorWorker::new(JanitorConfig::default())?;
//!     worker.run(store).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! retention_days = 30
//! sweep_interval_minutes = 60
//! dry_run = false
//! enabled = true
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod worker;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::{Janitor, SweepReport};
pub use metrics::JanitorMetrics;
pub use worker::JanitorWorker;
