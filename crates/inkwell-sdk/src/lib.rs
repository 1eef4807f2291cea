//! Inkwell Rust SDK
//!
//! Client library for the view-tracking server, plus the engagement gate
//! that requests a view only after the reader has dwelled on the page.
//!
//! # Example
//!
//! ```no_run
//! use inkwell_sdk::{EngagementGate, GateState, ViewsClient};
//!
//! # async fn demo() -> Result<(), inkwell_sdk::SdkError> {
//! let client = ViewsClient::new("http://localhost:8080")?;
//! let policy = client.policy().await?;
//!
//! let mut gate = EngagementGate::new(client, "hello-world").from_policy(&policy);
//! if let GateState::Counted { views } = gate.run().await {
//!     println!("counted, now {} views", views);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod gate;
mod types;

pub use client::ViewsClient;
pub use error::SdkError;
pub use gate::{CancelHandle, EngagementGate, GateState, ViewTransport, DEFAULT_DWELL};
pub use types::{
    AdminSession, CountResult, Health, NewPost, Policy, PostActivity, RegisteredPost, SweepResult,
    TopPost, ViewStats,
};
