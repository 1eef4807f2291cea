//! Client-side engagement gate.
//!
//! A view is requested only after the reader has stayed on the page for the
//! dwell duration. Leaving earlier cancels the gate and nothing is sent. The
//! gate asks for eligibility first so a returning reader inside the dedup
//! window never starts a timer.

use crate::error::SdkError;
use crate::types::{CountResult, Policy};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Default dwell before a view is requested
pub const DEFAULT_DWELL: Duration = Duration::from_secs(60);

/// Server calls the gate depends on
#[async_trait]
pub trait ViewTransport: Send + Sync {
    /// Whether a view would be counted now
    async fn check_eligibility(&self, slug: &str) -> Result<bool, SdkError>;

    /// Ask the server to count a view
    async fn record_view(&self, slug: &str) -> Result<CountResult, SdkError>;
}

/// Where a gate is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Not run yet
    Unchecked,
    /// Eligible, dwell timer running
    Eligible,
    /// Not eligible, nothing will be sent
    Ineligible,
    /// View recorded
    Counted {
        /// Counter reported by the server
        views: u64,
    },
    /// Reader left before the dwell elapsed
    Abandoned,
    /// A server call failed
    Failed(String),
}

impl GateState {
    /// Whether running again would have no effect
    pub fn is_settled(&self) -> bool {
        !matches!(self, GateState::Unchecked | GateState::Eligible)
    }
}

/// Cancels a running gate, e.g. when the page is closed
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Stop the gate; a pending view is not sent
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Dwell gate for one page view
pub struct EngagementGate<T: ViewTransport> {
    transport: T,
    slug: String,
    dwell: Duration,
    state: GateState,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: watch::Receiver<bool>,
}

impl<T: ViewTransport> EngagementGate<T> {
    /// Create a gate with the default dwell
    pub fn new(transport: T, slug: impl Into<String>) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            transport,
            slug: slug.into(),
            dwell: DEFAULT_DWELL,
            state: GateState::Unchecked,
            cancel_tx: Arc::new(tx),
            cancel_rx: rx,
        }
    }

    /// Use a custom dwell duration
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    /// Use the dwell published by the server
    pub fn from_policy(self, policy: &Policy) -> Self {
        self.with_dwell(Duration::from_secs(policy.dwell_seconds))
    }

    /// Dwell duration in use
    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Current state
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Handle to cancel the gate from another task
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    fn cancelled(&self) -> bool {
        *self.cancel_rx.borrow()
    }

    /// Check eligibility, wait out the dwell, then record the view
    ///
    /// The view is requested at most once per gate. Once settled, further
    /// calls return the settled state without contacting the server.
    pub async fn run(&mut self) -> GateState {
        if self.state.is_settled() {
            return self.state.clone();
        }

        if self.cancelled() {
            self.state = GateState::Abandoned;
            return self.state.clone();
        }

        match self.transport.check_eligibility(&self.slug).await {
            Ok(true) => self.state = GateState::Eligible,
            Ok(false) => {
                tracing::debug!(slug = %self.slug, "View not eligible");
                self.state = GateState::Ineligible;
                return self.state.clone();
            }
            Err(e) => {
                tracing::warn!(slug = %self.slug, error = %e, "Eligibility check failed");
                self.state = GateState::Failed(e.to_string());
                return self.state.clone();
            }
        }

        let mut cancel_rx = self.cancel_rx.clone();
        let dwelled = tokio::select! {
            _ = tokio::time::sleep(self.dwell) => true,
            _ = cancel_rx.wait_for(|cancelled| *cancelled) => false,
        };

        if !dwelled {
            tracing::debug!(slug = %self.slug, "Reader left before dwell elapsed");
            self.state = GateState::Abandoned;
            return self.state.clone();
        }

        self.state = match self.transport.record_view(&self.slug).await {
            Ok(CountResult::Counted { views }) => {
                tracing::debug!(slug = %self.slug, views, "View counted");
                GateState::Counted { views }
            }
            Ok(CountResult::AlreadyViewed { .. }) => GateState::Ineligible,
            Err(e) => {
                tracing::warn!(slug = %self.slug, error = %e, "Recording view failed");
                GateState::Failed(e.to_string())
            }
        };

        self.state.clone()
    }
}
