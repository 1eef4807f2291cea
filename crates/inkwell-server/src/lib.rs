//! Inkwell Server
//!
//! HTTP service for engagement-gated view counting. Visitors are identified by
//! a salted fingerprint of their address; a view is counted at most once per
//! visitor and item within 24 hours. A background janitor prunes expired
//! ledger records from the same store.

#![warn(missing_docs)]

pub mod admin;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod handlers;
pub mod tracker;

use admin::AdminAuth;
use config::ServerConfig;
use handlers::{create_router, AppState};
use inkwell_domain::{Clock, SystemClock};
use inkwell_janitor::{JanitorError, JanitorWorker};
use inkwell_store::{SharedStore, StoreError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracker::ViewTracker;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Janitor could not be started
    #[error("Janitor error: {0}")]
    Janitor(#[from] JanitorError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Assemble handler state over an open store
pub fn build_state(config: &ServerConfig, store: SharedStore, clock: Arc<dyn Clock>) -> AppState {
    AppState {
        tracker: Arc::new(ViewTracker::new(store, clock, config)),
        admin: Arc::new(AdminAuth::new(
            &config.admin_password,
            &config.jwt_secret,
            config.token_expiry_secs,
        )),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Start the HTTP server
///
/// Opens the store, spawns the janitor worker when enabled, and serves until
/// Ctrl+C. The janitor is stopped after the last connection drains.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();
    config.validate()?;

    info!("Starting Inkwell view server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.db_path.display());
    info!("Dwell threshold: {} seconds", config.dwell_seconds);

    let store = SharedStore::open(&config.db_path)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let app = create_router(build_state(&config, store.clone(), Arc::clone(&clock)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let janitor = if config.janitor.enabled {
        let mut worker = JanitorWorker::with_clock(config.janitor.clone(), clock)?;
        let mut rx = shutdown_rx;
        Some(tokio::spawn(async move {
            worker
                .run_until(store, async move {
                    let _ = rx.changed().await;
                })
                .await
        }))
    } else {
        info!("Janitor disabled; expired view records will not be pruned");
        None
    };

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()));

    let _ = shutdown_tx.send(true);
    if let Some(handle) = janitor {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Janitor stopped with error: {}", e),
            Err(e) => tracing::warn!("Janitor task failed: {}", e),
        }
    }

    served
}
