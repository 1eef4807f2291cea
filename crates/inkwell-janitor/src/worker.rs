//! Background worker for continuous Janitor operation

use crate::{Janitor, JanitorConfig, JanitorError, JanitorMetrics, SweepReport};
use inkwell_domain::traits::ViewLedger;
use inkwell_domain::Clock;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Background worker that runs the Janitor on a schedule
///
/// # Examples
///
/// ```no_run
/// use inkwell_janitor::{JanitorWorker, JanitorConfig};
/// use inkwell_store::SqliteStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new("inkwell.db")?;
///     let mut worker = JanitorWorker::new(JanitorConfig::default())?;
///
///     // Run until Ctrl+C
///     worker.run(store).await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker {
    janitor: Janitor,
    interval: Duration,
}

impl JanitorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        config.validate()?;
        let interval = config.sweep_interval();
        Ok(Self {
            janitor: Janitor::new(config),
            interval,
        })
    }

    /// Create a worker with an injected time source
    pub fn with_clock(config: JanitorConfig, clock: Arc<dyn Clock>) -> Result<Self, JanitorError> {
        config.validate()?;
        let interval = config.sweep_interval();
        Ok(Self {
            janitor: Janitor::with_clock(config, clock),
            interval,
        })
    }

    /// Run until Ctrl+C is received
    pub async fn run<S>(&mut self, store: S) -> Result<(), JanitorError>
    where
        S: ViewLedger + Send + 'static,
        S::Error: std::fmt::Display,
    {
        self.run_until(store, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` resolves
    ///
    /// The first sweep happens immediately. A failed sweep is logged and the
    /// worker keeps its schedule.
    pub async fn run_until<S, F>(&mut self, mut store: S, shutdown: F) -> Result<(), JanitorError>
    where
        S: ViewLedger + Send + 'static,
        S::Error: std::fmt::Display,
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            "Janitor worker started (interval: {:?}, retention: {} days, dry_run: {})",
            self.interval,
            self.janitor.config().retention_days,
            self.janitor.config().dry_run
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (returned, result) = self.sweep_blocking(store).await?;
                    store = returned;
                    if let Err(e) = result {
                        tracing::error!("Sweep failed: {}", e);
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping janitor");
                    break;
                }
            }
        }

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.janitor.metrics().summary());
        Ok(())
    }

    /// Run for a specific number of cycles, stopping at the first failure
    pub async fn run_cycles<S>(&mut self, mut store: S, cycles: usize) -> Result<(), JanitorError>
    where
        S: ViewLedger + Send + 'static,
        S::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        for cycle in 0..cycles {
            ticker.tick().await;

            tracing::debug!("Starting sweep cycle {}/{}", cycle + 1, cycles);
            let (returned, result) = self.sweep_blocking(store).await?;
            store = returned;
            if let Err(e) = result {
                tracing::error!("Sweep {}/{} failed: {}", cycle + 1, cycles, e);
                return Err(e);
            }
        }

        tracing::info!(
            "Janitor finished {} cycles. Final metrics:\n{}",
            cycles,
            self.janitor.metrics().summary()
        );
        Ok(())
    }

    /// Run one sweep on the blocking pool and hand the store back
    ///
    /// The outer error means the task itself died and the store is gone.
    async fn sweep_blocking<S>(
        &mut self,
        mut store: S,
    ) -> Result<(S, Result<SweepReport, JanitorError>), JanitorError>
    where
        S: ViewLedger + Send + 'static,
        S::Error: std::fmt::Display,
    {
        let mut janitor = self.janitor.clone();
        let (janitor, store, result) = tokio::task::spawn_blocking(move || {
            let result = janitor.sweep(&mut store);
            (janitor, store, result)
        })
        .await
        .map_err(|e| JanitorError::Task(e.to_string()))?;

        self.janitor = janitor;
        Ok((store, result))
    }

    /// Get a reference to the janitor's current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }

    /// Reset the janitor's metrics counters
    pub fn reset_metrics(&mut self) {
        self.janitor.reset_metrics();
    }
}
