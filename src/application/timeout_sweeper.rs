//! TimeoutSweeper - Background service that expires stale decisions.
//!
//! Votes trigger resolution on their own, but a decision nobody votes on
//! after its deadline would stay `voting` forever. The sweeper calls
//! [`DecisionEngine::resolve_pending`] on a fixed interval so those
//! decisions move to `timeout`.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `engine.sweep_interval_ms` | 1000 | Time between sweeps |
//!
//! ## Graceful Shutdown
//!
//! On a shutdown signal (or when the sender is dropped) the sweeper runs
//! one final pass before returning.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::engine::DecisionEngine;

/// Shortest interval the sweeper will tick at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Periodically resolves decisions whose deadline has passed.
pub struct TimeoutSweeper {
    engine: Arc<DecisionEngine>,
    interval: Duration,
}

impl TimeoutSweeper {
    /// Intervals shorter than [`MIN_SWEEP_INTERVAL`] are raised to it.
    pub fn new(engine: Arc<DecisionEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval: interval.max(MIN_SWEEP_INTERVAL),
        }
    }

    /// Use the engine's configured sweep interval.
    pub fn from_config(engine: Arc<DecisionEngine>) -> Self {
        let interval = engine.config().sweep_interval();
        Self::new(engine, interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the sweep loop until shutdown is signalled.
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Watch channel; sending `true` stops the loop
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis() as u64, "Timeout sweeper started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.sweep_once().await;
                        info!("Timeout sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Run a single sweep and return how many decisions were resolved.
    pub async fn sweep_once(&self) -> usize {
        let resolved = self.engine.resolve_pending().await;
        if !resolved.is_empty() {
            debug!(count = resolved.len(), "Sweep resolved decisions");
        }
        resolved.len()
    }
}
