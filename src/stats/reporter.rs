//! Periodic stats flushing.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::StatsConfig;
use crate::observability::metrics;
use crate::pool::ReplicaPool;

/// Flushes per-replica aggregates to the metrics sink on a fixed interval
/// and resets the per-window query counter.
pub struct StatsReporter {
    pool: Arc<ReplicaPool>,
    interval: Duration,
}

impl StatsReporter {
    pub fn new(pool: Arc<ReplicaPool>, config: &StatsConfig) -> Self {
        Self {
            pool,
            interval: Duration::from_secs(config.flush_interval_secs),
        }
    }

    pub fn with_interval(pool: Arc<ReplicaPool>, interval: Duration) -> Self {
        Self { pool, interval }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Stats reporter starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.flush();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Stats reporter received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Emit one window's worth of aggregates and reset the window counter.
    pub fn flush(&self) {
        for replica in self.pool.all_replicas() {
            let window = replica.queries_window.swap(0, Ordering::AcqRel);
            let stats = replica.stats();

            metrics::flush_replica_window(&stats.name, window, &stats);

            tracing::debug!(
                replica = %stats.name,
                queries_window = window,
                errors = stats.errors,
                avg_response_ms = stats.avg_response_ms,
                state = ?stats.state,
                "Flushed replica stats"
            );
        }
    }
}
