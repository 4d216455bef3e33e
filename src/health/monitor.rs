//! Periodic health monitoring.
//!
//! # Responsibilities
//! - Probe every registered replica on a fixed interval
//! - Flip replica state based on probe results
//! - Trigger asynchronous reconnection on failure

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::health::ReplicaState;
use crate::observability::metrics;
use crate::pool::ReplicaPool;

pub struct HealthMonitor {
    pool: Arc<ReplicaPool>,
    interval: Duration,
    ping_timeout: Duration,
    enabled: bool,
}

impl HealthMonitor {
    pub fn new(pool: Arc<ReplicaPool>, config: &HealthCheckConfig) -> Self {
        Self {
            pool,
            interval: Duration::from_secs(config.interval_secs),
            ping_timeout: Duration::from_secs(config.timeout_secs),
            enabled: config.enabled,
        }
    }

    /// Explicit intervals, used by tests and embedders with sub-second needs.
    pub fn with_intervals(pool: Arc<ReplicaPool>, interval: Duration, ping_timeout: Duration) -> Self {
        Self {
            pool,
            interval,
            ping_timeout,
            enabled: true,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.enabled {
            tracing::info!("Health checks disabled");
            return;
        }

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn check_all(&self) {
        for replica in self.pool.all_replicas() {
            let name = replica.config.name.clone();

            let healthy = match replica.handle() {
                Some(handle) => match time::timeout(self.ping_timeout, handle.conn.ping()).await {
                    Ok(Ok(latency)) => {
                        tracing::trace!(
                            replica = %name,
                            latency_ms = latency.as_millis() as u64,
                            "Health probe ok"
                        );
                        true
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(replica = %name, error = %e, "Health probe failed");
                        false
                    }
                    Err(_) => {
                        tracing::warn!(replica = %name, "Health probe timed out");
                        false
                    }
                },
                None => {
                    tracing::warn!(replica = %name, "Health probe skipped, no live handle");
                    false
                }
            };

            if healthy {
                replica.set_state(ReplicaState::Connected);
            } else {
                replica.set_state(ReplicaState::Error);
                // Fire-and-forget: a slow reconnect must not block the
                // remaining probes in this sweep.
                let pool = self.pool.clone();
                let reconnect_name = name.clone();
                tokio::spawn(async move {
                    pool.reconnect(&reconnect_name).await;
                });
            }

            metrics::record_replica_health(&name, healthy);
        }
    }
}
