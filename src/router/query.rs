//! The query router entry point.
//!
//! # Responsibilities
//! - Route read queries across healthy replicas by weighted random choice
//! - Race every attempt against the per-call timeout
//! - Eliminate failed candidates within the call and fall back to the
//!   primary when the list is exhausted

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time;

use crate::config::{self, ConfigError, QueryDefaults, RouterConfig};
use crate::driver::{Connection, Driver, DriverError};
use crate::pool::{ReplicaConnection, ReplicaPool, ReplicaStats};
use crate::router::{build_candidates, Selector, WeightedRandom};
use crate::stats::collector;

/// Name of the replica the analytics wrapper pins to.
pub const ANALYTICS_REPLICA: &str = "analytics";

/// Consistency hint for a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consistency {
    /// Any eligible replica may serve the read.
    #[default]
    Eventual,
    /// The read must see the latest writes; routed to the primary.
    Strong,
}

/// Per-call routing options. Never persisted.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// When false, the query runs on the primary with no routing logic.
    pub use_replica: bool,
    /// Pin the query to one named replica; an unhealthy pin degrades to
    /// the primary without touching the replica.
    pub replica_name: Option<String>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Consistency hint; `Strong` behaves like `use_replica = false`.
    pub consistency: Consistency,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            use_replica: true,
            replica_name: None,
            timeout: Duration::from_secs(30),
            consistency: Consistency::Eventual,
        }
    }
}

impl QueryOptions {
    pub fn primary_only() -> Self {
        Self {
            use_replica: false,
            ..Self::default()
        }
    }

    pub fn pinned(name: impl Into<String>) -> Self {
        Self {
            replica_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }
}

/// Routes read queries across weighted replicas with primary fallback.
pub struct QueryRouter {
    primary: Arc<dyn Connection>,
    pool: Arc<ReplicaPool>,
    selector: WeightedRandom,
    defaults: QueryDefaults,
}

impl QueryRouter {
    pub fn new(
        primary: Arc<dyn Connection>,
        pool: Arc<ReplicaPool>,
        defaults: QueryDefaults,
    ) -> Self {
        Self {
            primary,
            pool,
            selector: WeightedRandom::new(),
            defaults,
        }
    }

    /// Build a router from an already-loaded configuration.
    pub fn from_config(
        config: &RouterConfig,
        driver: Arc<dyn Driver>,
        primary: Arc<dyn Connection>,
    ) -> Self {
        let replicas = config::resolve(config);
        let pool = Arc::new(ReplicaPool::new(driver, replicas));
        Self::new(primary, pool, config.query.clone())
    }

    /// Build a router from a TOML config file.
    pub fn from_config_file(
        path: &Path,
        driver: Arc<dyn Driver>,
        primary: Arc<dyn Connection>,
    ) -> Result<Self, ConfigError> {
        let config = config::load_config(path)?;
        Ok(Self::from_config(&config, driver, primary))
    }

    /// The pool backing this router, for wiring up the health monitor and
    /// stats reporter.
    pub fn pool(&self) -> Arc<ReplicaPool> {
        self.pool.clone()
    }

    /// Execute a read query with the given options.
    ///
    /// The query function is invoked with the selected connection handle;
    /// it may run more than once across candidates and the primary
    /// fallback. Replica-layer failures are absorbed; the only error a
    /// caller can see is the primary's own.
    pub async fn execute_query<T, F, Fut>(
        &self,
        options: QueryOptions,
        query_fn: F,
    ) -> Result<T, DriverError>
    where
        F: Fn(Arc<dyn Connection>) -> Fut,
        Fut: Future<Output = Result<T, DriverError>>,
    {
        if !options.use_replica || options.consistency == Consistency::Strong {
            return query_fn(self.primary.clone()).await;
        }

        self.pool.ensure_initialized().await;

        let mut candidates = match &options.replica_name {
            Some(name) => match self.pool.replica(name) {
                Some(replica) if replica.is_connected() => {
                    vec![crate::router::Candidate::from_replica(&replica)]
                }
                _ => Vec::new(),
            },
            None => build_candidates(&self.pool.all_replicas()),
        };

        if candidates.is_empty() {
            // Designed degradation path, not a failure.
            return query_fn(self.primary.clone()).await;
        }

        while !candidates.is_empty() {
            let Some(index) = self.selector.select(&candidates) else {
                break;
            };
            let name = candidates[index].name.clone();

            // The registry may have changed since the list was built;
            // stale candidates are dropped without counting a failure.
            let Some(replica) = self.pool.replica(&name) else {
                candidates.remove(index);
                continue;
            };
            if !replica.is_connected() {
                candidates.remove(index);
                continue;
            }
            let Some(handle) = replica.handle() else {
                candidates.remove(index);
                continue;
            };

            let start = Instant::now();
            match time::timeout(options.timeout, query_fn(handle.conn.clone())).await {
                Ok(Ok(result)) => {
                    collector::record_success(&replica, start.elapsed());
                    return Ok(result);
                }
                Ok(Err(e)) => {
                    collector::record_failure(&replica, start.elapsed(), &e);
                    tracing::debug!(
                        replica = %name,
                        error = %e,
                        "Replica query failed, eliminating candidate"
                    );
                    candidates.remove(index);
                }
                Err(_) => {
                    let e = DriverError::Timeout(options.timeout);
                    collector::record_failure(&replica, start.elapsed(), &e);
                    tracing::debug!(
                        replica = %name,
                        timeout_ms = options.timeout.as_millis() as u64,
                        "Replica query timed out, eliminating candidate"
                    );
                    candidates.remove(index);
                }
            }
        }

        tracing::warn!("All read replicas failed, falling back to primary");
        query_fn(self.primary.clone()).await
    }

    /// Execute against any read replica with the configured default timeout.
    pub async fn execute_read<T, F, Fut>(&self, query_fn: F) -> Result<T, DriverError>
    where
        F: Fn(Arc<dyn Connection>) -> Fut,
        Fut: Future<Output = Result<T, DriverError>>,
    {
        let options = QueryOptions::default()
            .with_timeout(Duration::from_secs(self.defaults.timeout_secs));
        self.execute_query(options, query_fn).await
    }

    /// Execute pinned to the analytics replica with its longer timeout.
    pub async fn execute_analytics<T, F, Fut>(&self, query_fn: F) -> Result<T, DriverError>
    where
        F: Fn(Arc<dyn Connection>) -> Fut,
        Fut: Future<Output = Result<T, DriverError>>,
    {
        let options = QueryOptions::pinned(ANALYTICS_REPLICA)
            .with_timeout(Duration::from_secs(self.defaults.analytics_timeout_secs));
        self.execute_query(options, query_fn).await
    }

    /// Runtime status of every registered replica.
    pub fn replica_stats(&self) -> Vec<ReplicaStats> {
        self.pool.replica_stats()
    }

    /// True if at least one replica is currently selectable.
    pub fn has_healthy_replicas(&self) -> bool {
        self.pool.has_healthy_replicas()
    }

    /// Connection handle for a named replica, if registered and live.
    pub fn get_replica(&self, name: &str) -> Option<Arc<ReplicaConnection>> {
        self.pool.get(name)
    }

    /// Graceful shutdown hook: close every replica connection.
    pub async fn close_all_replicas(&self) {
        self.pool.close_all().await;
    }
}
