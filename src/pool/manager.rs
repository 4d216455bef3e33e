//! Replica pool management.
//!
//! # Responsibilities
//! - Own the name-keyed registry of replicas
//! - Open one connection per enabled config, lazily and exactly once
//! - Replace handles on reconnect without an intermediate double-handle state
//! - Tear everything down on shutdown

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::config::ReplicaConfig;
use crate::driver::Driver;
use crate::health::ReplicaState;
use crate::pool::replica::{Replica, ReplicaConnection, ReplicaStats};

/// Manages the replica registry and connection lifecycle.
pub struct ReplicaPool {
    driver: Arc<dyn Driver>,
    configs: Vec<ReplicaConfig>,
    registry: DashMap<String, Arc<Replica>>,
    /// Set only once an initialize attempt has completed.
    initialized: AtomicBool,
    /// Shared in-flight guard: concurrent callers of `ensure_initialized`
    /// queue here and share one underlying connect sweep.
    init_lock: Mutex<()>,
    next_seq: AtomicU64,
}

impl ReplicaPool {
    pub fn new(driver: Arc<dyn Driver>, configs: Vec<ReplicaConfig>) -> Self {
        Self {
            driver,
            configs,
            registry: DashMap::new(),
            initialized: AtomicBool::new(false),
            init_lock: Mutex::new(()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Lazily initialize the pool. Idempotent; concurrent callers share
    /// one underlying attempt.
    pub async fn ensure_initialized(&self) {
        if self.initialized.load(Ordering::Acquire) {
            return;
        }
        let _guard = self.init_lock.lock().await;
        if self.initialized.load(Ordering::Acquire) {
            return;
        }
        self.connect_all().await;
        self.initialized.store(true, Ordering::Release);
    }

    /// Tear down any existing connections and reconnect every enabled
    /// config. Returns the number of live connections.
    pub async fn initialize(&self) -> usize {
        let _guard = self.init_lock.lock().await;
        self.teardown().await;
        let live = self.connect_all().await;
        self.initialized.store(true, Ordering::Release);
        live
    }

    async fn connect_all(&self) -> usize {
        let mut live = 0;
        for config in self.configs.iter().filter(|c| c.enabled) {
            match self.driver.connect(config).await {
                Ok(conn) => {
                    let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                    let replica = Replica::new(config.clone(), seq);
                    replica.install_handle(ReplicaConnection::new(&config.name, conn));
                    replica.set_state(ReplicaState::Connected);
                    self.registry.insert(config.name.clone(), Arc::new(replica));
                    tracing::info!(replica = %config.name, weight = config.weight, "Replica connected");
                    live += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        replica = %config.name,
                        error = %e,
                        "Failed to connect replica, skipping"
                    );
                }
            }
        }
        if live == 0 {
            tracing::info!("No replicas connected, reads will use the primary");
        }
        live
    }

    /// Handle lookup by name.
    pub fn get(&self, name: &str) -> Option<Arc<ReplicaConnection>> {
        self.registry.get(name).and_then(|entry| entry.handle())
    }

    /// Registry entry lookup by name.
    pub fn replica(&self, name: &str) -> Option<Arc<Replica>> {
        self.registry.get(name).map(|entry| entry.value().clone())
    }

    /// All registered replicas in registration order.
    pub fn all_replicas(&self) -> Vec<Arc<Replica>> {
        let mut replicas: Vec<_> = self
            .registry
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        replicas.sort_by_key(|r| r.seq);
        replicas
    }

    /// Close the old handle for `name` and open a new one.
    ///
    /// Overlapping calls for the same replica collapse to one attempt.
    /// The old handle is swapped out before the new connect starts, so a
    /// reader never sees two live handles for one name.
    pub async fn reconnect(&self, name: &str) {
        let Some(replica) = self.replica(name) else {
            return;
        };
        if replica
            .reconnecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(replica = %name, "Reconnect already in flight");
            return;
        }

        replica.set_state(ReplicaState::Connecting);
        if let Some(old) = replica.take_handle() {
            if let Err(e) = old.conn.close().await {
                tracing::debug!(replica = %name, error = %e, "Ignoring error closing stale connection");
            }
        }

        match self.driver.connect(&replica.config).await {
            Ok(conn) => {
                replica.install_handle(ReplicaConnection::new(name, conn));
                replica.set_state(ReplicaState::Connected);
                // The pool may have been torn down while the connect was
                // in flight. Install first, then verify: if the entry is
                // gone from the registry, either teardown already closed
                // the new handle or it is ours to close now.
                let still_registered = self
                    .registry
                    .get(name)
                    .map(|entry| Arc::ptr_eq(entry.value(), &replica))
                    .unwrap_or(false);
                if still_registered {
                    tracing::info!(replica = %name, "Replica reconnected");
                } else {
                    replica.set_state(ReplicaState::Disconnected);
                    if let Some(handle) = replica.take_handle() {
                        if let Err(e) = handle.conn.close().await {
                            tracing::debug!(replica = %name, error = %e, "Ignoring error closing connection");
                        }
                        tracing::debug!(replica = %name, "Discarded reconnect result, pool was torn down");
                    }
                }
            }
            Err(e) => {
                replica.set_state(ReplicaState::Error);
                tracing::warn!(replica = %name, error = %e, "Replica reconnect failed");
            }
        }

        replica.reconnecting.store(false, Ordering::Release);
    }

    /// Close every handle and clear all in-memory state. Subsequent
    /// `get` calls return `None` until initialization runs again.
    pub async fn close_all(&self) {
        let _guard = self.init_lock.lock().await;
        self.teardown().await;
        self.initialized.store(false, Ordering::Release);
    }

    async fn teardown(&self) {
        let replicas: Vec<_> = self
            .registry
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        self.registry.clear();

        for replica in replicas {
            replica.set_state(ReplicaState::Disconnected);
            if let Some(handle) = replica.take_handle() {
                if let Err(e) = handle.conn.close().await {
                    tracing::debug!(
                        replica = %replica.config.name,
                        error = %e,
                        "Ignoring error closing connection"
                    );
                }
            }
        }
    }

    /// Snapshot of every registered replica's runtime status.
    pub fn replica_stats(&self) -> Vec<ReplicaStats> {
        self.all_replicas().iter().map(|r| r.stats()).collect()
    }

    /// Names of every registered replica, in registration order.
    pub fn replica_names(&self) -> Vec<String> {
        self.all_replicas()
            .iter()
            .map(|r| r.config.name.clone())
            .collect()
    }

    /// True if at least one replica is currently selectable.
    pub fn has_healthy_replicas(&self) -> bool {
        self.registry.iter().any(|entry| entry.is_connected())
    }
}
