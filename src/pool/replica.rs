//! Replica registry entry.
//!
//! # Responsibilities
//! - Hold the (at most one) live connection handle for a replica
//! - Track health state and per-replica counters
//! - Guard against overlapping reconnect attempts

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwapOption;
use serde::Serialize;

use crate::config::ReplicaConfig;
use crate::driver::Connection;
use crate::health::ReplicaState;

/// A live connection handle, owned by the registry entry.
pub struct ReplicaConnection {
    pub name: String,
    pub conn: Arc<dyn Connection>,
    pub connected_at: Instant,
}

impl ReplicaConnection {
    pub fn new(name: impl Into<String>, conn: Arc<dyn Connection>) -> Self {
        Self {
            name: name.into(),
            conn,
            connected_at: Instant::now(),
        }
    }
}

/// A single replica: immutable config plus mutable runtime state.
///
/// All runtime fields are atomics so timers and concurrent query calls
/// mutate the entry without locks.
pub struct Replica {
    pub config: ReplicaConfig,
    /// Copied from config for fast access during candidate building.
    pub weight: u32,
    /// Registration order, used as the deterministic tie-break for equal weights.
    pub seq: u64,

    handle: ArcSwapOption<ReplicaConnection>,
    state: AtomicU8,
    /// Overlapping reconnect triggers collapse to one attempt.
    pub(crate) reconnecting: AtomicBool,

    pub queries_total: AtomicU64,
    pub queries_window: AtomicU64,
    pub errors: AtomicU64,
    pub avg_response_ms: AtomicU64,
    pub last_used_unix_ms: AtomicU64,
}

impl Replica {
    pub fn new(config: ReplicaConfig, seq: u64) -> Self {
        let weight = config.weight;
        Self {
            config,
            weight,
            seq,
            handle: ArcSwapOption::empty(),
            state: AtomicU8::new(ReplicaState::Disconnected as u8),
            reconnecting: AtomicBool::new(false),
            queries_total: AtomicU64::new(0),
            queries_window: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            avg_response_ms: AtomicU64::new(0),
            last_used_unix_ms: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ReplicaState {
        ReplicaState::from(self.state.load(Ordering::Acquire))
    }

    pub fn set_state(&self, state: ReplicaState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Current handle, if any.
    pub fn handle(&self) -> Option<Arc<ReplicaConnection>> {
        self.handle.load_full()
    }

    /// Remove and return the current handle, leaving none installed.
    pub fn take_handle(&self) -> Option<Arc<ReplicaConnection>> {
        self.handle.swap(None)
    }

    /// Install a new handle, returning whatever it replaced.
    pub fn install_handle(&self, conn: ReplicaConnection) -> Option<Arc<ReplicaConnection>> {
        self.handle.swap(Some(Arc::new(conn)))
    }

    pub fn mark_used(&self) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_used_unix_ms.store(now_ms, Ordering::Relaxed);
    }

    /// Point-in-time snapshot for introspection endpoints.
    pub fn stats(&self) -> ReplicaStats {
        ReplicaStats {
            name: self.config.name.clone(),
            state: self.state(),
            weight: self.weight,
            queries_total: self.queries_total.load(Ordering::Relaxed),
            queries_window: self.queries_window.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            avg_response_ms: self.avg_response_ms.load(Ordering::Relaxed),
            last_used_unix_ms: self.last_used_unix_ms.load(Ordering::Relaxed),
        }
    }
}

/// Serializable snapshot of a replica's runtime status.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicaStats {
    pub name: String,
    pub state: ReplicaState,
    pub weight: u32,
    pub queries_total: u64,
    pub queries_window: u64,
    pub errors: u64,
    pub avg_response_ms: u64,
    pub last_used_unix_ms: u64,
}
