//! Database driver seam.
//!
//! # Responsibilities
//! - Define the narrow interface the engine consumes from the underlying
//!   database driver: open a connection from a config, probe liveness,
//!   close cleanly
//! - Define the error taxonomy query functions report through
//!
//! # Design Decisions
//! - Trait objects so the engine never names a concrete driver
//! - The primary connection is just another `Connection` handle supplied
//!   by the embedding service
//! - Pings return their round-trip time so latency can feed health checks

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ReplicaConfig;

/// Errors surfaced by driver operations and by query functions.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("ping failed: {0}")]
    Ping(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection is closed")]
    Closed,
}

/// A live connection handle.
///
/// Implementations are expected to be cheap to clone behind an `Arc` and
/// safe to use from concurrent tasks.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Lightweight liveness probe (e.g. `SELECT 1`), returning round-trip time.
    async fn ping(&self) -> Result<Duration, DriverError>;

    /// Close the connection. Errors are reported but callers in this crate
    /// treat a failed close as already-closed.
    async fn close(&self) -> Result<(), DriverError>;

    /// Whether the connection has been closed.
    fn is_closed(&self) -> bool;

    /// The URI this connection was opened against.
    fn uri(&self) -> &str;
}

/// Opens connections from replica configs.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn connect(&self, config: &ReplicaConfig) -> Result<Arc<dyn Connection>, DriverError>;
}
