//! Read-replica query routing and failover engine.
//!
//! # Architecture Overview
//!
//! ```text
//! Caller (execute_query + query fn)
//!     → router (candidate list from healthy replicas)
//!         → weighted random selection
//!         → pool (connection handle lookup)
//!         → timeout race around the query fn
//!         → on failure: eliminate candidate, next weighted draw
//!         → on exhaustion: primary connection fallback
//!     → stats (per-replica counters, rolling latency)
//!
//! Background tasks:
//!     health monitor  → periodic ping → state flips → detached reconnect
//!     stats reporter  → periodic flush to metrics sink → window reset
//! ```

// Core subsystems
pub mod config;
pub mod driver;
pub mod pool;
pub mod router;

// Traffic management
pub mod health;
pub mod stats;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{ReplicaConfig, RouterConfig};
pub use driver::{Connection, Driver, DriverError};
pub use health::{HealthMonitor, ReplicaState};
pub use lifecycle::Shutdown;
pub use pool::{ReplicaPool, ReplicaStats};
pub use router::{Consistency, QueryOptions, QueryRouter};
pub use stats::StatsReporter;
