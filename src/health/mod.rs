//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (monitor.rs)
//!     → ping every registered replica, raced against a timeout
//!     → success: state = Connected
//!     → failure: state = Error, detached reconnect task spawned
//!
//! State (state.rs):
//!     Connected | Connecting | Disconnected | Error
//!     Only Connected replicas are eligible for selection
//! ```
//!
//! # Design Decisions
//! - Reconnection is fire-and-forget relative to the probe sweep; a slow
//!   reconnect never delays probing of other replicas
//! - Disabled configs are never registered, hence never probed
//! - A replica mid-reconnect keeps reporting a non-Connected state and
//!   stays out of selection until a probe or reconnect flips it back

pub mod monitor;
pub mod state;

pub use monitor::HealthMonitor;
pub use state::ReplicaState;
