//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     resolve config → build pool → spawn health monitor + stats reporter
//!
//! Shutdown (shutdown.rs):
//!     trigger() → background loops exit → close_all_replicas()
//! ```
//!
//! # Design Decisions
//! - Background tasks subscribe to one broadcast channel and exit on signal
//! - Connection teardown happens after the loops stop, so no probe races
//!   a closing handle

pub mod shutdown;

pub use shutdown::Shutdown;
