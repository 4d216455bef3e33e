//! Connection pool subsystem.
//!
//! # Data Flow
//! ```text
//! resolved configs
//!     → manager.rs initialize (one connect per enabled config)
//!     → registry: name → replica.rs entry (handle + state + counters)
//!
//! reconnect(name):
//!     swap old handle out → close it (errors ignored)
//!     → connect new → install → Connected / Error
//!
//! close_all():
//!     clear registry → close every handle → reset init flag
//! ```
//!
//! # Design Decisions
//! - At most one live handle per replica name at any time
//! - Initialization is lazy with a shared in-flight guard; concurrent
//!   callers share one underlying attempt
//! - Individual connect failures are logged and skipped, never fatal
//! - Registry mutations are single map/atomic operations, so no reader
//!   can observe a half-updated entry

pub mod manager;
pub mod replica;

pub use manager::ReplicaPool;
pub use replica::{Replica, ReplicaConnection, ReplicaStats};
