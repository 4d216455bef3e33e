//! Per-replica statistics subsystem.
//!
//! # Data Flow
//! ```text
//! Router records outcomes (collector.rs):
//!     success → query count +1, window count +1, last-used, rolling avg
//!     failure → error count +1, rolling avg
//!
//! Reporter (reporter.rs), on a fixed interval:
//!     → emit per-replica counters/gauges to the metrics sink
//!     → reset the per-window query counter
//!     → totals, error counts and averages persist across windows
//! ```
//!
//! # Design Decisions
//! - Counters are atomics on the registry entry; recording an outcome is
//!   a handful of relaxed stores, never a lock
//! - Metrics emission is fire-and-forget; a sink failure can never
//!   surface to a query caller

pub mod collector;
pub mod reporter;

pub use reporter::StatsReporter;
