//! Metrics collection and exposition.
//!
//! # Metrics
//! - `replica_router_health` (gauge): 1=connected, 0=not selectable
//! - `replica_router_queries_total` (counter): queries served per replica
//! - `replica_router_avg_response_ms` (gauge): smoothed latency per replica
//! - `replica_router_errors_total` (gauge): cumulative errors per replica
//! - `replica_router_selection_fallback_total` (counter): canary for the
//!   round-robin fallback inside weighted selection; nonzero values point
//!   at a weight-sum computation bug

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::pool::ReplicaStats;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::error!(error = %e, "Failed to install Prometheus exporter");
    } else {
        tracing::info!(address = %addr, "Metrics exporter listening");
    }
}

/// Record the outcome of a health probe.
pub fn record_replica_health(name: &str, healthy: bool) {
    gauge!("replica_router_health", "replica" => name.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Emit one flush window's aggregates for a replica.
pub fn flush_replica_window(name: &str, window_queries: u64, stats: &ReplicaStats) {
    counter!("replica_router_queries_total", "replica" => name.to_string())
        .increment(window_queries);
    gauge!("replica_router_avg_response_ms", "replica" => name.to_string())
        .set(stats.avg_response_ms as f64);
    gauge!("replica_router_errors_total", "replica" => name.to_string())
        .set(stats.errors as f64);
    gauge!("replica_router_health", "replica" => name.to_string())
        .set(if stats.state.is_connected() { 1.0 } else { 0.0 });
}

/// Canary: the weighted draw failed to resolve and round-robin stepped in.
pub fn record_selection_fallback() {
    counter!("replica_router_selection_fallback_total").increment(1);
}
