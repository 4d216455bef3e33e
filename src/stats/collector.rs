//! Outcome recording.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::driver::DriverError;
use crate::pool::Replica;

/// Smoothed latency update: the first sample seeds the average, later
/// samples fold in at half weight. Deliberately cheap; not a true EWMA.
pub fn rolling_average(avg_ms: u64, duration_ms: u64) -> u64 {
    if avg_ms == 0 {
        duration_ms
    } else {
        (avg_ms + duration_ms) / 2
    }
}

/// Record a successful query attempt against a replica.
pub fn record_success(replica: &Replica, duration: Duration) {
    let duration_ms = duration.as_millis() as u64;
    replica.queries_total.fetch_add(1, Ordering::Relaxed);
    replica.queries_window.fetch_add(1, Ordering::Relaxed);
    replica.mark_used();

    let avg = replica.avg_response_ms.load(Ordering::Relaxed);
    replica
        .avg_response_ms
        .store(rolling_average(avg, duration_ms), Ordering::Relaxed);
}

/// Record a failed query attempt (error or timeout) against a replica.
pub fn record_failure(replica: &Replica, duration: Duration, error: &DriverError) {
    let duration_ms = duration.as_millis() as u64;
    replica.errors.fetch_add(1, Ordering::Relaxed);

    let avg = replica.avg_response_ms.load(Ordering::Relaxed);
    replica
        .avg_response_ms
        .store(rolling_average(avg, duration_ms), Ordering::Relaxed);

    tracing::debug!(
        replica = %replica.config.name,
        error = %error,
        duration_ms,
        "Recorded replica query failure"
    );
}
