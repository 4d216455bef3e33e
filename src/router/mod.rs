//! Query routing subsystem.
//!
//! # Data Flow
//! ```text
//! execute_query(options, query_fn)
//!     → ensure pool initialized (shared in-flight guard)
//!     → build candidate list (health-filtered, weight-sorted)
//!     → weighted.rs selects one candidate
//!     → query_fn(handle) raced against the per-call timeout
//!     → success: record + return immediately
//!     → failure: record, eliminate candidate for this call only, redraw
//!     → exhausted: warn + run query_fn on the primary
//! ```
//!
//! # Design Decisions
//! - Weighted random selection lets replicas of different capacity take
//!   proportionally more traffic without a central scheduler
//! - Per-call candidate elimination: a failing replica only affects the
//!   call that hit it; longer-term removal is the health monitor's job
//! - Candidates within one call are tried strictly sequentially
//! - The primary is the final authority; its errors propagate unmodified

pub mod query;
pub mod weighted;

use std::sync::Arc;

use crate::pool::Replica;

pub use query::{Consistency, QueryOptions, QueryRouter};
pub use weighted::WeightedRandom;

/// One entry in a call's candidate list.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub weight: u32,
}

impl Candidate {
    pub fn from_replica(replica: &Replica) -> Self {
        Self {
            name: replica.config.name.clone(),
            weight: replica.weight,
        }
    }
}

/// Selection strategy over a candidate list.
pub trait Selector: Send + Sync {
    /// Pick the index of the next candidate to try, or `None` if the
    /// list is empty.
    fn select(&self, candidates: &[Candidate]) -> Option<usize>;
}

/// Build the weight-sorted candidate list for one call.
///
/// Input replicas must be in registration order; the descending sort is
/// stable, so equal weights keep that order as the deterministic tie-break.
pub fn build_candidates(replicas: &[Arc<Replica>]) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = replicas
        .iter()
        .filter(|r| r.is_connected())
        .map(|r| Candidate::from_replica(r))
        .collect();
    candidates.sort_by(|a, b| b.weight.cmp(&a.weight));
    candidates
}
