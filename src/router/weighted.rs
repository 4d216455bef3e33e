//! Weighted random selection strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::observability::metrics;
use crate::router::{Candidate, Selector};

/// Weighted random selector.
///
/// Draws a uniform value in `[0, total_weight)` and walks the candidate
/// list accumulating weights until the running sum exceeds the draw. A
/// secondary round-robin index exists only as a structural fallback for
/// floating-point boundary cases and zero weight sums; it never changes
/// the probability contract, and firing it is counted as a canary.
#[derive(Debug, Default)]
pub struct WeightedRandom {
    rr_counter: AtomicUsize,
}

impl WeightedRandom {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector for WeightedRandom {
    fn select(&self, candidates: &[Candidate]) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }

        let total: u64 = candidates.iter().map(|c| c.weight as u64).sum();
        if total > 0 {
            let draw = rand::thread_rng().gen::<f64>() * total as f64;
            let mut acc = 0.0;
            for (i, candidate) in candidates.iter().enumerate() {
                acc += candidate.weight as f64;
                if draw < acc {
                    return Some(i);
                }
            }
        }

        tracing::debug!(
            total_weight = total,
            candidates = candidates.len(),
            "Weighted draw unresolved, using round-robin fallback"
        );
        metrics::record_selection_fallback();
        Some(self.rr_counter.fetch_add(1, Ordering::Relaxed) % candidates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(weights: &[u32]) -> Vec<Candidate> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &weight)| Candidate {
                name: format!("r{}", i),
                weight,
            })
            .collect()
    }

    #[test]
    fn empty_list_selects_nothing() {
        let selector = WeightedRandom::new();
        assert_eq!(selector.select(&[]), None);
    }

    #[test]
    fn single_candidate_always_selected() {
        let selector = WeightedRandom::new();
        let list = candidates(&[7]);
        for _ in 0..100 {
            assert_eq!(selector.select(&list), Some(0));
        }
    }

    #[test]
    fn selection_frequency_tracks_weights() {
        let selector = WeightedRandom::new();
        let list = candidates(&[5, 3, 2]);
        let mut counts = [0u32; 3];

        let draws = 10_000;
        for _ in 0..draws {
            let i = selector.select(&list).unwrap();
            counts[i] += 1;
        }

        let ratio = |c: u32| c as f64 / draws as f64;
        assert!((ratio(counts[0]) - 0.5).abs() < 0.03, "got {:?}", counts);
        assert!((ratio(counts[1]) - 0.3).abs() < 0.03, "got {:?}", counts);
        assert!((ratio(counts[2]) - 0.2).abs() < 0.03, "got {:?}", counts);
    }

    #[test]
    fn round_robin_fallback_cycles_on_zero_weight_sum() {
        // Zero weights are rejected by validation, but a programmatic
        // candidate list can still carry them; the fallback must cycle
        // instead of failing.
        let selector = WeightedRandom::new();
        let list = candidates(&[0, 0, 0]);
        let picks: Vec<_> = (0..6).map(|_| selector.select(&list).unwrap()).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2]);
    }
}
