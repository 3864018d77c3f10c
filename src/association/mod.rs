//! Pairwise association scoring: PMI rankings and cross-group bridges

pub mod bridges;
pub mod pmi;

pub use bridges::{detect_bridges, BridgePair};
pub use pmi::{mutual_pairs, rank_pairs, PmiPair, PmiScorer};

/// `log2(p_pair / (p_a * p_b))`, or 0 when any probability is 0
pub(crate) fn pointwise_mutual_information(p_pair: f64, p_a: f64, p_b: f64) -> f64 {
    if p_pair <= 0.0 || p_a <= 0.0 || p_b <= 0.0 {
        return 0.0;
    }
    (p_pair / (p_a * p_b)).log2()
}
