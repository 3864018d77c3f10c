//! Cross-group pairs jointly selected by several choosers

use crate::association::pointwise_mutual_information;
use crate::config::BridgeParams;
use crate::data::RelationDataset;
use crate::graph::canonical_pair;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Two entities from disjoint groups that appear together in several
/// choosers' selection lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgePair {
    pub entity_a: String,
    pub entity_b: String,

    /// Number of distinct choosers selecting both
    pub voter_count: usize,

    /// The choosers, ids ascending
    pub voters: Vec<String>,

    pub pmi: f64,
}

/// PMI of a co-selected pair with the choosers as the universe
pub fn bridge_pmi(dataset: &RelationDataset, a: &str, b: &str, voter_count: usize) -> f64 {
    let total = dataset.chooser_count();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    pointwise_mutual_information(
        voter_count as f64 / total,
        dataset.incoming_count(a) as f64 / total,
        dataset.incoming_count(b) as f64 / total,
    )
}

/// Find cross-group pairs co-selected by at least `min_voters` choosers,
/// highest PMI first.
///
/// Pair enumeration is quadratic in each selection list, so choosers with
/// more than `max_selections` entries are skipped.
pub fn detect_bridges(dataset: &RelationDataset, params: &BridgeParams) -> Vec<BridgePair> {
    let mut voters: BTreeMap<(String, String), Vec<String>> = BTreeMap::new();
    let mut skipped = 0;

    for (chooser, targets) in dataset.choosers() {
        if targets.len() > params.max_selections {
            skipped += 1;
            continue;
        }
        for (x, y) in targets.iter().tuple_combinations() {
            if !dataset.groups_disjoint(x, y) {
                continue;
            }
            let (a, b) = canonical_pair(x, y);
            voters
                .entry((a.to_string(), b.to_string()))
                .or_default()
                .push(chooser.to_string());
        }
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} choosers with more than {} selections",
            skipped,
            params.max_selections
        );
    }

    let mut pairs: Vec<BridgePair> = voters
        .into_iter()
        .filter(|(_, v)| v.len() >= params.min_voters)
        .map(|((a, b), voters)| BridgePair {
            pmi: bridge_pmi(dataset, &a, &b, voters.len()),
            voter_count: voters.len(),
            entity_a: a,
            entity_b: b,
            voters,
        })
        .collect();

    pairs.sort_by(|x, y| y.pmi.total_cmp(&x.pmi));

    log::info!(
        "Found {} bridge pairs with {} or more voters",
        pairs.len(),
        params.min_voters
    );
    pairs
}
