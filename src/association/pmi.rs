//! Pointwise mutual information over directly related pairs

use crate::association::pointwise_mutual_information;
use crate::config::PmiParams;
use crate::data::RelationDataset;
use crate::graph::canonical_pair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A directly related pair ranked by PMI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmiPair {
    pub entity_a: String,
    pub entity_b: String,

    /// Number of directed relations between the two (1 or 2)
    pub observation_count: usize,

    pub pmi: f64,

    /// True when the two entities share no group tag
    pub cross_group: bool,
}

/// PMI scorer over the directed relations of a dataset.
///
/// A pair's observation count is the number of directed relations between
/// its members. An entity's appearance count is the length of its own
/// selection list plus the number of times it is selected.
pub struct PmiScorer<'a> {
    dataset: &'a RelationDataset,

    /// Observation count per canonical pair
    pair_counts: BTreeMap<(String, String), usize>,

    /// Sum of all pair counts
    total: usize,
}

impl<'a> PmiScorer<'a> {
    pub fn new(dataset: &'a RelationDataset) -> Self {
        let mut pair_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
        for (source, targets) in dataset.choosers() {
            for target in targets {
                let (a, b) = canonical_pair(source, target);
                *pair_counts.entry((a.to_string(), b.to_string())).or_insert(0) += 1;
            }
        }
        let total = pair_counts.values().sum();

        Self {
            dataset,
            pair_counts,
            total,
        }
    }

    /// Sum of all pair observation counts
    pub fn total_cooccurrences(&self) -> usize {
        self.total
    }

    /// Number of directed relations between `a` and `b`
    pub fn observation_count(&self, a: &str, b: &str) -> usize {
        let (a, b) = canonical_pair(a, b);
        self.pair_counts
            .get(&(a.to_string(), b.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Selection list length plus times selected
    pub fn appearance_count(&self, id: &str) -> usize {
        self.dataset.outgoing_count(id) + self.dataset.incoming_count(id)
    }

    fn probability(&self, id: &str) -> f64 {
        let n = self.dataset.entity_count();
        if n == 0 || self.total == 0 {
            return 0.0;
        }
        let average = self.total as f64 / n as f64;
        self.appearance_count(id) as f64 / (n as f64 * average)
    }

    fn pmi(&self, a: &str, b: &str, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let p_pair = count as f64 / self.total as f64;
        pointwise_mutual_information(p_pair, self.probability(a), self.probability(b))
    }

    /// PMI of a pair, or `None` if the two are not directly related
    pub fn score(&self, a: &str, b: &str) -> Option<f64> {
        match self.observation_count(a, b) {
            0 => None,
            count => Some(self.pmi(a, b, count)),
        }
    }

    /// Every pair with at least `min_count` observations, highest PMI first
    pub fn pairs(&self, min_count: usize) -> Vec<PmiPair> {
        let mut pairs: Vec<PmiPair> = self
            .pair_counts
            .iter()
            .filter(|(_, &count)| count >= min_count)
            .map(|((a, b), &count)| PmiPair {
                entity_a: a.clone(),
                entity_b: b.clone(),
                observation_count: count,
                pmi: self.pmi(a, b, count),
                cross_group: self.dataset.groups_disjoint(a, b),
            })
            .collect();

        // Stable sort keeps canonical pair order among equal scores
        pairs.sort_by(|x, y| y.pmi.total_cmp(&x.pmi));
        pairs
    }
}

/// Rank directly related pairs by PMI
pub fn rank_pairs(dataset: &RelationDataset, params: &PmiParams) -> Vec<PmiPair> {
    let scorer = PmiScorer::new(dataset);
    let pairs = scorer.pairs(params.min_count);
    log::info!(
        "Scored {} pairs with {} or more observations ({} co-occurrences)",
        pairs.len(),
        params.min_count,
        scorer.total_cooccurrences()
    );
    pairs
}

/// Rank mutually selecting pairs by PMI
pub fn mutual_pairs(dataset: &RelationDataset) -> Vec<PmiPair> {
    rank_pairs(dataset, &PmiParams { min_count: 2 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EntityRecord;

    fn dataset() -> RelationDataset {
        RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec!["red"], vec!["b", "c"]),
            EntityRecord::new("b", "B", vec!["red"], vec!["a"]),
            EntityRecord::new("c", "C", vec!["blue"], vec!["d"]),
            EntityRecord::new("d", "D", vec!["blue"], vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn test_observation_counts() {
        let dataset = dataset();
        let scorer = PmiScorer::new(&dataset);
        assert_eq!(scorer.total_cooccurrences(), 4);
        assert_eq!(scorer.observation_count("a", "b"), 2);
        assert_eq!(scorer.observation_count("b", "a"), 2);
        assert_eq!(scorer.observation_count("a", "c"), 1);
        assert_eq!(scorer.observation_count("b", "d"), 0);
        assert_eq!(scorer.appearance_count("a"), 3);
        assert_eq!(scorer.appearance_count("d"), 1);
    }

    #[test]
    fn test_pmi_values() {
        let dataset = dataset();
        let scorer = PmiScorer::new(&dataset);

        // total 4, N 4: P(e) = appearance / 4
        // a: 3, b: 2, c: 2, d: 1
        let ab = scorer.score("a", "b").unwrap();
        assert!((ab - (0.5f64 / (0.75 * 0.5)).log2()).abs() < 1e-12);
        let cd = scorer.score("c", "d").unwrap();
        assert!((cd - (0.25f64 / (0.5 * 0.25)).log2()).abs() < 1e-12);
        assert!(scorer.score("b", "d").is_none());
    }

    #[test]
    fn test_pmi_symmetric() {
        let dataset = dataset();
        let scorer = PmiScorer::new(&dataset);
        for (a, b) in [("a", "b"), ("a", "c"), ("c", "d")] {
            assert_eq!(scorer.score(a, b), scorer.score(b, a));
        }
    }

    #[test]
    fn test_ranking_and_filter() {
        let dataset = dataset();
        let all = rank_pairs(&dataset, &PmiParams::default());
        assert_eq!(all.len(), 3);
        for window in all.windows(2) {
            assert!(window[0].pmi >= window[1].pmi);
        }
        let ac = all.iter().find(|p| p.entity_a == "a" && p.entity_b == "c").unwrap();
        assert!(ac.cross_group);

        let mutual = mutual_pairs(&dataset);
        assert_eq!(mutual.len(), 1);
        assert_eq!(mutual[0].entity_a, "a");
        assert_eq!(mutual[0].entity_b, "b");
        assert!(!mutual[0].cross_group);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset =
            RelationDataset::from_records(vec![EntityRecord::new("a", "A", vec![], vec![])])
                .unwrap();
        assert!(rank_pairs(&dataset, &PmiParams::default()).is_empty());
    }
}
