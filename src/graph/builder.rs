//! Weighted graph construction from selection lists

use crate::data::RelationDataset;
use crate::graph::idf::compute_idf;
use crate::graph::{canonical_pair, WeightedEdge, WeightedGraph};
use std::collections::BTreeMap;

/// Minimum rarity used when weighting an edge
pub const WEIGHT_FLOOR: f64 = 0.1;

/// Builder turning a relation dataset into an undirected weighted graph
pub struct GraphBuilder<'a> {
    dataset: &'a RelationDataset,

    /// Rarity scores for every entity
    idf: BTreeMap<String, f64>,

    /// Edges keyed by canonical pair
    edges: BTreeMap<(String, String), WeightedEdge>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(dataset: &'a RelationDataset) -> Self {
        Self {
            dataset,
            idf: compute_idf(dataset),
            edges: BTreeMap::new(),
        }
    }

    fn rarity(&self, id: &str) -> f64 {
        self.idf.get(id).copied().unwrap_or(0.0)
    }

    /// Add the edge for one directed selection; repeated pairs are ignored
    pub fn add_selection(&mut self, source: &str, target: &str) {
        let (a, b) = canonical_pair(source, target);
        let key = (a.to_string(), b.to_string());
        if self.edges.contains_key(&key) {
            return;
        }

        let edge = if self.dataset.selects(target, source) {
            let average = (self.rarity(source) + self.rarity(target)) / 2.0;
            WeightedEdge::new(source, target, 2, 2.0 * average.max(WEIGHT_FLOOR))
        } else {
            // The selected party's rarity drives the weight
            WeightedEdge::new(source, target, 1, self.rarity(target).max(WEIGHT_FLOOR))
        };
        self.edges.insert(key, edge);
    }

    /// Build the graph
    pub fn build(mut self) -> WeightedGraph {
        let dataset = self.dataset;
        for (source, targets) in dataset.choosers() {
            for target in targets {
                self.add_selection(source, target);
            }
        }

        WeightedGraph {
            edges: self.edges.into_values().collect(),
            idf: self.idf,
        }
    }
}

/// Build the undirected weighted graph for a dataset
pub fn build_weighted_graph(dataset: &RelationDataset) -> WeightedGraph {
    let graph = GraphBuilder::new(dataset).build();
    log::info!(
        "Built weighted graph with {} edges ({} mutual)",
        graph.edges.len(),
        graph.mutual_edge_count()
    );
    graph
}
