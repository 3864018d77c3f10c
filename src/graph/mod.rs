//! Graph representation and construction module

pub mod builder;
pub mod compressed;
pub mod idf;

pub use builder::build_weighted_graph;
pub use compressed::CompressedGraph;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order two ids so an unordered pair always has one representation
pub fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected weighted edge between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    /// Smaller endpoint id
    pub source: String,

    /// Larger endpoint id
    pub target: String,

    /// 2 when both directed relations exist, 1 otherwise
    pub directionality: u8,

    /// Strictly positive weight
    pub weight: f64,
}

impl WeightedEdge {
    /// Create an edge, canonicalising the endpoint order
    pub fn new(a: &str, b: &str, directionality: u8, weight: f64) -> Self {
        assert!(a != b, "self-loop edge on {}", a);
        assert!(weight > 0.0, "edge weight must be positive, got {}", weight);
        let (source, target) = canonical_pair(a, b);
        Self {
            source: source.to_string(),
            target: target.to_string(),
            directionality,
            weight,
        }
    }

    /// Whether both endpoints select each other
    pub fn is_mutual(&self) -> bool {
        self.directionality == 2
    }

    /// Whether `id` is one of the endpoints
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// Undirected selection graph plus the IDF map used to weight it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedGraph {
    /// Deduplicated edges, sorted by canonical key
    pub edges: Vec<WeightedEdge>,

    /// Rarity score for every entity
    pub idf: BTreeMap<String, f64>,
}

impl WeightedGraph {
    /// Total weight over all edges
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Number of mutual (directionality 2) edges
    pub fn mutual_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_mutual()).count()
    }

    /// Arena view used by the community detector
    pub fn compressed(&self) -> CompressedGraph {
        CompressedGraph::from_edges(
            self.edges
                .iter()
                .map(|e| (e.source.as_str(), e.target.as_str(), e.weight)),
        )
    }
}
