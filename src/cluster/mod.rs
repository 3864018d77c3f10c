//! Cluster analysis module

pub mod bridges;
pub mod detection;
pub mod metrics;

use crate::graph::WeightedEdge;
use serde::{Deserialize, Serialize};

/// Role of a member inside its cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Core,
    Peripheral,
}

/// Connectivity of one member within its cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRole {
    pub id: String,

    /// Number of induced edges incident to this member
    pub degree: usize,

    /// Sum of induced edge weights incident to this member
    pub weight_sum: f64,

    /// Mean of normalised degree and normalised weight sum, in [0, 1]
    pub coreness: f64,

    pub role: Role,
}

/// A community of the weighted selection graph that passed the size and
/// density filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position in the ranking by total weight
    pub id: u32,

    /// Member ids, highest coreness first
    pub members: Vec<String>,

    /// Size of the cluster
    pub size: usize,

    /// Edges with both endpoints inside the cluster
    pub edges: Vec<WeightedEdge>,

    /// Density: actual edges / potential edges
    pub density: f64,

    /// Density of the subgraph induced by core members
    pub core_density: f64,

    /// Sum of induced edge weights
    pub total_weight: f64,

    /// Up to two most frequent group tags among members
    pub dominant_groups: Vec<String>,

    /// Per-member connectivity, in the same order as `members`
    pub roles: Vec<MemberRole>,
}

impl Cluster {
    /// Ids of the core members
    pub fn core_members(&self) -> impl Iterator<Item = &str> {
        self.roles
            .iter()
            .filter(|r| r.role == Role::Core)
            .map(|r| r.id.as_str())
    }

    /// Ids of the peripheral members
    pub fn peripheral_members(&self) -> impl Iterator<Item = &str> {
        self.roles
            .iter()
            .filter(|r| r.role == Role::Peripheral)
            .map(|r| r.id.as_str())
    }
}
