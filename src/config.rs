//! Configuration management for the selection graph analyzer

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters of the greedy modularity community detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommunityParams {
    /// Modularity resolution (gamma)
    pub resolution: f64,

    /// Maximum number of full passes over the nodes
    pub max_iterations: usize,
}

impl Default for CommunityParams {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_iterations: 100,
        }
    }
}

impl CommunityParams {
    pub fn validate(&self) -> Result<()> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(Error::invalid(
                "resolution",
                format!("must be a positive finite number, got {}", self.resolution),
            ));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid("max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}

/// Filters applied when turning communities into clusters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Minimum number of members
    pub min_size: usize,

    /// Minimum induced edge density in [0, 1]
    pub min_density: f64,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            min_size: 3,
            min_density: 0.3,
        }
    }
}

impl ClusterParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_density) {
            return Err(Error::invalid(
                "min_density",
                format!("must lie in [0, 1], got {}", self.min_density),
            ));
        }
        Ok(())
    }
}

/// Parameters of the pairwise PMI scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PmiParams {
    /// Minimum number of directed relations (1 or 2) for a pair to be kept
    pub min_count: usize,
}

impl Default for PmiParams {
    fn default() -> Self {
        Self { min_count: 1 }
    }
}

/// Parameters of the bridge detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgeParams {
    /// Minimum number of distinct choosers selecting both entities
    pub min_voters: usize,

    /// Choosers with longer selection lists are skipped
    pub max_selections: usize,
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            min_voters: 2,
            max_selections: 200,
        }
    }
}

/// Parameters of the bridge cluster detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgeClusterParams {
    /// PMI cut-off; the median bridge PMI when unset
    pub pmi_threshold: Option<f64>,

    /// Minimum number of members
    pub min_size: usize,

    /// Minimum number of induced bridge edges
    pub min_edges: usize,

    /// Detector settings for the bridge graph
    pub community: CommunityParams,
}

impl Default for BridgeClusterParams {
    fn default() -> Self {
        Self {
            pmi_threshold: None,
            min_size: 3,
            min_edges: 2,
            community: CommunityParams::default(),
        }
    }
}

/// Parameters of the similarity grouper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityParams {
    /// Minimum number of shared selections
    pub min_common: usize,

    /// Maximum number of groups returned
    pub top_n: usize,

    /// Drop groups whose cubic power mean rarity is below this value
    pub min_power_mean: Option<f64>,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            min_common: 2,
            top_n: 20,
            min_power_mean: None,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Choosers with fewer selections are ignored
    pub min_selections: usize,

    pub community: CommunityParams,
    pub cluster: ClusterParams,
    pub pmi: PmiParams,
    pub bridge: BridgeParams,
    pub bridge_cluster: BridgeClusterParams,
    pub similarity: SimilarityParams,

    /// Entity to compute similarity groups for
    pub focus: Option<String>,
}
