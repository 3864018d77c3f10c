//! Community detection restricted to high-signal bridge pairs

use crate::association::BridgePair;
use crate::cluster::detection::detect_communities;
use crate::config::BridgeClusterParams;
use crate::data::RelationDataset;
use crate::error::Result;
use crate::graph::CompressedGraph;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median};
use std::collections::{BTreeSet, HashMap};

/// Share of the edge weight taken by the normalised voter count
const VOTER_WEIGHT: f64 = 0.6;
/// Share of the edge weight taken by the normalised PMI
const PMI_WEIGHT: f64 = 0.4;

/// A community found in the bridge-only graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeCluster {
    /// Position in the ranking by score
    pub id: u32,

    /// Member ids, ascending
    pub members: Vec<String>,

    /// Bridge pairs with both endpoints inside the cluster
    pub edges: Vec<BridgePair>,

    /// Distinct group tags across members
    pub groups: Vec<String>,

    /// Distinct choosers voting for any induced pair
    pub voters: Vec<String>,

    /// Group count times voter count
    pub score: usize,
}

/// Median PMI over a set of bridge pairs (0 for an empty set)
pub fn median_pmi(pairs: &[BridgePair]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let values: Vec<f64> = pairs.iter().map(|p| p.pmi).collect();
    Data::new(values).median()
}

/// Edge weight of a bridge pair relative to the maxima of the filtered set
fn bridge_weight(pair: &BridgePair, max_voters: usize, max_pmi: f64) -> f64 {
    let voters = pair.voter_count as f64 / max_voters as f64;
    let pmi = if max_pmi > 0.0 {
        pair.pmi.max(0.0) / max_pmi
    } else {
        0.0
    };
    VOTER_WEIGHT * voters + PMI_WEIGHT * pmi
}

/// Cluster the graph formed by bridge pairs with PMI at or above the
/// threshold, ranking clusters that span many groups with broad support
/// first.
pub fn detect_bridge_clusters(
    pairs: &[BridgePair],
    dataset: &RelationDataset,
    params: &BridgeClusterParams,
) -> Result<Vec<BridgeCluster>> {
    params.community.validate()?;
    if pairs.is_empty() {
        return Ok(Vec::new());
    }

    let threshold = params.pmi_threshold.unwrap_or_else(|| median_pmi(pairs));
    let strong: Vec<&BridgePair> = pairs.iter().filter(|p| p.pmi >= threshold).collect();
    log::debug!(
        "Keeping {} of {} bridge pairs at PMI >= {:.3}",
        strong.len(),
        pairs.len(),
        threshold
    );
    if strong.is_empty() {
        return Ok(Vec::new());
    }

    let max_voters = strong.iter().map(|p| p.voter_count).max().unwrap_or(1).max(1);
    let max_pmi = strong.iter().map(|p| p.pmi).fold(f64::MIN, f64::max);

    let graph = CompressedGraph::from_edges(strong.iter().map(|p| {
        (
            p.entity_a.as_str(),
            p.entity_b.as_str(),
            bridge_weight(p, max_voters, max_pmi),
        )
    }));
    let partition = detect_communities(&graph, &params.community)?;

    let mut induced: HashMap<usize, Vec<BridgePair>> = HashMap::new();
    for pair in &strong {
        let a = partition.community_of(&pair.entity_a);
        let b = partition.community_of(&pair.entity_b);
        if let (Some(a), Some(b)) = (a, b) {
            if a == b {
                induced.entry(a).or_default().push((*pair).clone());
            }
        }
    }

    let mut clusters = Vec::new();
    for (community, members) in partition.communities() {
        let edges = induced.remove(&community).unwrap_or_default();
        if members.len() < params.min_size || edges.len() < params.min_edges {
            continue;
        }

        let groups: BTreeSet<String> = members
            .iter()
            .filter_map(|id| dataset.entity(id))
            .flat_map(|entity| entity.groups.iter().cloned())
            .collect();
        let voters: BTreeSet<String> = edges
            .iter()
            .flat_map(|pair| pair.voters.iter().cloned())
            .collect();

        clusters.push(BridgeCluster {
            id: 0,
            score: groups.len() * voters.len(),
            members,
            edges,
            groups: groups.into_iter().collect(),
            voters: voters.into_iter().collect(),
        });
    }

    clusters.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.members.cmp(&b.members)));
    for (i, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = i as u32;
    }

    log::info!("Found {} bridge clusters", clusters.len());
    Ok(clusters)
}
