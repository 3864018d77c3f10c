//! End-to-end analysis over one dataset snapshot

use crate::association::{detect_bridges, rank_pairs, BridgePair, PmiPair};
use crate::cluster::bridges::{detect_bridge_clusters, BridgeCluster};
use crate::cluster::detection::detect_communities;
use crate::cluster::metrics::build_clusters;
use crate::cluster::Cluster;
use crate::config::AnalysisConfig;
use crate::data::preprocessing::filter_by_min_selections;
use crate::data::RelationDataset;
use crate::error::Result;
use crate::graph::{build_weighted_graph, WeightedGraph};
use crate::similarity::{similar_entities, SimilarityGroup};
use crate::stats::{entity_stats, EntityStats};
use serde::{Deserialize, Serialize};

/// Headline counts of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub entity_count: usize,
    pub chooser_count: usize,
    pub relation_count: usize,
    pub edge_count: usize,
    pub mutual_edge_count: usize,
    pub cluster_count: usize,
    pub clustered_entities: usize,
    pub pmi_pair_count: usize,
    pub bridge_pair_count: usize,
    pub bridge_cluster_count: usize,
}

/// Everything the engine derives from a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,
    pub entities: Vec<EntityStats>,
    pub graph: WeightedGraph,
    pub clusters: Vec<Cluster>,
    pub pmi_pairs: Vec<PmiPair>,
    pub bridges: Vec<BridgePair>,
    pub bridge_clusters: Vec<BridgeCluster>,

    /// Present when a focal entity was configured
    pub similar: Option<Vec<SimilarityGroup>>,
}

/// Output of the graph and community stage
#[derive(Debug, Clone)]
pub struct ClusterStage {
    pub graph: WeightedGraph,
    pub clusters: Vec<Cluster>,
}

/// Output of the pairwise association stage
#[derive(Debug, Clone)]
pub struct AssociationStage {
    pub pmi_pairs: Vec<PmiPair>,
    pub bridges: Vec<BridgePair>,
    pub bridge_clusters: Vec<BridgeCluster>,
}

/// Apply dataset-level filters from the configuration
pub fn prepare(dataset: &RelationDataset, config: &AnalysisConfig) -> RelationDataset {
    if config.min_selections > 1 {
        filter_by_min_selections(dataset, config.min_selections)
    } else {
        dataset.clone()
    }
}

/// Build the weighted graph and its filtered clusters
pub fn run_clustering(dataset: &RelationDataset, config: &AnalysisConfig) -> Result<ClusterStage> {
    let graph = build_weighted_graph(dataset);
    let partition = detect_communities(&graph.compressed(), &config.community)?;
    let clusters = build_clusters(&graph, &partition, dataset, &config.cluster)?;
    Ok(ClusterStage { graph, clusters })
}

/// Score pairs by PMI and find bridges and bridge clusters
pub fn run_associations(
    dataset: &RelationDataset,
    config: &AnalysisConfig,
) -> Result<AssociationStage> {
    let pmi_pairs = rank_pairs(dataset, &config.pmi);
    let bridges = detect_bridges(dataset, &config.bridge);
    let bridge_clusters = detect_bridge_clusters(&bridges, dataset, &config.bridge_cluster)?;
    Ok(AssociationStage {
        pmi_pairs,
        bridges,
        bridge_clusters,
    })
}

/// Combine stage outputs with per-entity statistics and similarity groups
pub fn assemble(
    dataset: &RelationDataset,
    config: &AnalysisConfig,
    clustering: ClusterStage,
    associations: AssociationStage,
) -> Result<AnalysisReport> {
    let ClusterStage { graph, clusters } = clustering;
    let AssociationStage {
        pmi_pairs,
        bridges,
        bridge_clusters,
    } = associations;

    let entities = entity_stats(dataset, &graph.idf);
    let similar = match &config.focus {
        Some(focus) => Some(similar_entities(dataset, &graph.idf, focus, &config.similarity)?),
        None => None,
    };

    let summary = AnalysisSummary {
        entity_count: dataset.entity_count(),
        chooser_count: dataset.chooser_count(),
        relation_count: dataset.relation_count(),
        edge_count: graph.edges.len(),
        mutual_edge_count: graph.mutual_edge_count(),
        cluster_count: clusters.len(),
        clustered_entities: clusters.iter().map(|c| c.size).sum(),
        pmi_pair_count: pmi_pairs.len(),
        bridge_pair_count: bridges.len(),
        bridge_cluster_count: bridge_clusters.len(),
    };

    Ok(AnalysisReport {
        summary,
        entities,
        graph,
        clusters,
        pmi_pairs,
        bridges,
        bridge_clusters,
        similar,
    })
}

/// Run every stage sequentially
pub fn analyze(dataset: &RelationDataset, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let dataset = prepare(dataset, config);
    let clustering = run_clustering(&dataset, config)?;
    let associations = run_associations(&dataset, config)?;
    assemble(&dataset, config, clustering, associations)
}
