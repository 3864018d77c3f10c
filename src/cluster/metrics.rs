//! Cluster post-processing: filtering, density and member roles

use crate::cluster::detection::Partition;
use crate::cluster::{Cluster, MemberRole, Role};
use crate::config::ClusterParams;
use crate::data::RelationDataset;
use crate::error::Result;
use crate::graph::{WeightedEdge, WeightedGraph};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Calculate density (actual edges / potential undirected edges)
pub fn calculate_density(member_count: usize, edge_count: usize) -> f64 {
    if member_count <= 1 {
        return 1.0; // By convention, singleton clusters have density 1
    }
    let potential = member_count * (member_count - 1) / 2;
    edge_count as f64 / potential as f64
}

/// Compute degree, weight sum, coreness and role for every member.
///
/// The role threshold is the coreness at the middle index of the descending
/// list; members at or above it are core, so ties at the threshold can make
/// more than half of the members core. Returned roles are sorted by
/// coreness descending, then by id.
pub fn assign_roles(members: &[String], edges: &[WeightedEdge]) -> Vec<MemberRole> {
    if members.is_empty() {
        return Vec::new();
    }

    let mut degree: HashMap<&str, usize> = members.iter().map(|m| (m.as_str(), 0)).collect();
    let mut weight: HashMap<&str, f64> = members.iter().map(|m| (m.as_str(), 0.0)).collect();
    for edge in edges {
        for end in [edge.source.as_str(), edge.target.as_str()] {
            if let Some(d) = degree.get_mut(end) {
                *d += 1;
            }
            if let Some(w) = weight.get_mut(end) {
                *w += edge.weight;
            }
        }
    }

    let max_degree = degree.values().copied().max().unwrap_or(0);
    let max_weight = weight.values().copied().fold(0.0, f64::max);

    let mut roles: Vec<MemberRole> = members
        .iter()
        .map(|id| {
            let d = degree[id.as_str()];
            let w = weight[id.as_str()];
            let nd = if max_degree > 0 { d as f64 / max_degree as f64 } else { 0.0 };
            let nw = if max_weight > 0.0 { w / max_weight } else { 0.0 };
            MemberRole {
                id: id.clone(),
                degree: d,
                weight_sum: w,
                coreness: (nd + nw) / 2.0,
                role: Role::Peripheral,
            }
        })
        .collect();

    roles.sort_by(|a, b| b.coreness.total_cmp(&a.coreness).then_with(|| a.id.cmp(&b.id)));

    let threshold = roles[roles.len() / 2].coreness;
    for role in &mut roles {
        if role.coreness >= threshold {
            role.role = Role::Core;
        }
    }

    roles
}

/// Top two group tags by frequency across members; ties break alphabetically
pub fn dominant_groups(dataset: &RelationDataset, members: &[String]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in members {
        if let Some(entity) = dataset.entity(id) {
            for group in &entity.groups {
                *counts.entry(group.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(2).map(|(g, _)| g.to_string()).collect()
}

/// Turn a partition of the weighted graph into filtered, annotated clusters.
///
/// Communities smaller than `min_size` or sparser than `min_density` are
/// dropped. Clusters are returned heaviest first.
pub fn build_clusters(
    graph: &WeightedGraph,
    partition: &Partition,
    dataset: &RelationDataset,
    params: &ClusterParams,
) -> Result<Vec<Cluster>> {
    params.validate()?;
    if partition.is_empty() || graph.edges.is_empty() {
        return Ok(Vec::new());
    }

    // Bucket induced edges by community in one sweep
    let mut induced: HashMap<usize, Vec<WeightedEdge>> = HashMap::new();
    for edge in &graph.edges {
        let a = partition.community_of(&edge.source);
        let b = partition.community_of(&edge.target);
        if let (Some(a), Some(b)) = (a, b) {
            if a == b {
                induced.entry(a).or_default().push(edge.clone());
            }
        }
    }

    let mut clusters = Vec::new();
    for (community, members) in partition.communities() {
        if members.len() < params.min_size {
            continue;
        }

        let edges = induced.remove(&community).unwrap_or_default();
        let density = calculate_density(members.len(), edges.len());
        if density < params.min_density {
            log::debug!(
                "Dropping community {} ({} members): density {:.3} below {}",
                community,
                members.len(),
                density,
                params.min_density
            );
            continue;
        }

        let roles = assign_roles(&members, &edges);
        let core: HashSet<&str> = roles
            .iter()
            .filter(|r| r.role == Role::Core)
            .map(|r| r.id.as_str())
            .collect();
        let core_edges = edges
            .iter()
            .filter(|e| core.contains(e.source.as_str()) && core.contains(e.target.as_str()))
            .count();

        clusters.push(Cluster {
            id: 0,
            members: roles.iter().map(|r| r.id.clone()).collect(),
            size: members.len(),
            total_weight: edges.iter().map(|e| e.weight).sum(),
            density,
            core_density: calculate_density(core.len(), core_edges),
            dominant_groups: dominant_groups(dataset, &members),
            edges,
            roles,
        });
    }

    clusters.sort_by(|a, b| {
        b.total_weight
            .total_cmp(&a.total_weight)
            .then_with(|| first_id(a).cmp(first_id(b)))
    });
    for (i, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = i as u32;
    }

    log::info!(
        "Kept {} clusters with {} or more members and density >= {}",
        clusters.len(),
        params.min_size,
        params.min_density
    );

    Ok(clusters)
}

fn first_id(cluster: &Cluster) -> &str {
    cluster.members.iter().min().map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::detection::detect_communities;
    use crate::config::CommunityParams;
    use crate::data::EntityRecord;
    use crate::graph::build_weighted_graph;

    fn edge(a: &str, b: &str, w: f64) -> WeightedEdge {
        WeightedEdge::new(a, b, 1, w)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn single_community(list: &[&str]) -> Partition {
        Partition {
            assignment: list.iter().map(|id| (id.to_string(), 0)).collect(),
            community_count: 1,
            passes: 1,
            moves: 0,
        }
    }

    #[test]
    fn test_density() {
        assert_eq!(calculate_density(3, 3), 1.0);
        assert_eq!(calculate_density(4, 3), 0.5);
        assert_eq!(calculate_density(1, 0), 1.0);
    }

    #[test]
    fn test_star_roles() {
        // Hub connected to three leaves
        let edges = vec![
            edge("hub", "x", 1.0),
            edge("hub", "y", 1.0),
            edge("hub", "z", 1.0),
        ];
        let roles = assign_roles(&ids(&["hub", "x", "y", "z"]), &edges);

        assert_eq!(roles[0].id, "hub");
        assert_eq!(roles[0].coreness, 1.0);
        assert_eq!(roles[0].degree, 3);
        // Leaves tie at the threshold, so every member is core
        for role in &roles {
            assert!((0.0..=1.0).contains(&role.coreness));
            assert_eq!(role.role, Role::Core);
        }
    }

    #[test]
    fn test_median_split() {
        let edges = vec![
            edge("a", "b", 1.0),
            edge("b", "c", 3.0),
            edge("c", "d", 2.0),
        ];
        let roles = assign_roles(&ids(&["a", "b", "c", "d"]), &edges);

        let order: Vec<&str> = roles.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "d", "a"]);
        // Threshold is the coreness at index 2 (d), inclusive
        let core: Vec<&str> = roles
            .iter()
            .filter(|r| r.role == Role::Core)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(core, vec!["c", "b", "d"]);
        assert_eq!(roles[3].role, Role::Peripheral);
        assert!((roles[3].coreness - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_dominant_groups() {
        let dataset = RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec!["red", "blue"], vec![]),
            EntityRecord::new("b", "B", vec!["blue"], vec![]),
            EntityRecord::new("c", "C", vec!["green", "red"], vec![]),
            EntityRecord::new("d", "D", vec!["amber"], vec![]),
        ])
        .unwrap();
        let groups = dominant_groups(&dataset, &ids(&["a", "b", "c", "d"]));
        assert_eq!(groups, vec!["blue", "red"]);
    }

    #[test]
    fn test_full_mutual_triangle() {
        let dataset = RelationDataset::from_records(vec![
            EntityRecord::new("a", "A", vec!["g"], vec!["b", "c"]),
            EntityRecord::new("b", "B", vec!["g"], vec!["a", "c"]),
            EntityRecord::new("c", "C", vec!["h"], vec!["a", "b"]),
        ])
        .unwrap();
        let graph = build_weighted_graph(&dataset);
        let partition =
            detect_communities(&graph.compressed(), &CommunityParams::default()).unwrap();
        let clusters =
            build_clusters(&graph, &partition, &dataset, &ClusterParams::default()).unwrap();

        assert_eq!(clusters.len(), 1);
        let cluster = &clusters[0];
        assert_eq!(cluster.size, 3);
        assert_eq!(cluster.edges.len(), 3);
        assert_eq!(cluster.density, 1.0);
        assert_eq!(cluster.core_density, 1.0);
        assert_eq!(cluster.dominant_groups, vec!["g", "h"]);
        assert_eq!(cluster.core_members().count(), 3);
        assert_eq!(cluster.peripheral_members().count(), 0);
    }

    #[test]
    fn test_core_density_of_proper_core() {
        // Triangle a-b-c with a tail a-d-e
        let graph = WeightedGraph {
            edges: vec![
                edge("a", "b", 1.0),
                edge("a", "c", 1.0),
                edge("b", "c", 1.0),
                edge("a", "d", 1.0),
                edge("d", "e", 1.0),
            ],
            idf: BTreeMap::new(),
        };
        let partition = single_community(&["a", "b", "c", "d", "e"]);
        let clusters = build_clusters(
            &graph,
            &partition,
            &RelationDataset::default(),
            &ClusterParams::default(),
        )
        .unwrap();

        assert_eq!(clusters.len(), 1);
        let cluster = &clusters[0];
        assert_eq!(cluster.density, 0.5);
        // Core is a, b, c, d: four of its six possible edges are present
        assert!((cluster.core_density - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(cluster.members, vec!["a", "b", "c", "d", "e"]);

        let peripheral: Vec<&str> = cluster.peripheral_members().collect();
        assert_eq!(peripheral, vec!["e"]);
        assert!((cluster.roles[4].coreness - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_small_and_sparse_communities_dropped() {
        let graph = WeightedGraph {
            edges: vec![edge("a", "b", 1.0)],
            idf: BTreeMap::new(),
        };
        let dataset = RelationDataset::default();
        let partition =
            detect_communities(&graph.compressed(), &CommunityParams::default()).unwrap();
        let clusters =
            build_clusters(&graph, &partition, &dataset, &ClusterParams::default()).unwrap();
        assert!(clusters.is_empty());

        // A four-node path has density 0.5; require more
        let graph = WeightedGraph {
            edges: vec![edge("a", "b", 1.0), edge("b", "c", 1.0), edge("c", "d", 1.0)],
            idf: BTreeMap::new(),
        };
        let partition = single_community(&["a", "b", "c", "d"]);
        let strict = ClusterParams {
            min_size: 3,
            min_density: 0.6,
        };
        assert!(build_clusters(&graph, &partition, &dataset, &strict).unwrap().is_empty());
        let loose = ClusterParams {
            min_size: 3,
            min_density: 0.5,
        };
        assert_eq!(build_clusters(&graph, &partition, &dataset, &loose).unwrap().len(), 1);
    }
}
