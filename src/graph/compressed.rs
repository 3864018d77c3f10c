//! Index-addressed weighted adjacency

use std::collections::BTreeSet;

/// Compressed sparse representation of an undirected weighted graph.
///
/// Nodes are addressed by a stable integer index (ids sorted ascending), so
/// every per-node array has exactly one entry per node by construction.
#[derive(Debug, Clone, Default)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: offsets[i] to offsets[i+1] is the neighbour range of node i
    pub offsets: Vec<u32>,

    /// Concatenated neighbour lists, each sorted by index
    pub neighbors: Vec<u32>,

    /// Edge weight parallel to `neighbors`
    pub weights: Vec<f64>,

    /// Mapping from node index to entity id
    pub node_ids: Vec<String>,

    /// Sum of incident edge weights per node
    pub node_weights: Vec<f64>,

    /// Sum of all edge weights (each undirected edge counted once)
    pub total_weight: f64,
}

impl CompressedGraph {
    /// Build from undirected edges. Self-loops are skipped and parallel
    /// edges have their weights summed.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64)>,
    {
        let edges: Vec<(&str, &str, f64)> = edges
            .into_iter()
            .filter(|(a, b, _)| a != b)
            .collect();

        let ids: BTreeSet<&str> = edges.iter().flat_map(|(a, b, _)| [*a, *b]).collect();
        let node_ids: Vec<String> = ids.into_iter().map(String::from).collect();
        let node_count = node_ids.len();

        let mut adjacency: Vec<Vec<(u32, f64)>> = vec![Vec::new(); node_count];
        let mut total_weight = 0.0;
        for (a, b, w) in edges {
            let ia = index_in(&node_ids, a);
            let ib = index_in(&node_ids, b);
            adjacency[ia].push((ib as u32, w));
            adjacency[ib].push((ia as u32, w));
            total_weight += w;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut neighbors = Vec::new();
        let mut weights = Vec::new();
        let mut node_weights = Vec::with_capacity(node_count);
        offsets.push(0);

        for list in &mut adjacency {
            list.sort_by_key(|&(n, _)| n);
            let mut merged: Vec<(u32, f64)> = Vec::with_capacity(list.len());
            for &(n, w) in list.iter() {
                match merged.last_mut() {
                    Some(last) if last.0 == n => last.1 += w,
                    _ => merged.push((n, w)),
                }
            }
            node_weights.push(merged.iter().map(|&(_, w)| w).sum());
            for (n, w) in merged {
                neighbors.push(n);
                weights.push(w);
            }
            offsets.push(neighbors.len() as u32);
        }

        Self {
            node_count,
            offsets,
            neighbors,
            weights,
            node_ids,
            node_weights,
            total_weight,
        }
    }

    /// Neighbours of a node with the connecting edge weight, by ascending index
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        self.neighbors[start..end]
            .iter()
            .zip(&self.weights[start..end])
            .map(|(&n, &w)| (n as usize, w))
    }

    /// Index of an entity id, if it is a node
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_ids.binary_search_by(|probe| probe.as_str().cmp(id)).ok()
    }

    /// Number of distinct undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// Get degree of a node
    pub fn degree(&self, node: usize) -> usize {
        (self.offsets[node + 1] - self.offsets[node]) as usize
    }
}

fn index_in(node_ids: &[String], id: &str) -> usize {
    node_ids
        .binary_search_by(|probe| probe.as_str().cmp(id))
        .expect("edge endpoint missing from node index")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges() {
        let graph = CompressedGraph::from_edges(vec![
            ("b", "c", 1.0),
            ("a", "b", 2.0),
            ("c", "c", 5.0),
        ]);

        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.node_ids, vec!["a", "b", "c"]);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.total_weight, 3.0);
        assert_eq!(graph.node_weights, vec![2.0, 3.0, 1.0]);

        let b = graph.index_of("b").unwrap();
        let neighbours: Vec<(usize, f64)> = graph.neighbors(b).collect();
        assert_eq!(neighbours, vec![(0, 2.0), (2, 1.0)]);
        assert_eq!(graph.degree(b), 2);
        assert!(graph.index_of("z").is_none());
    }

    #[test]
    fn test_parallel_edges_merge() {
        let graph = CompressedGraph::from_edges(vec![("a", "b", 1.0), ("b", "a", 0.5)]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_weights, vec![1.5, 1.5]);
        assert_eq!(graph.total_weight, 1.5);
    }

    #[test]
    fn test_empty() {
        let graph = CompressedGraph::from_edges(Vec::<(&str, &str, f64)>::new());
        assert_eq!(graph.node_count, 0);
        assert_eq!(graph.offsets, vec![0]);
    }
}
