//! All-pairs shortest path distances over the active node/edge index.
//!
//! Distances are hop counts over the undirected view of the graph. Unreachable pairs carry
//! the explicit sentinel [`f64::INFINITY`] (never 0, 1, or `NaN`), so downstream consumers
//! (Kamada-Kawai) can skip cross-component pairs instead of poisoning positions.

use crate::graphlib::Network;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    ids: Vec<String>,
    index: FxHashMap<String, usize>,
    dist: Vec<f64>,
}

impl DistanceMatrix {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node ids in matrix order (the network's insertion order at solve time).
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[i * self.ids.len() + j]
    }

    pub fn get_by_id(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(self.index_of(a)?, self.index_of(b)?))
    }

    pub fn is_reachable(&self, i: usize, j: usize) -> bool {
        self.get(i, j).is_finite()
    }
}

/// Floyd-Warshall over the connected edges of `network`, O(n³). Self-loops contribute no
/// distance; every edge counts as one hop in both directions.
pub fn solve(network: &Network) -> DistanceMatrix {
    let ids = network.node_indices();
    let n = ids.len();
    let index: FxHashMap<String, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();

    let mut dist = vec![f64::INFINITY; n * n];
    for i in 0..n {
        dist[i * n + i] = 0.0;
    }

    for edge_id in network.edge_indices() {
        let Some(edge) = network.edge(&edge_id) else {
            continue;
        };
        if edge.is_self_loop() {
            continue;
        }
        let (Some(&a), Some(&b)) = (index.get(&edge.from), index.get(&edge.to)) else {
            continue;
        };
        dist[a * n + b] = 1.0;
        dist[b * n + a] = 1.0;
    }

    for k in 0..n {
        for i in 0..n {
            let dik = dist[i * n + k];
            if !dik.is_finite() {
                continue;
            }
            for j in 0..n {
                let through = dik + dist[k * n + j];
                if through < dist[i * n + j] {
                    dist[i * n + j] = through;
                    dist[j * n + i] = through;
                }
            }
        }
    }

    DistanceMatrix { ids, index, dist }
}

#[cfg(test)]
mod tests {
    use crate::graphlib::{Edge, Network, Node};

    fn path_graph(n: usize) -> Network {
        let mut network = Network::new();
        for i in 0..n {
            network.add_node(Node::new(format!("n{i}")));
        }
        for i in 1..n {
            network.add_edge(Edge::new(
                format!("e{i}"),
                format!("n{}", i - 1),
                format!("n{i}"),
            ));
        }
        network
    }

    #[test]
    fn path_distances_are_hop_counts() {
        let m = super::solve(&path_graph(4));
        assert_eq!(m.get_by_id("n0", "n3"), Some(3.0));
        assert_eq!(m.get_by_id("n1", "n3"), Some(2.0));
    }

    #[test]
    fn unreachable_pairs_are_infinite_not_nan() {
        let mut network = path_graph(2);
        network.add_node(Node::new("island"));
        let m = super::solve(&network);
        let d = m.get_by_id("n0", "island").unwrap();
        assert!(d.is_infinite());
        assert!(!d.is_nan());
        let i = m.index_of("n0").unwrap();
        let j = m.index_of("island").unwrap();
        assert!(!m.is_reachable(i, j));
    }
}
