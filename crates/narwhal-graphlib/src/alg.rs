//! Small graph algorithms over [`Network`] used by the layout engine.

use crate::Network;
use std::collections::{BTreeSet, VecDeque};

/// Connected components over the undirected view of the graph, one `Vec` per component.
/// Node order inside a component is BFS discovery order; components appear in the order
/// of their first node.
pub fn components(network: &Network) -> Vec<Vec<String>> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in network.node_indices() {
        if !seen.insert(start.clone()) {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut q: VecDeque<String> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            comp.push(v.clone());
            for n in network.neighbors(&v) {
                if seen.insert(n.clone()) {
                    q.push_back(n);
                }
            }
        }
        out.push(comp);
    }

    out
}

/// Node ids sorted by descending degree (hub size), ties broken by insertion order.
pub fn hubsize_order(network: &Network) -> Vec<String> {
    let mut ids = network.node_indices();
    let mut order: Vec<(usize, usize, String)> = ids
        .drain(..)
        .enumerate()
        .map(|(i, id)| (network.degree(&id), i, id))
        .collect();
    order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    order.into_iter().map(|(_, _, id)| id).collect()
}

/// Ids of nodes with no incoming connected edge (self-loops ignored).
pub fn roots(network: &Network) -> Vec<String> {
    let mut has_incoming: BTreeSet<String> = BTreeSet::new();
    for edge_id in network.edge_indices() {
        if let Some(edge) = network.edge(&edge_id) {
            if !edge.is_self_loop() {
                has_incoming.insert(edge.to.clone());
            }
        }
    }
    network
        .node_indices()
        .into_iter()
        .filter(|id| !has_incoming.contains(id))
        .collect()
}

/// Ids of nodes with no outgoing connected edge (self-loops ignored).
pub fn leaves(network: &Network) -> Vec<String> {
    let mut has_outgoing: BTreeSet<String> = BTreeSet::new();
    for edge_id in network.edge_indices() {
        if let Some(edge) = network.edge(&edge_id) {
            if !edge.is_self_loop() {
                has_outgoing.insert(edge.from.clone());
            }
        }
    }
    network
        .node_indices()
        .into_iter()
        .filter(|id| !has_outgoing.contains(id))
        .collect()
}
