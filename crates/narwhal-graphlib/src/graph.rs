//! The `Network` container: nodes and edges in insertion order with id indexes.

use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Per-axis position locks. A locked axis is never mutated by the physics integrator;
/// the hierarchical layout locks the level axis this way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fixed {
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    /// Position in layout space. `None` until first positioned by a layout pass or user data.
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Positive scalar influencing force magnitude. Non-positive input is coerced to 1
    /// when the node enters the container (with a diagnostic).
    pub mass: f64,
    /// Radius used for overlap avoidance.
    pub size: f64,
    pub fixed: Fixed,
    /// Hierarchical level. Only meaningful when the hierarchical layout runs.
    pub level: Option<i32>,
    /// True when `x`/`y` came from user data rather than being computed.
    pub predefined_position: bool,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: None,
            y: None,
            mass: 1.0,
            size: 25.0,
            fixed: Fixed::default(),
            level: None,
            predefined_position: false,
        }
    }

    pub fn at(id: impl Into<String>, x: f64, y: f64) -> Self {
        let mut node = Self::new(id);
        node.x = Some(x);
        node.y = Some(y);
        node.predefined_position = true;
        node
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn is_positioned(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Overrides the default spring rest length for this edge.
    pub length: Option<f64>,
    /// When false the edge contributes no spring force.
    pub physics: bool,
}

impl Edge {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            length: None,
            physics: true,
        }
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone)]
struct NodeEntry {
    node: Node,
    /// Incident edge ids, in insertion order.
    edges: Vec<String>,
}

/// Node/edge collections keyed by id, with insertion-order iteration.
///
/// An edge is *connected* iff both endpoints resolve to nodes currently in the container.
/// Disconnected edges stay stored (the missing endpoint may arrive later) but are excluded
/// from [`Network::edge_indices`] and therefore from all force/distance math.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<NodeEntry>,
    node_index: HashMap<String, usize>,

    edges: Vec<Edge>,
    edge_index: HashMap<String, usize>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Inserts or replaces a node. Non-positive mass is coerced to 1, matching the documented
    /// exception to fail-fast configuration handling.
    pub fn add_node(&mut self, mut node: Node) -> &mut Self {
        if node.mass <= 0.0 {
            tracing::warn!(
                node = %node.id,
                mass = node.mass,
                "node mass must be positive; coercing to 1"
            );
            node.mass = 1.0;
        }

        if let Some(&idx) = self.node_index.get(node.id.as_str()) {
            self.nodes[idx].node = node;
            return self;
        }
        let idx = self.nodes.len();
        let id = node.id.clone();
        self.node_index.insert(id.clone(), idx);
        // Pick up edges that referenced this node before it existed.
        let edges = self
            .edges
            .iter()
            .filter(|e| e.from == id || e.to == id)
            .map(|e| e.id.clone())
            .collect();
        self.nodes.push(NodeEntry { node, edges });
        self
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].node)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|entry| &entry.node)
    }

    /// The active node index: every node id, in insertion order.
    pub fn node_indices(&self) -> Vec<String> {
        self.nodes.iter().map(|entry| entry.node.id.clone()).collect()
    }

    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.remove(id) else {
            return false;
        };

        // Incident edges are invalidated before the node goes away.
        let incident = std::mem::take(&mut self.nodes[idx].edges);
        for edge_id in incident {
            self.remove_edge(&edge_id);
        }

        self.nodes.remove(idx);
        self.node_index.clear();
        for (i, entry) in self.nodes.iter().enumerate() {
            self.node_index.insert(entry.node.id.clone(), i);
        }
        true
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        if let Some(&idx) = self.edge_index.get(edge.id.as_str()) {
            let old = self.edges[idx].clone();
            self.unlink_edge(&old);
            self.link_edge(&edge);
            self.edges[idx] = edge;
            return self;
        }
        let idx = self.edges.len();
        self.link_edge(&edge);
        self.edge_index.insert(edge.id.clone(), idx);
        self.edges.push(edge);
        self
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx])
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edge_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.edges[idx])
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// The active edge index: ids of connected edges, in insertion order.
    pub fn edge_indices(&self) -> Vec<String> {
        self.edges
            .iter()
            .filter(|e| self.is_connected(e))
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(idx) = self.edge_index.remove(id) else {
            return false;
        };
        let edge = self.edges.remove(idx);
        self.unlink_edge(&edge);
        self.edge_index.clear();
        for (i, e) in self.edges.iter().enumerate() {
            self.edge_index.insert(e.id.clone(), i);
        }
        true
    }

    pub fn is_connected(&self, edge: &Edge) -> bool {
        self.has_node(&edge.from) && self.has_node(&edge.to)
    }

    /// Resolves both endpoints, or `None` if either is missing.
    pub fn resolve(&self, edge_id: &str) -> Option<(&Node, &Node)> {
        let edge = self.edge(edge_id)?;
        Some((self.node(&edge.from)?, self.node(&edge.to)?))
    }

    /// Back-reference list of all edges touching this node, in insertion order.
    pub fn connected_edges(&self, id: &str) -> Vec<String> {
        self.node_index
            .get(id)
            .map(|&idx| self.nodes[idx].edges.clone())
            .unwrap_or_default()
    }

    /// Number of connected, non-self-loop edges touching this node (hub size).
    pub fn degree(&self, id: &str) -> usize {
        let Some(&idx) = self.node_index.get(id) else {
            return 0;
        };
        self.nodes[idx]
            .edges
            .iter()
            .filter_map(|edge_id| self.edge(edge_id))
            .filter(|e| self.is_connected(e) && !e.is_self_loop())
            .count()
    }

    /// Distinct neighbor ids over connected edges, insertion order, self excluded.
    pub fn neighbors(&self, id: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for edge_id in self.connected_edges(id) {
            let Some(edge) = self.edge(&edge_id) else {
                continue;
            };
            if !self.is_connected(edge) || edge.is_self_loop() {
                continue;
            }
            let other = if edge.from == id { &edge.to } else { &edge.from };
            if !out.iter().any(|x| x == other) {
                out.push(other.clone());
            }
        }
        out
    }

    fn link_edge(&mut self, edge: &Edge) {
        for endpoint in [&edge.from, &edge.to] {
            if let Some(&idx) = self.node_index.get(endpoint.as_str()) {
                if !self.nodes[idx].edges.iter().any(|e| e == &edge.id) {
                    self.nodes[idx].edges.push(edge.id.clone());
                }
            }
        }
    }

    fn unlink_edge(&mut self, edge: &Edge) {
        for endpoint in [&edge.from, &edge.to] {
            if let Some(&idx) = self.node_index.get(endpoint.as_str()) {
                self.nodes[idx].edges.retain(|e| e != &edge.id);
            }
        }
    }
}
