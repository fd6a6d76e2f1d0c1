use narwhal::graphlib::{Edge, Network, Node};
use narwhal::{LayoutEngine, LayoutEvent, LayoutOptions, ReductionHook};

fn star(n: usize) -> Network {
    let mut network = Network::new();
    network.add_node(Node::new("hub"));
    for i in 0..n {
        network.add_node(Node::new(format!("leaf{i}")));
        network.add_edge(Edge::new(format!("e{i}"), "hub", format!("leaf{i}")));
    }
    network
}

fn engine(mutate: impl FnOnce(&mut LayoutOptions)) -> LayoutEngine {
    let mut options = LayoutOptions {
        random_seed: Some(99),
        ..Default::default()
    };
    mutate(&mut options);
    LayoutEngine::new(options)
}

#[test]
fn scatter_places_unpositioned_nodes_on_the_circle() {
    let mut network = star(4);
    let mut layout = engine(|o| o.improved_layout = false);
    layout.position_initially(&mut network, None).unwrap();

    let radius = network.node_count() as f64 + 50.0;
    for node in network.nodes() {
        let (x, y) = (node.x.unwrap(), node.y.unwrap());
        let r = (x * x + y * y).sqrt();
        assert!((r - radius).abs() < 1e-9, "{} sits at radius {r}", node.id);
    }
}

#[test]
fn scatter_is_deterministic_per_seed() {
    let run = |seed: u64| {
        let mut network = star(6);
        let mut layout = engine(|o| {
            o.random_seed = Some(seed);
            o.improved_layout = false;
        });
        layout.position_initially(&mut network, None).unwrap();
        network
            .nodes()
            .map(|n| (n.x.unwrap(), n.y.unwrap()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(5), run(5));
    assert_ne!(run(5), run(6));
}

#[test]
fn predefined_positions_are_never_overwritten() {
    let mut network = star(3);
    network.add_node(Node::at("pinned", 12.0, 34.0));

    let mut layout = engine(|_| {});
    layout.position_initially(&mut network, None).unwrap();

    let pinned = network.node("pinned").unwrap();
    assert_eq!((pinned.x, pinned.y), (Some(12.0), Some(34.0)));
}

#[test]
fn improved_layout_spreads_a_small_graph() {
    let mut network = star(5);
    let mut layout = engine(|_| {});
    layout.position_initially(&mut network, None).unwrap();
    assert!(layout.drain_events().is_empty());

    // Kamada-Kawai should put every leaf roughly one target length from the hub.
    let hub = network.node("hub").unwrap();
    let (hx, hy) = (hub.x.unwrap(), hub.y.unwrap());
    for i in 0..5 {
        let leaf = network.node(&format!("leaf{i}")).unwrap();
        let d = ((leaf.x.unwrap() - hx).powi(2) + (leaf.y.unwrap() - hy).powi(2)).sqrt();
        assert!(
            d > 50.0 && d < 400.0,
            "leaf{i} ended {d} from the hub"
        );
    }
}

#[test]
fn mostly_predefined_graphs_skip_the_refinement() {
    let mut network = Network::new();
    network.add_node(Node::at("a", 0.0, 0.0));
    network.add_node(Node::at("b", 10.0, 0.0));
    network.add_node(Node::at("c", 20.0, 0.0));
    network.add_node(Node::new("d"));
    network.add_edge(Edge::new("ab", "a", "b"));
    network.add_edge(Edge::new("cd", "c", "d"));

    let mut layout = engine(|_| {});
    layout.position_initially(&mut network, None).unwrap();

    let events = layout.drain_events();
    assert!(
        events.iter().any(|e| matches!(
            e,
            LayoutEvent::ImprovedLayoutSkipped {
                position_defined: 3,
                total: 4
            }
        )),
        "unexpected events: {events:?}"
    );
    // Predefined nodes stayed; the stray node still got scattered.
    assert_eq!(network.node("a").unwrap().x, Some(0.0));
    assert!(network.node("d").unwrap().is_positioned());
}

#[test]
fn oversized_graph_without_hook_reports_and_falls_back() {
    let mut network = star(10);
    let mut layout = engine(|o| o.cluster_threshold = 5);
    layout.position_initially(&mut network, None).unwrap();

    let events = layout.drain_events();
    assert!(
        events.iter().any(|e| matches!(
            e,
            LayoutEvent::ImprovedLayoutAborted { remaining: 11, threshold: 5 }
        )),
        "unexpected events: {events:?}"
    );
    // The fallback is the plain scatter; every node still has a position.
    for node in network.nodes() {
        assert!(node.is_positioned());
    }
}

/// Hook that claims to work but never shrinks anything.
struct StallingHook {
    rounds: usize,
    expanded: bool,
}

impl ReductionHook for StallingHook {
    fn reduce_round(&mut self, network: &mut Network) -> usize {
        self.rounds += 1;
        network.node_count()
    }

    fn expand_all(&mut self, _network: &mut Network) -> Vec<String> {
        self.expanded = true;
        Vec::new()
    }
}

#[test]
fn stalled_reduction_is_abandoned_and_undone() {
    let mut network = star(10);
    let mut hook = StallingHook {
        rounds: 0,
        expanded: false,
    };
    let mut layout = engine(|o| o.cluster_threshold = 5);
    layout.position_initially(&mut network, Some(&mut hook)).unwrap();

    assert_eq!(hook.rounds, 2, "two no-progress rounds end the attempt");
    assert!(hook.expanded, "aggregation must be rolled back");
    let events = layout.drain_events();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, LayoutEvent::ImprovedLayoutAborted { .. })),
        "unexpected events: {events:?}"
    );
}

/// Hook that removes leaves and later restores them on top of the hub.
struct LeafFoldingHook {
    folded: Vec<(String, String)>,
    per_round: usize,
}

impl ReductionHook for LeafFoldingHook {
    fn reduce_round(&mut self, network: &mut Network) -> usize {
        let leaves: Vec<String> = network
            .node_indices()
            .into_iter()
            .filter(|id| network.degree(id) <= 1 && id != "hub")
            .take(self.per_round)
            .collect();
        for id in leaves {
            network.remove_node(&id);
            self.folded.push((id, "hub".to_string()));
        }
        network.node_count()
    }

    fn expand_all(&mut self, network: &mut Network) -> Vec<String> {
        let mut freed = Vec::new();
        for (id, host) in self.folded.drain(..) {
            let (x, y) = {
                let host = network.node(&host).unwrap();
                (host.x.unwrap_or(0.0), host.y.unwrap_or(0.0))
            };
            let mut node = Node::new(id.clone());
            node.x = Some(x);
            node.y = Some(y);
            network.add_node(node);
            freed.push(id);
        }
        freed
    }
}

#[test]
fn successful_reduction_runs_kamada_kawai_and_jitters_freed_nodes() {
    let mut network = star(10);
    let mut hook = LeafFoldingHook {
        folded: Vec::new(),
        per_round: 4,
    };
    let mut layout = engine(|o| o.cluster_threshold = 6);
    layout.position_initially(&mut network, Some(&mut hook)).unwrap();

    assert!(layout.drain_events().is_empty(), "no failure expected");
    assert_eq!(network.node_count(), 11, "every folded node came back");

    let hub = network.node("hub").unwrap();
    let (hx, hy) = (hub.x.unwrap(), hub.y.unwrap());
    for id in network.node_indices() {
        let node = network.node(&id).unwrap();
        assert!(node.is_positioned(), "{id} lost its position");
        if id != "hub" {
            let d = ((node.x.unwrap() - hx).powi(2) + (node.y.unwrap() - hy).powi(2)).sqrt();
            assert!(d > 1e-6, "{id} sits exactly on the hub; jitter missing");
        }
    }
}
