//! The hierarchical layout hands off to the hierarchical repulsion solver: the level axis
//! is locked by the layout, so simulation may only slide nodes along the free axis.

use narwhal::graphlib::{Edge, Network, Node};
use narwhal::options::{LayoutOptions, PhysicsOptions, ShakeTowards, Solver, SortMethod};
use narwhal::{LayoutEngine, PhysicsEngine};

fn laid_out_tree() -> (Network, LayoutEngine) {
    let mut network = Network::new();
    for i in 1..=7u32 {
        network.add_node(Node::new(i.to_string()));
    }
    for i in 1..=3u32 {
        for child in [2 * i, 2 * i + 1] {
            network.add_edge(Edge::new(
                format!("e{i}-{child}"),
                i.to_string(),
                child.to_string(),
            ));
        }
    }

    let mut options = LayoutOptions {
        random_seed: Some(11),
        ..Default::default()
    };
    options.hierarchical.enabled = true;
    options.hierarchical.sort_method = SortMethod::Directed;
    options.hierarchical.shake_towards = ShakeTowards::Roots;

    let mut layout = LayoutEngine::new(options);
    layout.setup_hierarchical_layout(&mut network).unwrap();
    (network, layout)
}

#[test]
fn simulation_never_touches_the_level_axis() {
    let (mut network, _) = laid_out_tree();
    let before: Vec<(String, f64)> = network
        .node_indices()
        .into_iter()
        .map(|id| {
            let y = network.node(&id).unwrap().y.unwrap();
            (id, y)
        })
        .collect();

    let mut engine = PhysicsEngine::new(PhysicsOptions::for_solver(Solver::HierarchicalRepulsion));
    engine.stabilize(&mut network);

    for (id, y) in before {
        assert_eq!(
            network.node(&id).unwrap().y,
            Some(y),
            "level coordinate of {id} moved during simulation"
        );
    }
}

#[test]
fn free_axis_positions_stay_finite_and_separated_overall() {
    let (mut network, _) = laid_out_tree();
    let mut engine = PhysicsEngine::new(PhysicsOptions::for_solver(Solver::HierarchicalRepulsion));
    engine.stabilize(&mut network);

    for node in network.nodes() {
        assert!(node.x.unwrap().is_finite());
    }
    // Siblings on the deepest level must not have collapsed onto each other.
    let leaves: Vec<f64> = (4..=7u32)
        .map(|i| network.node(&i.to_string()).unwrap().x.unwrap())
        .collect();
    for i in 0..leaves.len() {
        for j in (i + 1)..leaves.len() {
            assert!(
                (leaves[i] - leaves[j]).abs() > 1.0,
                "leaves {i} and {j} collapsed"
            );
        }
    }
}

#[test]
fn curve_hint_matches_the_orientation() {
    let (_, layout) = laid_out_tree();
    assert_eq!(layout.curve_type(), "vertical");
}
