//! Lay out a small org-chart-style tree hierarchically and print the node grid.
//!
//! Run: `cargo run -p narwhal --example hierarchical_layout`

use narwhal::graphlib::{Edge, Network, Node};
use narwhal::options::{LayoutOptions, ShakeTowards, SortMethod};
use narwhal::LayoutEngine;

fn main() -> narwhal::Result<()> {
    let mut network = Network::new();
    for id in [
        "ceo", "eng", "sales", "backend", "frontend", "qa", "emea", "apac",
    ] {
        network.add_node(Node::new(id));
    }
    for (id, from, to) in [
        ("e1", "ceo", "eng"),
        ("e2", "ceo", "sales"),
        ("e3", "eng", "backend"),
        ("e4", "eng", "frontend"),
        ("e5", "eng", "qa"),
        ("e6", "sales", "emea"),
        ("e7", "sales", "apac"),
    ] {
        network.add_edge(Edge::new(id, from, to));
    }

    let mut options = LayoutOptions {
        random_seed: Some(1),
        ..Default::default()
    };
    options.hierarchical.enabled = true;
    options.hierarchical.sort_method = SortMethod::Directed;
    options.hierarchical.shake_towards = ShakeTowards::Roots;

    let mut layout = LayoutEngine::new(options);
    let status = layout.setup_hierarchical_layout(&mut network)?.clone();

    println!("levels (curve hint: {}):", layout.curve_type());
    for (level, ids) in &status.distribution_ordering {
        print!("  {level}:");
        for id in ids {
            let node = network.node(id).unwrap();
            print!(" {id}@({:.0}, {:.0})", node.x.unwrap(), node.y.unwrap());
        }
        println!();
    }
    Ok(())
}
