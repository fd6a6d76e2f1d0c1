use narwhal::floyd_warshall;
use narwhal::graphlib::{Edge, Network, Node};

/// Two triangles bridged by one edge plus a far-away island.
fn fixture() -> Network {
    let mut network = Network::new();
    for id in ["a", "b", "c", "d", "e", "f", "island"] {
        network.add_node(Node::new(id));
    }
    for (id, from, to) in [
        ("ab", "a", "b"),
        ("bc", "b", "c"),
        ("ca", "c", "a"),
        ("cd", "c", "d"),
        ("de", "d", "e"),
        ("ef", "e", "f"),
        ("fd", "f", "d"),
    ] {
        network.add_edge(Edge::new(id, from, to));
    }
    network
}

#[test]
fn diagonal_is_zero() {
    let m = floyd_warshall::solve(&fixture());
    for i in 0..m.len() {
        assert_eq!(m.get(i, i), 0.0);
    }
}

#[test]
fn distances_are_symmetric() {
    let m = floyd_warshall::solve(&fixture());
    for i in 0..m.len() {
        for j in 0..m.len() {
            assert_eq!(m.get(i, j), m.get(j, i), "asymmetry at ({i}, {j})");
        }
    }
}

#[test]
fn triangle_inequality_holds_for_reachable_triples() {
    let m = floyd_warshall::solve(&fixture());
    let n = m.len();
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                if m.is_reachable(i, j) && m.is_reachable(j, k) {
                    assert!(
                        m.get(i, k) <= m.get(i, j) + m.get(j, k) + 1e-12,
                        "triangle inequality violated at ({i}, {j}, {k})"
                    );
                }
            }
        }
    }
}

#[test]
fn known_distances_match_hop_counts() {
    let m = floyd_warshall::solve(&fixture());
    assert_eq!(m.get_by_id("a", "c"), Some(1.0));
    assert_eq!(m.get_by_id("a", "d"), Some(2.0));
    assert_eq!(m.get_by_id("a", "e"), Some(3.0));
    assert_eq!(m.get_by_id("b", "f"), Some(3.0));
}

#[test]
fn island_is_unreachable_from_everywhere_else() {
    let m = floyd_warshall::solve(&fixture());
    for id in ["a", "b", "c", "d", "e", "f"] {
        let d = m.get_by_id(id, "island").unwrap();
        assert!(d.is_infinite(), "{id} -> island should be unreachable");
        assert!(!d.is_nan());
    }
    assert_eq!(m.get_by_id("island", "island"), Some(0.0));
}

#[test]
fn self_loops_do_not_shorten_anything() {
    let mut network = fixture();
    network.add_edge(Edge::new("aa", "a", "a"));
    let m = floyd_warshall::solve(&network);
    assert_eq!(m.get_by_id("a", "a"), Some(0.0));
    assert_eq!(m.get_by_id("a", "e"), Some(3.0));
}
