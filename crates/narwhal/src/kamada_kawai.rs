//! Kamada-Kawai energy minimization for initial placement.
//!
//! Graph-theoretic distances (hop counts from [`crate::floyd_warshall`]) act as target edge
//! lengths; the layout repeatedly picks the node with the steepest energy gradient and
//! solves a 2×2 Newton system for its optimal displacement, holding the others still.
//! Gradients are kept incrementally: after a move only the pairs involving the moved node
//! are recomputed, which is what makes the solver usable on mid-sized graphs.
//!
//! Unreachable pairs (distance sentinel `f64::INFINITY`) contribute neither stiffness nor
//! gradient; disconnected components are positioned independently and later drawn together
//! by central gravity.

use crate::floyd_warshall::{self, DistanceMatrix};
use crate::graphlib::Network;
use nalgebra as na;

const INNER_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct KamadaKawai {
    /// Target length of a single hop.
    pub edge_length: f64,
    /// Stiffness scale; pair stiffness is `edge_strength / distance^2`.
    pub edge_strength: f64,
    /// Outer loop ends once the steepest gradient falls below this.
    pub threshold: f64,
    /// Refinement cap per chosen node, so one node cannot dominate a sweep.
    pub inner_iterations: usize,
}

impl Default for KamadaKawai {
    fn default() -> Self {
        Self {
            edge_length: 150.0,
            edge_strength: 0.05,
            threshold: 0.01,
            inner_iterations: 5,
        }
    }
}

struct Springs {
    n: usize,
    /// Target lengths, `0` for skipped pairs.
    l: Vec<f64>,
    /// Stiffness, `0` for skipped pairs.
    k: Vec<f64>,
}

impl Springs {
    fn build(distances: &DistanceMatrix, edge_length: f64, edge_strength: f64) -> Self {
        let n = distances.len();
        let mut l = vec![0.0; n * n];
        let mut k = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                if i == j || !distances.is_reachable(i, j) {
                    continue;
                }
                let d = distances.get(i, j);
                l[i * n + j] = edge_length * d;
                k[i * n + j] = edge_strength / (d * d);
            }
        }
        Self { n, l, k }
    }

    fn at(&self, i: usize, j: usize) -> (f64, f64) {
        (self.l[i * self.n + j], self.k[i * self.n + j])
    }
}

impl KamadaKawai {
    pub fn new(edge_length: f64, edge_strength: f64) -> Self {
        Self {
            edge_length,
            edge_strength,
            ..Self::default()
        }
    }

    /// Moves every movable node toward an energy minimum. Nodes that are fixed or carry a
    /// predefined position are never chosen to move but still pull on their neighbors.
    /// Every node must already have some position (the scatter pass guarantees this).
    pub fn solve(&self, network: &mut Network) {
        let distances = floyd_warshall::solve(network);
        let n = distances.len();
        if n < 2 {
            return;
        }

        let springs = Springs::build(&distances, self.edge_length, self.edge_strength);
        let ids = distances.ids().to_vec();

        let mut x = vec![0.0; n];
        let mut y = vec![0.0; n];
        let mut movable = vec![false; n];
        for i in 0..n {
            if let Some(node) = network.node(&ids[i]) {
                x[i] = node.x.unwrap_or(0.0);
                y[i] = node.y.unwrap_or(0.0);
                movable[i] =
                    !node.predefined_position && !node.fixed.x && !node.fixed.y;
            }
        }

        // Full gradient build happens once; moves only patch the affected pairs.
        let mut ex = vec![0.0; n];
        let mut ey = vec![0.0; n];
        for i in 0..n {
            let (gx, gy) = gradient(&springs, &x, &y, i);
            ex[i] = gx;
            ey[i] = gy;
        }

        let max_iterations = 1000usize.max((10 * n).min(6000));
        let mut iterations = 0;

        while iterations < max_iterations {
            iterations += 1;

            let Some(m) = steepest(&ex, &ey, &movable) else {
                break;
            };
            let mut delta = (ex[m] * ex[m] + ey[m] * ey[m]).sqrt();
            if delta < self.threshold {
                break;
            }

            // Refine the chosen node at least once, then keep going while its gradient
            // stays steep, capped so one node cannot dominate the sweep.
            let mut sub_iterations = 0;
            loop {
                sub_iterations += 1;
                self.move_node(&springs, &mut x, &mut y, &mut ex, &mut ey, m);
                delta = (ex[m] * ex[m] + ey[m] * ey[m]).sqrt();
                if delta <= INNER_THRESHOLD || sub_iterations >= self.inner_iterations {
                    break;
                }
            }
        }

        for i in 0..n {
            if !movable[i] {
                continue;
            }
            if let Some(node) = network.node_mut(&ids[i]) {
                node.x = Some(x[i]);
                node.y = Some(y[i]);
            }
        }
    }

    /// One Newton step on node `m`, followed by the incremental gradient patch-up for
    /// every pair that involves `m`.
    fn move_node(
        &self,
        springs: &Springs,
        x: &mut [f64],
        y: &mut [f64],
        ex: &mut [f64],
        ey: &mut [f64],
        m: usize,
    ) {
        let n = springs.n;

        let mut dxx = 0.0;
        let mut dxy = 0.0;
        let mut dyy = 0.0;
        for j in 0..n {
            if j == m {
                continue;
            }
            let (l, k) = springs.at(m, j);
            if k == 0.0 {
                continue;
            }
            let dx = x[m] - x[j];
            let dy = y[m] - y[j];
            let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
            let cubed = dist * dist * dist;
            dxx += k * (1.0 - l * dy * dy / cubed);
            dxy += k * (l * dx * dy / cubed);
            dyy += k * (1.0 - l * dx * dx / cubed);
        }

        let hessian = na::Matrix2::new(dxx, dxy, dxy, dyy);
        let rhs = na::Vector2::new(-ex[m], -ey[m]);
        let Some(step) = hessian.lu().solve(&rhs) else {
            // Singular system (fully symmetric neighborhood); nothing sensible to do.
            return;
        };
        if !(step[0].is_finite() && step[1].is_finite()) {
            return;
        }

        // Patch neighbors: subtract each pair's old contribution, apply the move, add the
        // new one. The moved node's own gradient is rebuilt from scratch.
        for j in 0..n {
            if j == m {
                continue;
            }
            let (old_x, old_y) = pair_gradient(springs, x, y, j, m);
            ex[j] -= old_x;
            ey[j] -= old_y;
        }

        x[m] += step[0];
        y[m] += step[1];

        for j in 0..n {
            if j == m {
                continue;
            }
            let (new_x, new_y) = pair_gradient(springs, x, y, j, m);
            ex[j] += new_x;
            ey[j] += new_y;
        }
        let (gx, gy) = gradient(springs, x, y, m);
        ex[m] = gx;
        ey[m] = gy;
    }
}

/// Movable node with the largest gradient magnitude.
fn steepest(ex: &[f64], ey: &[f64], movable: &[bool]) -> Option<usize> {
    let mut best: Option<(f64, usize)> = None;
    for i in 0..ex.len() {
        if !movable[i] {
            continue;
        }
        let mag = ex[i] * ex[i] + ey[i] * ey[i];
        match best {
            Some((b, _)) if mag <= b => {}
            _ => best = Some((mag, i)),
        }
    }
    best.map(|(_, i)| i)
}

/// Contribution of the pair `(i, j)` to node `i`'s gradient.
fn pair_gradient(springs: &Springs, x: &[f64], y: &[f64], i: usize, j: usize) -> (f64, f64) {
    let (l, k) = springs.at(i, j);
    if k == 0.0 {
        return (0.0, 0.0);
    }
    let dx = x[i] - x[j];
    let dy = y[i] - y[j];
    let dist = (dx * dx + dy * dy).sqrt().max(1e-9);
    (k * (dx - l * dx / dist), k * (dy - l * dy / dist))
}

fn gradient(springs: &Springs, x: &[f64], y: &[f64], i: usize) -> (f64, f64) {
    let mut gx = 0.0;
    let mut gy = 0.0;
    for j in 0..springs.n {
        if j == i {
            continue;
        }
        let (px, py) = pair_gradient(springs, x, y, i, j);
        gx += px;
        gy += py;
    }
    (gx, gy)
}

#[cfg(test)]
mod tests {
    use super::KamadaKawai;
    use crate::graphlib::{Edge, Network, Node};

    fn positioned(network: &Network, id: &str) -> (f64, f64) {
        let node = network.node(id).unwrap();
        (node.x.unwrap(), node.y.unwrap())
    }

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn connected_pair_settles_near_the_target_length() {
        let mut network = Network::new();
        network.add_node(Node::at("a", 0.0, 0.0));
        network.add_node(Node::at("b", 10.0, 0.0));
        network.node_mut("a").unwrap().predefined_position = false;
        network.node_mut("b").unwrap().predefined_position = false;
        network.add_edge(Edge::new("ab", "a", "b"));

        let kk = KamadaKawai::default();
        kk.solve(&mut network);

        let d = distance(positioned(&network, "a"), positioned(&network, "b"));
        assert!(
            (d - kk.edge_length).abs() < 1.0,
            "pair should sit near the target length, got {d}"
        );
    }

    #[test]
    fn path_endpoints_end_up_two_hops_apart() {
        let mut network = Network::new();
        for (id, x) in [("a", 0.0), ("b", 5.0), ("c", 10.0)] {
            network.add_node(Node::at(id, x, (x * 0.7).sin()));
            network.node_mut(id).unwrap().predefined_position = false;
        }
        network.add_edge(Edge::new("ab", "a", "b"));
        network.add_edge(Edge::new("bc", "b", "c"));

        let kk = KamadaKawai::default();
        kk.solve(&mut network);

        let d = distance(positioned(&network, "a"), positioned(&network, "c"));
        assert!(
            (d - 2.0 * kk.edge_length).abs() < 5.0,
            "endpoints of a 2-hop path should sit near twice the target length, got {d}"
        );
    }

    #[test]
    fn fixed_nodes_are_never_moved_but_still_attract() {
        let mut network = Network::new();
        let mut anchor = Node::at("anchor", 40.0, 40.0);
        anchor.fixed.x = true;
        anchor.fixed.y = true;
        network.add_node(anchor);
        network.add_node(Node::at("free", 45.0, 40.0));
        network.node_mut("free").unwrap().predefined_position = false;
        network.add_edge(Edge::new("e", "anchor", "free"));

        KamadaKawai::default().solve(&mut network);

        assert_eq!(positioned(&network, "anchor"), (40.0, 40.0));
        let moved = positioned(&network, "free");
        assert!(distance(moved, (45.0, 40.0)) > 1.0, "free node should move");
    }

    #[test]
    fn disconnected_components_produce_finite_positions() {
        let mut network = Network::new();
        for (id, x, y) in [("a", 0.0, 0.0), ("b", 3.0, 1.0), ("c", -2.0, 4.0), ("d", 1.0, -3.0)] {
            network.add_node(Node::at(id, x, y));
            network.node_mut(id).unwrap().predefined_position = false;
        }
        network.add_edge(Edge::new("ab", "a", "b"));
        network.add_edge(Edge::new("cd", "c", "d"));

        KamadaKawai::default().solve(&mut network);

        for id in ["a", "b", "c", "d"] {
            let (x, y) = positioned(&network, id);
            assert!(x.is_finite() && y.is_finite(), "{id} drifted to non-finite");
        }
    }
}
