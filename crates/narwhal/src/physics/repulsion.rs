//! Pairwise O(n²) repulsion.
//!
//! The force curve is a linear approximation of `1 / (1 + e^{(d/nodeDistance - 1)·k})`:
//! full strength inside half the node distance, linear falloff to zero at twice the node
//! distance. Fine for a few hundred nodes; larger graphs should use Barnes-Hut.

use super::SimState;
use crate::options::PhysicsOptions;
use crate::util::fallback_direction;

pub(crate) fn solve(state: &mut SimState, options: &PhysicsOptions) {
    let node_distance = options.node_distance.max(0.1);
    let a = (-2.0 / 3.0) / node_distance;
    let b = 4.0 / 3.0;
    let avoid_overlap = options.avoid_overlap.clamp(0.0, 1.0);

    for i in 0..state.len() {
        for j in (i + 1)..state.len() {
            let mut dx = state.x[i] - state.x[j];
            let mut dy = state.y[i] - state.y[j];
            let mut d = (dx * dx + dy * dy).sqrt();

            if d == 0.0 {
                let (ux, uy) = fallback_direction(i + j);
                dx = ux * 0.1;
                dy = uy * 0.1;
                d = 0.1;
            }

            // Overlap avoidance pushes the falloff window outward by the combined radii.
            let effective = if avoid_overlap > 0.0 {
                (d - avoid_overlap * (state.size[i] + state.size[j])).max(0.1)
            } else {
                d
            };
            if effective >= 2.0 * node_distance {
                continue;
            }

            let mut repulsing = if effective < 0.5 * node_distance {
                1.0
            } else {
                a * effective + b
            };
            // Dividing by the effective distance (not the raw one) makes overlapping
            // nodes push apart hard instead of saturating at the curve's plateau.
            repulsing /= effective;

            let fx = dx * repulsing;
            let fy = dy * repulsing;
            state.fx[i] += fx;
            state.fy[i] += fy;
            state.fx[j] -= fx;
            state.fy[j] -= fy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::SimState;
    use crate::options::{PhysicsOptions, Solver};

    fn two_nodes(gap: f64) -> SimState {
        let mut state = SimState::default();
        for (i, x) in [0.0, gap].iter().enumerate() {
            state.ids.push(format!("n{i}"));
            state.x.push(*x);
            state.y.push(0.0);
            state.vx.push(0.0);
            state.vy.push(0.0);
            state.fx.push(0.0);
            state.fy.push(0.0);
            state.mass.push(1.0);
            state.size.push(10.0);
            state.fixed_x.push(false);
            state.fixed_y.push(false);
            state.frozen.push(false);
            state.degree.push(0);
            state.level.push(None);
        }
        state
    }

    #[test]
    fn close_nodes_push_apart_symmetrically() {
        let mut state = two_nodes(30.0);
        let options = PhysicsOptions::for_solver(Solver::Repulsion);
        super::solve(&mut state, &options);
        assert!(state.fx[0] < 0.0, "left node pushed further left");
        assert!(state.fx[1] > 0.0, "right node pushed further right");
        assert!((state.fx[0] + state.fx[1]).abs() < 1e-12, "forces cancel");
    }

    #[test]
    fn far_nodes_feel_nothing() {
        let mut state = two_nodes(1000.0);
        let options = PhysicsOptions::for_solver(Solver::Repulsion);
        super::solve(&mut state, &options);
        assert_eq!(state.fx[0], 0.0);
        assert_eq!(state.fx[1], 0.0);
    }

    #[test]
    fn coincident_nodes_separate_deterministically() {
        let mut state = two_nodes(0.0);
        let options = PhysicsOptions::for_solver(Solver::Repulsion);
        super::solve(&mut state, &options);
        let first = (state.fx[0], state.fy[0]);
        assert!(first.0 != 0.0 || first.1 != 0.0);

        let mut again = two_nodes(0.0);
        super::solve(&mut again, &options);
        assert_eq!((again.fx[0], again.fy[0]), first);
    }
}
