//! Hooke springs over connected, physics-enabled edges.
//!
//! Self-loop edges were dropped when the simulation state was built (identical endpoints
//! give a zero or undefined direction), and edges with a missing endpoint never entered
//! the active edge index.

use super::SimState;
use crate::options::PhysicsOptions;

pub(crate) fn solve(state: &mut SimState, options: &PhysicsOptions) {
    for e in 0..state.edges.len() {
        let edge = state.edges[e];
        let rest = edge.length.unwrap_or(options.spring_length);
        apply(state, edge.a, edge.b, rest, options.spring_constant);
    }
}

/// Hierarchical variant: the rest length grows with the level span of the edge so
/// multi-level edges do not crush intermediate levels together.
pub(crate) fn solve_hierarchical(state: &mut SimState, options: &PhysicsOptions) {
    for e in 0..state.edges.len() {
        let edge = state.edges[e];
        let span = edge.level_span.max(1) as f64;
        let rest = edge.length.unwrap_or(options.spring_length * span);
        apply(state, edge.a, edge.b, rest, options.spring_constant);
    }
}

fn apply(state: &mut SimState, a: usize, b: usize, rest: f64, spring_constant: f64) {
    let dx = state.x[a] - state.x[b];
    let dy = state.y[a] - state.y[b];
    let d = (dx * dx + dy * dy).sqrt().max(0.01);

    let spring_force = (spring_constant * (rest - d)) / d;
    let fx = dx * spring_force;
    let fy = dy * spring_force;
    state.fx[a] += fx;
    state.fy[a] += fy;
    state.fx[b] -= fx;
    state.fy[b] -= fy;
}

#[cfg(test)]
mod tests {
    use super::super::{SimEdge, SimState};
    use crate::options::PhysicsOptions;

    fn pair(gap: f64, length: Option<f64>, level_span: i32) -> SimState {
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
            state.degree.push(1);
            state.level.push(None);
        }
        state.edges.push(SimEdge {
            a: 0,
            b: 1,
            length,
            level_span,
        });
        state
    }

    #[test]
    fn stretched_spring_pulls_endpoints_together() {
        let mut state = pair(300.0, None, 0);
        super::solve(&mut state, &PhysicsOptions::default());
        assert!(state.fx[0] > 0.0, "left endpoint pulled right");
        assert!(state.fx[1] < 0.0, "right endpoint pulled left");
    }

    #[test]
    fn compressed_spring_pushes_endpoints_apart() {
        let mut state = pair(10.0, None, 0);
        super::solve(&mut state, &PhysicsOptions::default());
        assert!(state.fx[0] < 0.0);
        assert!(state.fx[1] > 0.0);
    }

    #[test]
    fn per_edge_length_overrides_the_default() {
        // Gap 100 with rest length 100: no force at all.
        let mut state = pair(100.0, Some(100.0), 0);
        super::solve(&mut state, &PhysicsOptions::default());
        assert_eq!(state.fx[0], 0.0);
    }

    #[test]
    fn hierarchical_rest_length_scales_with_level_span() {
        // Gap equals 2x spring_length: a span-2 edge is exactly at rest, a span-1 edge pulls.
        let options = PhysicsOptions::default();
        let gap = options.spring_length * 2.0;

        let mut span2 = pair(gap, None, 2);
        super::solve_hierarchical(&mut span2, &options);
        assert!(span2.fx[0].abs() < 1e-12);

        let mut span1 = pair(gap, None, 1);
        super::solve_hierarchical(&mut span1, &options);
        assert!(span1.fx[0] > 0.0);
    }
}
