//! ForceAtlas2-based repulsion.
//!
//! Reuses the Barnes-Hut tree walk with a degree-scaled kernel: hubs repel harder
//! (`degree + 1` mass factor) and the falloff is `1/d` instead of `1/d²`, which keeps
//! scale-free networks readable. Central gravity for this family is distance-proportional
//! ("strong gravity") and lives in [`super::central_gravity::solve_linear`].

use super::{SimState, barnes_hut};
use crate::options::PhysicsOptions;

pub(crate) fn solve(state: &mut SimState, options: &PhysicsOptions) {
    barnes_hut::solve_with_kernel(state, options, degree_kernel);
}

fn degree_kernel(
    state: &SimState,
    options: &PhysicsOptions,
    i: usize,
    dx: f64,
    dy: f64,
    other_mass: f64,
    d: f64,
) -> (f64, f64) {
    let (dx, dy, d) = barnes_hut::desingularize(i, dx, dy, d);
    let d = barnes_hut::effective_distance(state, options, i, d);
    let degree = (state.degree[i] + 1) as f64;
    let force = options.gravitational_constant * other_mass * state.mass[i] * degree / (d * d);
    (dx * force, dy * force)
}

#[cfg(test)]
mod tests {
    use super::super::SimState;
    use crate::options::{PhysicsOptions, Solver};

    fn state_with_degrees(degrees: [usize; 3]) -> SimState {
        let mut state = SimState::default();
        for (i, deg) in degrees.into_iter().enumerate() {
            state.ids.push(format!("n{i}"));
            state.x.push(i as f64 * 40.0);
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
            state.degree.push(deg);
            state.level.push(None);
        }
        state
    }

    #[test]
    fn hubs_are_repelled_harder_than_leaves() {
        let options = PhysicsOptions::for_solver(Solver::ForceAtlas2Based);

        let mut hub = state_with_degrees([5, 0, 0]);
        super::solve(&mut hub, &options);
        let mut leaf = state_with_degrees([0, 0, 0]);
        super::solve(&mut leaf, &options);

        assert!(
            hub.fx[0].abs() > leaf.fx[0].abs(),
            "degree 5 node should feel more repulsion than degree 0: {} vs {}",
            hub.fx[0],
            leaf.fx[0]
        );
    }
}
