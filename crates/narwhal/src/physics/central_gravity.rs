//! Central gravity, keeping disconnected components from drifting apart forever.

use super::SimState;
use crate::options::PhysicsOptions;

/// Constant-magnitude pull toward the origin: `central_gravity · mass` along the unit
/// vector. Nodes exactly at the origin feel nothing.
pub(crate) fn solve(state: &mut SimState, options: &PhysicsOptions) {
    if options.central_gravity == 0.0 {
        return;
    }
    for i in 0..state.len() {
        let dx = -state.x[i];
        let dy = -state.y[i];
        let d = (dx * dx + dy * dy).sqrt();
        if d > 0.0 {
            let factor = options.central_gravity / d;
            state.fx[i] += dx * factor * state.mass[i];
            state.fy[i] += dy * factor * state.mass[i];
        }
    }
}

/// "Strong gravity" for the ForceAtlas2 family: the pull grows with distance instead of
/// staying constant, which stops sparse fringes from escaping.
pub(crate) fn solve_linear(state: &mut SimState, options: &PhysicsOptions) {
    if options.central_gravity == 0.0 {
        return;
    }
    for i in 0..state.len() {
        state.fx[i] += -state.x[i] * options.central_gravity * state.mass[i];
        state.fy[i] += -state.y[i] * options.central_gravity * state.mass[i];
    }
}
