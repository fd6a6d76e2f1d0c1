//! Repulsion for hierarchical layouts.
//!
//! Levels are separated by construction (the layout fixes the level axis), so nodes only
//! ever need to be pushed apart along the free axis, and only against the other nodes of
//! their own level. The free axis is read from the fixed flags the layout engine set.

use super::SimState;
use crate::options::PhysicsOptions;
use std::collections::BTreeMap;

pub(crate) fn solve(state: &mut SimState, options: &PhysicsOptions) {
    let node_distance = options.node_distance.max(0.1);

    let mut by_level: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for i in 0..state.len() {
        by_level.entry(state.level[i].unwrap_or(0)).or_default().push(i);
    }

    for indices in by_level.values() {
        for (a, &i) in indices.iter().enumerate() {
            for &j in &indices[a + 1..] {
                // The level axis is the fixed one; push along the other.
                let along_x = !state.fixed_x[i] || !state.fixed_x[j];
                let delta = if along_x {
                    state.x[i] - state.x[j]
                } else {
                    state.y[i] - state.y[j]
                };
                let span = delta.abs();
                if span >= node_distance {
                    continue;
                }

                let magnitude = (node_distance - span) / node_distance;
                // Coincident nodes: earlier index moves down the axis, later up.
                let direction = if span > 0.0 { delta.signum() } else { -1.0 };
                let force = magnitude * direction;

                if along_x {
                    state.fx[i] += force;
                    state.fx[j] -= force;
                } else {
                    state.fy[i] += force;
                    state.fy[j] -= force;
                }
            }
        }
    }
}
