//! Barnes-Hut approximated repulsion.
//!
//! A quadtree over the current positions is rebuilt every step (positions move every
//! step, so there is nothing to reuse). Distant cells whose apparent size is below
//! `theta` are treated as a single point mass at their center of mass, bringing the
//! O(n²) pairwise repulsion down to O(n log n).

use super::SimState;
use crate::options::PhysicsOptions;
use crate::util::fallback_direction;

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

#[derive(Debug, Clone, Copy)]
pub(crate) struct QuadBounds {
    pub center_x: f64,
    pub center_y: f64,
    pub half_extent: f64,
}

impl QuadBounds {
    fn from_points(x: &[f64], y: &[f64]) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for i in 0..x.len() {
            min_x = min_x.min(x[i]);
            min_y = min_y.min(y[i]);
            max_x = max_x.max(x[i]);
            max_y = max_y.max(y[i]);
        }
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return None;
        }

        let span_x = (max_x - min_x).max(1.0);
        let span_y = (max_y - min_y).max(1.0);
        Some(Self {
            center_x: (min_x + max_x) * 0.5,
            center_y: (min_y + max_y) * 0.5,
            half_extent: (span_x.max(span_y) * 0.5) + 1.0,
        })
    }

    pub(crate) fn contains(&self, px: f64, py: f64) -> bool {
        (px - self.center_x).abs() <= self.half_extent
            && (py - self.center_y).abs() <= self.half_extent
    }

    pub(crate) fn side_length(&self) -> f64 {
        self.half_extent * 2.0
    }

    fn child(&self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let (ox, oy) = match quadrant {
            0 => (-quarter, -quarter),
            1 => (quarter, -quarter),
            2 => (-quarter, quarter),
            _ => (quarter, quarter),
        };
        Self {
            center_x: self.center_x + ox,
            center_y: self.center_y + oy,
            half_extent: quarter,
        }
    }

    fn quadrant_for(&self, px: f64, py: f64) -> usize {
        match (px >= self.center_x, py >= self.center_y) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }
}

#[derive(Debug)]
pub(crate) struct QuadNode {
    pub bounds: QuadBounds,
    pub mass: f64,
    pub com_x: f64,
    pub com_y: f64,
    pub indices: Vec<usize>,
    pub children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    /// Builds the tree over all simulation nodes, mass-weighted centers of mass per cell.
    pub(crate) fn build(x: &[f64], y: &[f64], mass: &[f64]) -> Option<Self> {
        let bounds = QuadBounds::from_points(x, y)?;
        let indices: Vec<usize> = (0..x.len()).collect();
        Some(Self::build_node(bounds, indices, x, y, mass, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        x: &[f64],
        y: &[f64],
        mass: &[f64],
        depth: usize,
    ) -> Self {
        let mut total_mass = 0.0;
        let mut com_x = 0.0;
        let mut com_y = 0.0;
        for &i in &indices {
            total_mass += mass[i];
            com_x += x[i] * mass[i];
            com_y += y[i] * mass[i];
        }
        if total_mass > 0.0 {
            com_x /= total_mass;
            com_y /= total_mass;
        }

        let mut node = Self {
            bounds,
            mass: total_mass,
            com_x,
            com_y,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &i in &node.indices {
            buckets[bounds.quadrant_for(x[i], y[i])].push(i);
        }

        // Coincident points would recurse forever; leave them in one leaf.
        let non_empty = buckets.iter().filter(|b| !b.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            node.children[quadrant] = Some(Box::new(Self::build_node(
                bounds.child(quadrant),
                bucket,
                x,
                y,
                mass,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_none())
    }
}

pub(crate) fn solve(state: &mut SimState, options: &PhysicsOptions) {
    solve_with_kernel(state, options, gravity_kernel);
}

/// Shared tree walk; the ForceAtlas2 solver plugs in its degree-scaled kernel.
pub(crate) fn solve_with_kernel(
    state: &mut SimState,
    options: &PhysicsOptions,
    kernel: fn(&SimState, &PhysicsOptions, usize, f64, f64, f64, f64) -> (f64, f64),
) {
    let Some(tree) = QuadNode::build(&state.x, &state.y, &state.mass) else {
        return;
    };
    for i in 0..state.len() {
        let (fx, fy) = accumulate(&tree, state, options, i, kernel);
        state.fx[i] += fx;
        state.fy[i] += fy;
    }
}

fn accumulate(
    node: &QuadNode,
    state: &SimState,
    options: &PhysicsOptions,
    i: usize,
    kernel: fn(&SimState, &PhysicsOptions, usize, f64, f64, f64, f64) -> (f64, f64),
) -> (f64, f64) {
    if node.mass <= 0.0 {
        return (0.0, 0.0);
    }

    let px = state.x[i];
    let py = state.y[i];

    if node.is_leaf() {
        let mut fx = 0.0;
        let mut fy = 0.0;
        for &j in &node.indices {
            if j == i {
                continue;
            }
            let (dfx, dfy) = kernel(
                state,
                options,
                i,
                state.x[j] - px,
                state.y[j] - py,
                state.mass[j],
                distance(state.x[j] - px, state.y[j] - py),
            );
            fx += dfx;
            fy += dfy;
        }
        return (fx, fy);
    }

    let dx = node.com_x - px;
    let dy = node.com_y - py;
    let d = distance(dx, dy);
    let can_approximate =
        !node.bounds.contains(px, py) && d > 0.0 && node.bounds.side_length() / d < options.theta;
    if can_approximate {
        return kernel(state, options, i, dx, dy, node.mass, d);
    }

    let mut fx = 0.0;
    let mut fy = 0.0;
    for child in node.children.iter().flatten() {
        let (dfx, dfy) = accumulate(child, state, options, i, kernel);
        fx += dfx;
        fy += dfy;
    }
    (fx, fy)
}

fn distance(dx: f64, dy: f64) -> f64 {
    (dx * dx + dy * dy).sqrt()
}

/// Point-mass gravity: `G · m_i · m_other / d³` along the separation vector. `G < 0`
/// repulses. Coincident points get a deterministic push-apart direction instead of the
/// upstream `Math.random` jitter.
fn gravity_kernel(
    state: &SimState,
    options: &PhysicsOptions,
    i: usize,
    dx: f64,
    dy: f64,
    other_mass: f64,
    d: f64,
) -> (f64, f64) {
    let (dx, dy, d) = desingularize(i, dx, dy, d);
    let d = effective_distance(state, options, i, d);
    let force = options.gravitational_constant * state.mass[i] * other_mass / (d * d * d);
    (dx * force, dy * force)
}

pub(crate) fn desingularize(i: usize, dx: f64, dy: f64, d: f64) -> (f64, f64, f64) {
    if d > 0.0 {
        return (dx, dy, d);
    }
    let (ux, uy) = fallback_direction(i);
    (ux * 0.1, uy * 0.1, 0.1)
}

/// Overlap avoidance shrinks the effective distance by the node radius, floored so the
/// force kernel never sees a near-zero denominator.
pub(crate) fn effective_distance(
    state: &SimState,
    options: &PhysicsOptions,
    i: usize,
    d: f64,
) -> f64 {
    let factor = 1.0 - options.avoid_overlap.clamp(0.0, 1.0);
    if factor >= 1.0 {
        return d;
    }
    let radius = state.size[i];
    (d - radius).max(0.1 + factor * radius)
}
