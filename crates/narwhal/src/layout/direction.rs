//! Direction strategies for the hierarchical layout.
//!
//! All hierarchical math runs in terms of a "level" axis (determined by a node's level)
//! and a "free" axis (where nodes slide within a level). These two implementations confine
//! every concrete coordinate access, so the same algorithms produce up-down, down-up,
//! left-right and right-left layouts.

use crate::graphlib::{Network, Node};
use crate::options::Direction;

pub trait DirectionStrategy {
    /// Coordinate along the free axis. Unpositioned nodes read as 0.
    fn position(&self, node: &Node) -> f64;

    fn set_position(&self, node: &mut Node, pos: f64);

    /// Pin the level axis: derive its coordinate from the level and lock the axis so the
    /// physics integrator never moves it.
    fn fix(&self, node: &mut Node, level: i32, level_separation: f64);

    fn shift(&self, node: &mut Node, delta: f64);

    /// Stable sort of ids by current free-axis coordinate; unpositioned ids keep their
    /// relative order at the end.
    fn sort(&self, network: &Network, ids: &mut [String]);

    /// Free-axis extent of a group of nodes (a tree, a branch), `None` when no member is
    /// positioned.
    fn span(&self, network: &Network, ids: &[String]) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut any = false;
        for id in ids {
            if let Some(node) = network.node(id) {
                let pos = self.position(node);
                min = min.min(pos);
                max = max.max(pos);
                any = true;
            }
        }
        any.then_some((min, max))
    }

    /// Renderer hint for edge drawing in this orientation.
    fn curve_type(&self) -> &'static str;
}

/// UD/DU: y is the level axis, x is free.
pub struct VerticalStrategy {
    sign: f64,
}

/// LR/RL: x is the level axis, y is free.
pub struct HorizontalStrategy {
    sign: f64,
}

pub fn strategy_for(direction: Direction) -> Box<dyn DirectionStrategy> {
    match direction {
        Direction::UD => Box::new(VerticalStrategy { sign: 1.0 }),
        Direction::DU => Box::new(VerticalStrategy { sign: -1.0 }),
        Direction::LR => Box::new(HorizontalStrategy { sign: 1.0 }),
        Direction::RL => Box::new(HorizontalStrategy { sign: -1.0 }),
    }
}

fn sort_by(network: &Network, ids: &mut [String], coord: impl Fn(&Node) -> Option<f64>) {
    ids.sort_by(|a, b| {
        let pa = network.node(a).and_then(&coord);
        let pb = network.node(b).and_then(&coord);
        match (pa, pb) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

impl DirectionStrategy for VerticalStrategy {
    fn position(&self, node: &Node) -> f64 {
        node.x.unwrap_or(0.0)
    }

    fn set_position(&self, node: &mut Node, pos: f64) {
        node.x = Some(pos);
    }

    fn fix(&self, node: &mut Node, level: i32, level_separation: f64) {
        node.y = Some(self.sign * level as f64 * level_separation);
        node.fixed.y = true;
    }

    fn shift(&self, node: &mut Node, delta: f64) {
        node.x = Some(node.x.unwrap_or(0.0) + delta);
    }

    fn sort(&self, network: &Network, ids: &mut [String]) {
        sort_by(network, ids, |n| n.x);
    }

    fn curve_type(&self) -> &'static str {
        "vertical"
    }
}

impl DirectionStrategy for HorizontalStrategy {
    fn position(&self, node: &Node) -> f64 {
        node.y.unwrap_or(0.0)
    }

    fn set_position(&self, node: &mut Node, pos: f64) {
        node.y = Some(pos);
    }

    fn fix(&self, node: &mut Node, level: i32, level_separation: f64) {
        node.x = Some(self.sign * level as f64 * level_separation);
        node.fixed.x = true;
    }

    fn shift(&self, node: &mut Node, delta: f64) {
        node.y = Some(node.y.unwrap_or(0.0) + delta);
    }

    fn sort(&self, network: &Network, ids: &mut [String]) {
        sort_by(network, ids, |n| n.y);
    }

    fn curve_type(&self) -> &'static str {
        "horizontal"
    }
}
