//! Hierarchical layout: level assignment, relation crawl, per-level placement and
//! whitespace condensation.
//!
//! One invocation runs the full pipeline: assign levels, build parent/child relations,
//! place level by level (pre-order along branches), condense whitespace, then center the
//! result at the origin. [`HierarchicalStatus`] is rebuilt from scratch every time; it is
//! never partially mutated across runs.

use crate::error::{Error, Result};
use crate::graphlib::{Edge, Network, alg};
use crate::layout::direction::{DirectionStrategy, strategy_for};
use crate::options::{HierarchicalOptions, ShakeTowards, SortMethod};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, VecDeque};

/// Child level from the parent level and the connecting edge. The default increments by
/// one; callers can install their own through the layout engine.
pub type EdgeLeveler = dyn Fn(i32, &Edge) -> i32;

#[derive(Debug, Clone, Default)]
pub struct HierarchicalStatus {
    /// Node id → level. User-supplied levels are reported verbatim; computed levels are
    /// normalized so the minimum is 0.
    pub levels: IndexMap<String, i32>,
    /// Node id → parent ids (nodes one or more levels up, connected by an edge).
    pub parent_reference: IndexMap<String, Vec<String>>,
    /// Node id → child ids.
    pub children_reference: IndexMap<String, Vec<String>>,
    /// Node id → index of its disconnected component.
    pub trees: IndexMap<String, usize>,
    /// Level → node ids at that level, in the network's insertion order (which is also
    /// the order placement walks them).
    pub distribution_ordering: BTreeMap<i32, Vec<String>>,
    /// True iff every node has at most one parent. Several condensation shortcuts are
    /// only safe on formal trees/forests and are skipped otherwise.
    pub is_tree: bool,
}

impl HierarchicalStatus {
    fn add_relation(&mut self, parent: &str, child: &str) {
        let children = self.children_reference.entry(parent.to_string()).or_default();
        if !children.iter().any(|c| c == child) {
            children.push(child.to_string());
        }
        let parents = self.parent_reference.entry(child.to_string()).or_default();
        if !parents.iter().any(|p| p == parent) {
            parents.push(parent.to_string());
        }
    }

    fn check_if_tree(&mut self) {
        self.is_tree = self
            .parent_reference
            .values()
            .all(|parents| parents.len() <= 1);
    }

    pub fn level_of(&self, id: &str) -> Option<i32> {
        self.levels.get(id).copied()
    }

    pub fn number_of_trees(&self) -> usize {
        self.trees.values().copied().max().map_or(0, |m| m + 1)
    }

    fn children_of(&self, id: &str) -> &[String] {
        self.children_reference
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Runs the hierarchical layout over the network, mutating node positions and locking the
/// level axis of every node. Returns the freshly built status.
pub(crate) fn setup(
    network: &mut Network,
    options: &HierarchicalOptions,
    leveler: Option<&EdgeLeveler>,
) -> Result<HierarchicalStatus> {
    let strategy = strategy_for(options.direction);
    let mut status = HierarchicalStatus::default();

    assign_levels(network, options, leveler, &mut status)?;
    build_relations(network, &mut status);
    place_by_level(network, options, strategy.as_ref(), &mut status);
    condense_whitespace(network, options, strategy.as_ref(), &status);
    separate_trees(network, options, strategy.as_ref(), &status);
    center(network);

    Ok(status)
}

/// Renderer hint for the configured orientation.
pub fn curve_type(options: &HierarchicalOptions) -> &'static str {
    strategy_for(options.direction).curve_type()
}

// ---------------------------------------------------------------------------
// Level assignment
// ---------------------------------------------------------------------------

fn assign_levels(
    network: &mut Network,
    options: &HierarchicalOptions,
    leveler: Option<&EdgeLeveler>,
    status: &mut HierarchicalStatus,
) -> Result<()> {
    let ids = network.node_indices();
    let explicit = ids
        .iter()
        .filter(|id| network.node(id).is_some_and(|n| n.level.is_some()))
        .count();

    if explicit == ids.len() {
        // All user-supplied: use verbatim.
        for id in &ids {
            let level = network.node(id).and_then(|n| n.level).unwrap_or(0);
            status.levels.insert(id.clone(), level);
        }
        return Ok(());
    }

    if explicit != 0 {
        // Mixed explicit/implicit levels cannot be guessed at.
        let offender = ids
            .iter()
            .find(|id| network.node(id).is_some_and(|n| n.level.is_none()))
            .cloned()
            .unwrap_or_default();
        return Err(Error::InconsistentLevels { node_id: offender });
    }

    match options.sort_method {
        SortMethod::Hubsize => levels_by_hubsize(network, status),
        SortMethod::Directed => levels_directed(network, options.shake_towards, leveler, status),
    }
    normalize_levels(status);

    // Computed levels go back onto the nodes: the hierarchical physics solvers read them
    // there, and a later setup treats them as explicit (same values, same layout).
    for (id, &level) in &status.levels {
        if let Some(node) = network.node_mut(id) {
            node.level = Some(level);
        }
    }
    Ok(())
}

/// Repeatedly start from the highest-degree unleveled node and assign levels by BFS
/// distance outward.
fn levels_by_hubsize(network: &Network, status: &mut HierarchicalStatus) {
    for start in alg::hubsize_order(network) {
        if status.levels.contains_key(&start) {
            continue;
        }
        status.levels.insert(start.clone(), 0);

        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            let level = status.levels[&v];
            for nb in network.neighbors(&v) {
                if !status.levels.contains_key(&nb) {
                    status.levels.insert(nb.clone(), level + 1);
                    queue.push_back(nb);
                }
            }
        }
    }
}

/// Level assignment respecting edge direction, anchored at roots or leaves.
///
/// This is a bounded longest-path relaxation: anchored at roots, a node is pushed down
/// whenever a parent offers a deeper level, so on acyclic input every edge ends up
/// connecting a strictly lower level to a strictly higher one. The relaxation budget is
/// what guarantees termination on cycles: a cycle keeps offering "deeper" levels forever,
/// so the crawl stops once the budget runs out and keeps whatever it has.
fn levels_directed(
    network: &Network,
    shake_towards: ShakeTowards,
    leveler: Option<&EdgeLeveler>,
    status: &mut HierarchicalStatus,
) {
    let downstream = shake_towards == ShakeTowards::Roots;
    let anchors = match shake_towards {
        ShakeTowards::Roots => alg::roots(network),
        ShakeTowards::Leaves => alg::leaves(network),
    };

    // Child level for one edge given the parent level.
    let child_level = |parent_level: i32, edge: &Edge| match leveler {
        Some(f) => f(parent_level, edge),
        None => parent_level + 1,
    };

    let budget = network.node_count() * (network.edge_count() + 1) + network.node_count();

    let mut relax = |starts: Vec<String>, status: &mut HierarchicalStatus| {
        let mut queue: VecDeque<String> = VecDeque::new();
        for start in starts {
            status.levels.entry(start.clone()).or_insert(0);
            queue.push_back(start);
        }

        let mut spent = 0usize;
        while let Some(v) = queue.pop_front() {
            spent += 1;
            if spent > budget {
                break;
            }
            let level = status.levels[&v];
            for edge_id in network.connected_edges(&v) {
                let Some(edge) = network.edge(&edge_id) else {
                    continue;
                };
                if !network.is_connected(edge) || edge.is_self_loop() {
                    continue;
                }

                let (next, candidate, deeper) = if downstream {
                    if edge.from != v {
                        continue;
                    }
                    (edge.to.clone(), child_level(level, edge), true)
                } else {
                    if edge.to != v {
                        continue;
                    }
                    // Anchored at leaves: walk upstream, parent sits one increment up.
                    let increment = child_level(0, edge).max(1);
                    (edge.from.clone(), level - increment, false)
                };

                let improved = match status.levels.get(&next) {
                    None => true,
                    Some(&existing) => {
                        if deeper {
                            candidate > existing
                        } else {
                            candidate < existing
                        }
                    }
                };
                if improved {
                    status.levels.insert(next.clone(), candidate);
                    queue.push_back(next);
                }
            }
        }
    };

    relax(anchors, status);
    // Components consisting solely of cycles have neither roots nor leaves; seed them from
    // their first node so the levels map covers every id.
    let unleveled: Vec<String> = network
        .node_indices()
        .into_iter()
        .filter(|id| !status.levels.contains_key(id))
        .collect();
    if !unleveled.is_empty() {
        relax(unleveled, status);
    }
}

fn normalize_levels(status: &mut HierarchicalStatus) {
    let Some(min) = status.levels.values().copied().min() else {
        return;
    };
    if min != 0 {
        for level in status.levels.values_mut() {
            *level -= min;
        }
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Populate parent/child references from edges whose endpoints differ in level (the
/// lower-level endpoint is the parent), assign a tree index per connected component, and
/// determine whether the hierarchy is a formal tree.
fn build_relations(network: &Network, status: &mut HierarchicalStatus) {
    for edge_id in network.edge_indices() {
        let Some(edge) = network.edge(&edge_id) else {
            continue;
        };
        if edge.is_self_loop() {
            continue;
        }
        let (Some(from_level), Some(to_level)) = (
            status.level_of(&edge.from),
            status.level_of(&edge.to),
        ) else {
            continue;
        };
        if from_level < to_level {
            status.add_relation(&edge.from, &edge.to);
        } else if to_level < from_level {
            status.add_relation(&edge.to, &edge.from);
        }
        // Equal levels (only possible inside cycles): no parent/child relation.
    }

    for (tree, component) in alg::components(network).into_iter().enumerate() {
        for id in component {
            status.trees.insert(id, tree);
        }
    }

    status.check_if_tree();
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

struct Placement<'a> {
    options: &'a HierarchicalOptions,
    /// Per-level cursor: the largest occupied free-axis position.
    cursor: BTreeMap<i32, f64>,
    positioned: FxHashSet<String>,
}

impl<'a> Placement<'a> {
    fn next_slot(&mut self, level: i32) -> f64 {
        match self.cursor.get(&level) {
            Some(&max) => max + self.options.node_spacing,
            None => 0.0,
        }
    }

    fn occupy(&mut self, level: i32, pos: f64) {
        let entry = self.cursor.entry(level).or_insert(pos);
        if pos > *entry {
            *entry = pos;
        }
    }
}

/// Pre-order placement: each node takes the next free slot on its level, then its children
/// are placed immediately (depth-first), then the parent is centered over the span of its
/// direct children.
fn place_by_level(
    network: &mut Network,
    options: &HierarchicalOptions,
    strategy: &dyn DirectionStrategy,
    status: &mut HierarchicalStatus,
) {
    for id in network.node_indices() {
        if let Some(&level) = status.levels.get(&id) {
            status
                .distribution_ordering
                .entry(level)
                .or_default()
                .push(id);
        }
    }

    let mut placement = Placement {
        options,
        cursor: BTreeMap::new(),
        positioned: FxHashSet::default(),
    };

    let order: Vec<(i32, Vec<String>)> = status
        .distribution_ordering
        .iter()
        .map(|(level, ids)| (*level, ids.clone()))
        .collect();
    for (level, ids) in order {
        for id in ids {
            if placement.positioned.contains(&id) {
                continue;
            }
            place_node(network, strategy, &mut placement, &id, level);
            place_branch(network, strategy, status, &mut placement, &id);
        }
    }
}

fn place_node(
    network: &mut Network,
    strategy: &dyn DirectionStrategy,
    placement: &mut Placement<'_>,
    id: &str,
    level: i32,
) {
    let pos = placement.next_slot(level);
    if let Some(node) = network.node_mut(id) {
        strategy.set_position(node, pos);
        strategy.fix(node, level, placement.options.level_separation);
    }
    placement.occupy(level, pos);
    placement.positioned.insert(id.to_string());
}

fn place_branch(
    network: &mut Network,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
    placement: &mut Placement<'_>,
    parent: &str,
) {
    let Some(parent_level) = status.level_of(parent) else {
        return;
    };
    let children: Vec<String> = status.children_of(parent).to_vec();
    if children.is_empty() {
        return;
    }

    for child in &children {
        if placement.positioned.contains(child) {
            continue;
        }
        let Some(child_level) = status.level_of(child) else {
            continue;
        };
        if child_level <= parent_level {
            continue;
        }
        place_node(network, strategy, placement, child, child_level);
        place_branch(network, strategy, status, placement, child);
    }

    // Center the parent over the span of its direct children.
    let span: Vec<f64> = children
        .iter()
        .filter(|c| placement.positioned.contains(*c))
        .filter_map(|c| network.node(c).map(|n| strategy.position(n)))
        .collect();
    let Some((min, max)) = min_max(&span) else {
        return;
    };
    let desired = (min + max) / 2.0;
    let current = network
        .node(parent)
        .map(|n| strategy.position(n))
        .unwrap_or(0.0);

    if desired > current {
        // The parent is the most recent node on its level; moving forward is always free.
        if let Some(node) = network.node_mut(parent) {
            strategy.set_position(node, desired);
        }
        placement.occupy(parent_level, desired);
    } else if desired < current && status.is_tree {
        // Centering would move the parent back into occupied space. On a formal tree the
        // subtree is exclusively ours, so shift it forward under the parent instead.
        // Multi-parent hierarchies skip this safety net (known limitation).
        let delta = current - desired;
        shift_branch(network, strategy, status, placement, parent, delta, false);
    }
}

/// Shift a node's entire subtree along the free axis. `include_root` shifts the node
/// itself too. Cycle-safe via a visited set.
fn shift_branch(
    network: &mut Network,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
    placement: &mut Placement<'_>,
    root: &str,
    delta: f64,
    include_root: bool,
) {
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut stack: Vec<String> = if include_root {
        vec![root.to_string()]
    } else {
        visited.insert(root.to_string());
        status.children_of(root).to_vec()
    };

    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if let Some(node) = network.node_mut(&id) {
            strategy.shift(node, delta);
            let pos = strategy.position(node);
            if let Some(level) = status.level_of(&id) {
                placement.occupy(level, pos);
            }
        }
        stack.extend(status.children_of(&id).iter().cloned());
    }
}

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

fn condense_whitespace(
    network: &mut Network,
    options: &HierarchicalOptions,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
) {
    if options.block_shifting {
        shift_blocks(network, options, strategy, status);
    }
    if options.edge_minimization {
        minimize_edge_lengths(network, options, strategy, status);
    }
    if options.parent_centralization {
        centralize_parents(network, options, strategy, status);
    }
}

/// Free-axis bounding range of a subtree, root included.
fn branch_bounds(
    network: &Network,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
    root: &str,
) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut stack = vec![root.to_string()];
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if let Some(node) = network.node(&id) {
            let pos = strategy.position(node);
            min = min.min(pos);
            max = max.max(pos);
        }
        stack.extend(status.children_of(&id).iter().cloned());
    }
    (min, max)
}

/// Pull adjacent sibling branches together until their bounding ranges sit `node_spacing`
/// apart. Bounded passes, stops early once nothing moves.
fn shift_blocks(
    network: &mut Network,
    options: &HierarchicalOptions,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
) {
    let spacing = options.node_spacing;
    let mut placement = Placement {
        options,
        cursor: BTreeMap::new(),
        positioned: FxHashSet::default(),
    };

    for _ in 0..options.block_shifting_passes {
        let mut moved = false;

        for (parent, children) in &status.children_reference {
            if children.len() < 2 {
                continue;
            }
            let tree = status.trees.get(parent);

            let mut ordered = children.clone();
            strategy.sort(network, &mut ordered);

            for pair in 0..ordered.len() - 1 {
                let a = &ordered[pair];
                let b = &ordered[pair + 1];
                if status.trees.get(a) != tree || status.trees.get(b) != tree {
                    continue;
                }
                let (_, a_max) = branch_bounds(network, strategy, status, a);
                let (b_min, _) = branch_bounds(network, strategy, status, b);
                // One delta covers both cases: pull a spread-out branch back, push an
                // overlapping one away, until the ranges sit exactly node_spacing apart.
                let delta = spacing - (b_min - a_max);
                if delta.abs() > 1e-9 {
                    shift_branch(network, strategy, status, &mut placement, b, delta, true);
                    moved = true;
                }
            }
        }

        if !moved {
            break;
        }
    }
}

/// Free interval around a node on its own level: it may move between its positional
/// neighbors, `node_spacing` away from each.
fn free_interval(
    network: &Network,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
    id: &str,
    level: i32,
    spacing: f64,
) -> (f64, f64) {
    let Some(peers) = status.distribution_ordering.get(&level) else {
        return (f64::NEG_INFINITY, f64::INFINITY);
    };
    let mut ordered = peers.clone();
    strategy.sort(network, &mut ordered);
    let Some(idx) = ordered.iter().position(|p| p == id) else {
        return (f64::NEG_INFINITY, f64::INFINITY);
    };

    let lower = if idx > 0 {
        network
            .node(&ordered[idx - 1])
            .map(|n| strategy.position(n) + spacing)
            .unwrap_or(f64::NEG_INFINITY)
    } else {
        f64::NEG_INFINITY
    };
    let upper = if idx + 1 < ordered.len() {
        network
            .node(&ordered[idx + 1])
            .map(|n| strategy.position(n) - spacing)
            .unwrap_or(f64::INFINITY)
    } else {
        f64::INFINITY
    };
    (lower, upper)
}

/// How far a whole subtree may shift along the free axis without coming closer than
/// `spacing` to any node outside it, on any level it occupies. Returns `(min, max)` delta;
/// an empty range means a foreign node sits inside the branch span and the branch must
/// stay put.
fn branch_free_delta_range(
    network: &Network,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
    root: &str,
    spacing: f64,
) -> (f64, f64) {
    let mut members: FxHashSet<String> = FxHashSet::default();
    let mut stack = vec![root.to_string()];
    while let Some(id) = stack.pop() {
        if !members.insert(id.clone()) {
            continue;
        }
        stack.extend(status.children_of(&id).iter().cloned());
    }

    // Free-axis span of the branch per level.
    let mut span: BTreeMap<i32, (f64, f64)> = BTreeMap::new();
    for id in &members {
        let (Some(level), Some(node)) = (status.level_of(id), network.node(id)) else {
            continue;
        };
        let pos = strategy.position(node);
        let entry = span.entry(level).or_insert((pos, pos));
        entry.0 = entry.0.min(pos);
        entry.1 = entry.1.max(pos);
    }

    let mut min_delta = f64::NEG_INFINITY;
    let mut max_delta = f64::INFINITY;
    for (&level, &(branch_min, branch_max)) in &span {
        let Some(peers) = status.distribution_ordering.get(&level) else {
            continue;
        };
        for peer in peers {
            if members.contains(peer) {
                continue;
            }
            let Some(node) = network.node(peer) else {
                continue;
            };
            let pos = strategy.position(node);
            if pos < branch_min {
                min_delta = min_delta.max(pos + spacing - branch_min);
            } else if pos > branch_max {
                max_delta = max_delta.min(pos - spacing - branch_max);
            } else {
                // Foreign node inside the branch span (multi-parent graphs).
                return (0.0, 0.0);
            }
        }
    }
    (min_delta, max_delta)
}

/// Newton's method on the free-axis position of each node, minimizing the summed squared
/// edge length to its parents. The per-step movement clamp prevents oscillation; whole
/// subtrees move with their root on formal trees when the root has children, bounded by
/// the clearance of the entire branch rather than the root alone.
fn minimize_edge_lengths(
    network: &mut Network,
    options: &HierarchicalOptions,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
) {
    let clamp = options.edge_minimization_clamp;
    let spacing = options.node_spacing;
    let mut placement = Placement {
        options,
        cursor: BTreeMap::new(),
        positioned: FxHashSet::default(),
    };

    let levels: Vec<i32> = status.distribution_ordering.keys().copied().collect();

    for _ in 0..options.edge_minimization_passes {
        let mut moved = false;

        // Bottom-up: deepest level first.
        for &level in levels.iter().rev() {
            let ids = status.distribution_ordering[&level].clone();
            for id in ids {
                let Some(parents) = status.parent_reference.get(&id) else {
                    continue;
                };
                if parents.is_empty() {
                    continue;
                }

                let above: Vec<f64> = parents
                    .iter()
                    .filter_map(|p| network.node(p).map(|n| strategy.position(n)))
                    .collect();
                if above.is_empty() {
                    continue;
                }
                // The cost is quadratic, so the Newton target is the parent mean; the
                // iteration exists because each step is clamped.
                let target = above.iter().sum::<f64>() / above.len() as f64;
                let pos = network
                    .node(&id)
                    .map(|n| strategy.position(n))
                    .unwrap_or(0.0);
                let desired = target - pos;

                let branch_move = status.is_tree && !status.children_of(&id).is_empty();
                let (lo, hi) = if branch_move {
                    branch_free_delta_range(network, strategy, status, &id, spacing)
                } else {
                    let (lower, upper) =
                        free_interval(network, strategy, status, &id, level, spacing);
                    (lower - pos, upper - pos)
                };

                let mut delta = 0.0f64;
                for _ in 0..options.edge_minimization_iterations {
                    let step = (desired - delta).clamp(-clamp, clamp);
                    let next = (delta + step).clamp(lo.min(0.0), hi.max(0.0));
                    if (next - delta).abs() < 0.01 {
                        break;
                    }
                    delta = next;
                }

                if delta.abs() >= 0.01 {
                    if branch_move {
                        shift_branch(network, strategy, status, &mut placement, &id, delta, true);
                    } else if let Some(node) = network.node_mut(&id) {
                        strategy.set_position(node, pos + delta);
                    }
                    moved = true;
                }
            }
        }

        if !moved {
            break;
        }
    }
}

/// Re-center each parent over its children's current span where the free interval allows.
fn centralize_parents(
    network: &mut Network,
    options: &HierarchicalOptions,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
) {
    let spacing = options.node_spacing;
    for (parent, children) in &status.children_reference {
        let Some(level) = status.level_of(parent) else {
            continue;
        };
        let span: Vec<f64> = children
            .iter()
            .filter_map(|c| network.node(c).map(|n| strategy.position(n)))
            .collect();
        let Some((min, max)) = min_max(&span) else {
            continue;
        };
        let desired = (min + max) / 2.0;
        let (lower, upper) = free_interval(network, strategy, status, parent, level, spacing);
        if desired >= lower && desired <= upper {
            if let Some(node) = network.node_mut(parent) {
                strategy.set_position(node, desired);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tree separation and centering
// ---------------------------------------------------------------------------

/// Shift each disconnected tree along the free axis so trees sit `tree_spacing` apart.
fn separate_trees(
    network: &mut Network,
    options: &HierarchicalOptions,
    strategy: &dyn DirectionStrategy,
    status: &HierarchicalStatus,
) {
    let trees = status.number_of_trees();
    if trees <= 1 {
        return;
    }

    let mut cursor = 0.0f64;
    for tree in 0..trees {
        let members: Vec<String> = status
            .trees
            .iter()
            .filter(|&(_, &t)| t == tree)
            .map(|(id, _)| id.clone())
            .collect();

        let Some((min, max)) = strategy.span(network, &members) else {
            continue;
        };

        let delta = cursor - min;
        if delta.abs() > f64::EPSILON {
            for id in &members {
                if let Some(node) = network.node_mut(id) {
                    strategy.shift(node, delta);
                }
            }
        }
        cursor = max + delta + options.tree_spacing;
    }
}

/// Translate the whole layout so its bounding-box center sits at the origin; central
/// gravity stays well-behaved that way.
fn center(network: &mut Network) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for node in network.nodes() {
        let (Some(x), Some(y)) = (node.x, node.y) else {
            continue;
        };
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if !(min_x.is_finite() && min_y.is_finite()) {
        return;
    }

    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;
    for id in network.node_indices() {
        if let Some(node) = network.node_mut(&id) {
            node.x = node.x.map(|x| x - cx);
            node.y = node.y.map(|y| y - cy);
        }
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    Some((min, max))
}
