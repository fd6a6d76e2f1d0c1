//! Option surface for the physics and layout engines.
//!
//! Defaults mirror the upstream per-solver tuning: selecting a solver family swaps in that
//! family's constants via [`PhysicsOptions::for_solver`] unless the caller overrides them.
//! Iteration caps and thresholds are tuning defaults, not invariants.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Solver {
    #[default]
    BarnesHut,
    Repulsion,
    ForceAtlas2Based,
    HierarchicalRepulsion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsOptions {
    pub enabled: bool,
    pub solver: Solver,
    /// Barnes-Hut accuracy parameter: lower is more accurate and slower.
    pub theta: f64,
    /// Negative values repulse.
    pub gravitational_constant: f64,
    pub central_gravity: f64,
    pub spring_length: f64,
    pub spring_constant: f64,
    /// Minimum separation enforced by the pairwise and hierarchical repulsion solvers.
    pub node_distance: f64,
    pub damping: f64,
    /// 0 disables overlap avoidance; 1 uses the full node radius as hard spacing.
    pub avoid_overlap: f64,
    /// Below this per-step speed the simulation counts as stabilized.
    pub min_velocity: f64,
    pub max_velocity: f64,
    pub timestep: f64,
    pub adaptive_timestep: bool,
    pub stabilization: StabilizationOptions,
}

impl Default for PhysicsOptions {
    fn default() -> Self {
        // Barnes-Hut family defaults.
        Self {
            enabled: true,
            solver: Solver::BarnesHut,
            theta: 0.5,
            gravitational_constant: -2000.0,
            central_gravity: 0.3,
            spring_length: 95.0,
            spring_constant: 0.04,
            node_distance: 100.0,
            damping: 0.09,
            avoid_overlap: 0.0,
            min_velocity: 0.1,
            max_velocity: 50.0,
            timestep: 0.5,
            adaptive_timestep: false,
            stabilization: StabilizationOptions::default(),
        }
    }
}

impl PhysicsOptions {
    /// Defaults tuned for the given solver family.
    pub fn for_solver(solver: Solver) -> Self {
        let base = Self::default();
        match solver {
            Solver::BarnesHut => base,
            Solver::Repulsion => Self {
                solver,
                gravitational_constant: 0.0,
                central_gravity: 0.2,
                spring_length: 200.0,
                spring_constant: 0.05,
                node_distance: 100.0,
                damping: 0.09,
                ..base
            },
            Solver::ForceAtlas2Based => Self {
                solver,
                gravitational_constant: -50.0,
                central_gravity: 0.01,
                spring_length: 100.0,
                spring_constant: 0.08,
                damping: 0.4,
                ..base
            },
            Solver::HierarchicalRepulsion => Self {
                solver,
                gravitational_constant: 0.0,
                central_gravity: 0.0,
                spring_length: 100.0,
                spring_constant: 0.01,
                node_distance: 120.0,
                damping: 0.09,
                ..base
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StabilizationOptions {
    pub enabled: bool,
    /// Iteration budget for a stabilization run. Exhausting it is reported, not an error.
    pub iterations: usize,
    /// A progress event is emitted every this many iterations.
    pub update_interval: usize,
    /// Freeze nodes whose edges all have physics disabled.
    pub only_dynamic_edges: bool,
    /// Renderer hint: fit the viewport after stabilization. Not interpreted by the engine.
    pub fit: bool,
}

impl Default for StabilizationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            iterations: 1000,
            update_interval: 50,
            only_dynamic_edges: false,
            fit: true,
        }
    }
}

/// Orientation of the hierarchical layout. The first axis letter is where roots sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Up-down: y is determined by level, x is free.
    #[default]
    UD,
    /// Down-up.
    DU,
    /// Left-right: x is determined by level, y is free.
    LR,
    /// Right-left.
    RL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
    /// Repeatedly crawl outward from the highest-degree unleveled node.
    #[default]
    Hubsize,
    /// Assign levels respecting edge direction.
    Directed,
}

/// Which end of the graph the directed level assignment anchors at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShakeTowards {
    Roots,
    #[default]
    Leaves,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HierarchicalOptions {
    pub enabled: bool,
    /// Distance between levels along the fixed axis.
    pub level_separation: f64,
    /// Minimum distance between nodes on the free axis.
    pub node_spacing: f64,
    /// Distance between disconnected trees.
    pub tree_spacing: f64,
    pub block_shifting: bool,
    pub edge_minimization: bool,
    pub parent_centralization: bool,
    pub direction: Direction,
    pub sort_method: SortMethod,
    pub shake_towards: ShakeTowards,
    /// Passes of the block-shifting condensation step.
    pub block_shifting_passes: usize,
    /// Outer bottom-up sweeps of the edge-length minimization step.
    pub edge_minimization_passes: usize,
    /// Newton iterations per node inside edge-length minimization.
    pub edge_minimization_iterations: usize,
    /// Per-step movement clamp inside edge-length minimization.
    pub edge_minimization_clamp: f64,
}

impl Default for HierarchicalOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            level_separation: 150.0,
            node_spacing: 100.0,
            tree_spacing: 200.0,
            block_shifting: true,
            edge_minimization: true,
            parent_centralization: true,
            direction: Direction::UD,
            sort_method: SortMethod::Hubsize,
            shake_towards: ShakeTowards::Leaves,
            block_shifting_passes: 5,
            edge_minimization_passes: 20,
            edge_minimization_iterations: 1000,
            edge_minimization_clamp: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    /// Seed for deterministic randomness. The upstream JS implementation relies on
    /// `Math.random`, so the Rust port uses a reproducible RNG here; `None` derives a seed
    /// from the clock, readable back for reproduction.
    pub random_seed: Option<u64>,
    /// Run Kamada-Kawai for initial placement instead of plain scatter.
    pub improved_layout: bool,
    /// Above this active-node count, Kamada-Kawai requires an external reduction hook.
    pub cluster_threshold: usize,
    /// Gradient threshold ending the Kamada-Kawai outer loop.
    pub kamada_kawai_threshold: f64,
    /// Inner refinement cap per chosen node in Kamada-Kawai.
    pub kamada_kawai_inner_iterations: usize,
    pub hierarchical: HierarchicalOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            random_seed: None,
            improved_layout: true,
            cluster_threshold: 150,
            kamada_kawai_threshold: 0.01,
            kamada_kawai_inner_iterations: 5,
            hierarchical: HierarchicalOptions::default(),
        }
    }
}
