#![forbid(unsafe_code)]

//! Network graph physics simulation and layout algorithms.
//!
//! Baseline: the physics/layout modules of `visjs/vis-network` (headless; the renderer and
//! interaction layers live elsewhere and only read positions back).
//!
//! The crate is split along the same seams as the upstream library:
//!
//! - [`physics`]: the iterative force simulation, with solver families (Barnes-Hut, pairwise
//!   repulsion, ForceAtlas2-based, hierarchical repulsion), springs, central gravity, and the
//!   engine that integrates forces until the layout stabilizes.
//! - [`layout`]: initial placement (seeded scatter or Kamada-Kawai) and the hierarchical
//!   layout with its whitespace condensation passes.
//! - [`kamada_kawai`] / [`floyd_warshall`]: the one-shot energy-minimization placement and
//!   the all-pairs distance matrix feeding it.
//!
//! All randomness is seeded and all iteration orders are deterministic, so a fixed
//! [`LayoutOptions::random_seed`] reproduces layouts exactly.

pub use narwhal_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod floyd_warshall;
pub mod kamada_kawai;
pub mod layout;
pub mod options;
pub mod physics;
pub mod simulation;
pub mod util;

pub use error::{Error, Result};
pub use layout::{HierarchicalStatus, LayoutEngine, LayoutEvent, ReductionHook};
pub use options::{
    Direction, HierarchicalOptions, LayoutOptions, PhysicsOptions, ShakeTowards, Solver,
    SortMethod, StabilizationOptions,
};
pub use physics::{Phase, PhysicsEngine, PhysicsEvent};
pub use simulation::{Simulation, SimulationEvent};
