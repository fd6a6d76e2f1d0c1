//! Initial placement and layout orchestration.
//!
//! The decision policy on (re)load:
//!
//! 1. hierarchical enabled → full hierarchical pipeline ([`hierarchical`]);
//! 2. `improved_layout` → seeded scatter followed by Kamada-Kawai refinement, guarded by
//!    the cluster threshold;
//! 3. otherwise → seeded scatter only, and the physics simulation does the rest.
//!
//! Nodes with user-provided coordinates are never overwritten by any of these.

pub mod direction;
pub mod hierarchical;

use crate::error::Result;
use crate::graphlib::Network;
use crate::kamada_kawai::KamadaKawai;
use crate::options::LayoutOptions;
use crate::util::{XorShift64Star, entropy_seed};

pub use hierarchical::{EdgeLeveler, HierarchicalStatus};

/// Bounded number of aggregation rounds before the improved layout gives up.
const MAX_REDUCTION_ROUNDS: usize = 10;

/// Seam for the cluster-threshold path of the improved layout. Actual node aggregation
/// lives outside this crate; the engine only drives rounds and detects stalls.
pub trait ReductionHook {
    /// Perform one aggregation round. Returns the active node count afterwards.
    fn reduce_round(&mut self, network: &mut Network) -> usize;

    /// Undo all aggregation. Returns the ids of the nodes freed back into the network
    /// (each positioned where its aggregate was); the engine jitters those so the
    /// integrator starts from a non-degenerate gradient.
    fn expand_all(&mut self, network: &mut Network) -> Vec<String>;
}

/// Notifications drained by the caller; none of these interrupt layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    /// Most nodes already carried positions, so Kamada-Kawai was skipped entirely.
    ImprovedLayoutSkipped { position_defined: usize, total: usize },
    /// The graph stayed above the cluster threshold (no hook, or the hook stalled);
    /// fell back to scatter + plain physics.
    ImprovedLayoutAborted { remaining: usize, threshold: usize },
}

pub struct LayoutEngine {
    options: LayoutOptions,
    seed: u64,
    rng: XorShift64Star,
    status: Option<HierarchicalStatus>,
    leveler: Option<Box<EdgeLeveler>>,
    events: Vec<LayoutEvent>,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        let seed = options.random_seed.unwrap_or_else(entropy_seed);
        Self {
            options,
            seed,
            rng: XorShift64Star::new(seed),
            status: None,
            leveler: None,
            events: Vec::new(),
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// The seed in effect, auto-generated or configured; pin it to reproduce a layout.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Install a custom level increment for the directed hierarchical crawl.
    pub fn set_edge_leveler(&mut self, leveler: Box<EdgeLeveler>) {
        self.leveler = Some(leveler);
    }

    /// Status of the last hierarchical run, if any.
    pub fn hierarchical_status(&self) -> Option<&HierarchicalStatus> {
        self.status.as_ref()
    }

    /// Renderer hint for edge drawing under the configured hierarchical orientation.
    pub fn curve_type(&self) -> &'static str {
        hierarchical::curve_type(&self.options.hierarchical)
    }

    pub fn drain_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events)
    }

    /// Compute initial positions for every node that needs one.
    pub fn position_initially(
        &mut self,
        network: &mut Network,
        hook: Option<&mut dyn ReductionHook>,
    ) -> Result<()> {
        if self.options.hierarchical.enabled {
            return self.setup_hierarchical_layout(network).map(|_| ());
        }

        self.scatter(network);
        if self.options.improved_layout {
            self.improved_placement(network, hook);
        }
        Ok(())
    }

    /// Run the hierarchical pipeline and keep its status for callers.
    pub fn setup_hierarchical_layout(
        &mut self,
        network: &mut Network,
    ) -> Result<&HierarchicalStatus> {
        let status = hierarchical::setup(
            network,
            &self.options.hierarchical,
            self.leveler.as_deref(),
        )?;
        self.status = Some(status);
        Ok(self.status.as_ref().expect("status just stored"))
    }

    /// Scatter unpositioned nodes uniformly on a circle of radius `node_count + 50`, one
    /// seeded pseudo-random angle per node. Nodes that already have coordinates keep them.
    fn scatter(&mut self, network: &mut Network) {
        let radius = network.node_count() as f64 + 50.0;
        for id in network.node_indices() {
            let Some(node) = network.node(&id) else {
                continue;
            };
            if node.is_positioned() {
                // Burn one sample anyway so adding a predefined node does not reshuffle
                // every other node's angle under the same seed.
                let _ = self.rng.next_f64_unit();
                continue;
            }
            let angle = std::f64::consts::TAU * self.rng.next_f64_unit();
            if let Some(node) = network.node_mut(&id) {
                node.x = Some(radius * angle.cos());
                node.y = Some(radius * angle.sin());
            }
        }
    }

    /// Kamada-Kawai refinement with the cluster-threshold guard around it.
    fn improved_placement(&mut self, network: &mut Network, hook: Option<&mut dyn ReductionHook>) {
        let total = network.node_count();
        if total == 0 {
            return;
        }

        let position_defined = network
            .nodes()
            .filter(|n| n.predefined_position)
            .count();
        if position_defined as f64 > 0.5 * total as f64 {
            // The user placed most of the graph already; refining the rest would tear
            // their arrangement apart.
            self.events.push(LayoutEvent::ImprovedLayoutSkipped {
                position_defined,
                total,
            });
            return;
        }

        let threshold = self.options.cluster_threshold;
        let mut freed: Vec<String> = Vec::new();

        if total > threshold {
            let Some(hook) = hook else {
                tracing::info!(
                    nodes = total,
                    threshold,
                    "graph above cluster threshold and no reduction hook; falling back to scatter"
                );
                self.events.push(LayoutEvent::ImprovedLayoutAborted {
                    remaining: total,
                    threshold,
                });
                return;
            };

            let mut remaining = total;
            let mut stalled = 0usize;
            let mut rounds = 0usize;
            while remaining > threshold && rounds < MAX_REDUCTION_ROUNDS {
                rounds += 1;
                let after = hook.reduce_round(network);
                if after >= remaining {
                    stalled += 1;
                    if stalled >= 2 {
                        break;
                    }
                } else {
                    stalled = 0;
                }
                remaining = after;
            }

            if stalled >= 2 {
                // Two rounds without progress: undo everything and let plain physics
                // untangle the scatter instead.
                tracing::info!(
                    remaining,
                    threshold,
                    "reduction stalled; aborting improved layout"
                );
                hook.expand_all(network);
                self.events.push(LayoutEvent::ImprovedLayoutAborted {
                    remaining,
                    threshold,
                });
                return;
            }
            if remaining > threshold {
                tracing::info!(
                    remaining,
                    threshold,
                    "proceeding with partially reduced graph"
                );
            }

            // Aggregates may have introduced fresh nodes after the scatter pass.
            self.scatter(network);
            self.kamada_kawai().solve(network);
            freed = hook.expand_all(network);
        } else {
            self.kamada_kawai().solve(network);
        }

        // Freed nodes sit exactly on their aggregate's position; nudge them apart so the
        // integrator sees a usable gradient.
        for id in freed {
            let dx = self.rng.next_f64_signed() * 50.0;
            let dy = self.rng.next_f64_signed() * 50.0;
            if let Some(node) = network.node_mut(&id) {
                node.x = Some(node.x.unwrap_or(0.0) + dx);
                node.y = Some(node.y.unwrap_or(0.0) + dy);
            }
        }
    }

    fn kamada_kawai(&self) -> KamadaKawai {
        KamadaKawai {
            threshold: self.options.kamada_kawai_threshold,
            inner_iterations: self.options.kamada_kawai_inner_iterations,
            ..KamadaKawai::default()
        }
    }
}
