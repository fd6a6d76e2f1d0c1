//! Facade binding the layout and physics engines into the canonical data flow:
//! initial placement, then force simulation, with positions readable every frame.
//!
//! Hosts with their own frame scheduler call [`Simulation::frame`] once per animation
//! tick; batch users call [`Simulation::run_to_stabilization`]. Both paths are bounded
//! per call and stoppable between frames, so a host event loop is never blocked for
//! longer than one step.

use crate::error::Result;
use crate::graphlib::Network;
use crate::layout::{LayoutEngine, LayoutEvent, ReductionHook};
use crate::options::{LayoutOptions, PhysicsOptions, Solver};
use crate::physics::{Phase, PhysicsEngine, PhysicsEvent};

pub struct Simulation {
    pub network: Network,
    layout: LayoutEngine,
    physics: PhysicsEngine,
    initialized: bool,
}

/// Events from both engines, in emission order per engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    Layout(LayoutEvent),
    Physics(PhysicsEvent),
}

impl Simulation {
    /// A hierarchical layout pairs with the hierarchical repulsion solver; the other
    /// placement modes keep whatever solver the physics options picked.
    pub fn new(network: Network, layout: LayoutOptions, physics: PhysicsOptions) -> Self {
        let physics = if layout.hierarchical.enabled
            && physics.solver != Solver::HierarchicalRepulsion
        {
            PhysicsOptions::for_solver(Solver::HierarchicalRepulsion)
        } else {
            physics
        };
        Self {
            network,
            layout: LayoutEngine::new(layout),
            physics: PhysicsEngine::new(physics),
            initialized: false,
        }
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn physics(&self) -> &PhysicsEngine {
        &self.physics
    }

    /// Initial placement plus simulation warm-up. Idempotent until the topology changes;
    /// call [`Simulation::topology_changed`] after edits.
    pub fn initialize(&mut self, hook: Option<&mut dyn ReductionHook>) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.layout.position_initially(&mut self.network, hook)?;
        self.physics.init_from(&self.network);
        self.initialized = true;
        Ok(())
    }

    /// Nodes or edges were added/removed: rebuild simulation state and re-enter
    /// `Stepping`. Existing positions seed the new placement pass (scatter leaves them
    /// alone; Kamada-Kawai refines from them).
    pub fn topology_changed(&mut self, hook: Option<&mut dyn ReductionHook>) -> Result<()> {
        self.initialized = false;
        self.initialize(hook)
    }

    /// One cooperative frame: a single physics step with positions written back.
    /// Returns the stabilization metric (0 once stabilized).
    pub fn frame(&mut self) -> f64 {
        self.physics.tick(&mut self.network)
    }

    /// Run the whole stabilization budget synchronously.
    pub fn run_to_stabilization(&mut self) {
        self.physics.stabilize(&mut self.network);
    }

    pub fn is_stabilized(&self) -> bool {
        self.physics.phase() == Phase::Stabilized
    }

    /// Stop at the current frame boundary; partial positions stay as they are.
    pub fn stop(&mut self) {
        self.physics.stop();
    }

    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        let mut out: Vec<SimulationEvent> = self
            .layout
            .drain_events()
            .into_iter()
            .map(SimulationEvent::Layout)
            .collect();
        out.extend(
            self.physics
                .drain_events()
                .into_iter()
                .map(SimulationEvent::Physics),
        );
        out
    }
}
