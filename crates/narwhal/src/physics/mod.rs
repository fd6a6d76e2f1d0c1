//! The iterative force simulation.
//!
//! The engine copies the network into dense per-node arrays (positions, velocities, force
//! accumulators), runs damped-Euler integration steps until the maximum node speed falls
//! below `min_velocity`, and writes positions back. Velocities live only here; the
//! container never sees them.
//!
//! One step is bounded work and the loop is resumable at any step boundary, so a host can
//! drive one [`PhysicsEngine::tick`] per animation frame or run a whole
//! [`PhysicsEngine::stabilize`] budget at once.

use crate::graphlib::Network;
use crate::options::{PhysicsOptions, Solver};
use rustc_hash::FxHashMap;

pub mod barnes_hut;
pub mod central_gravity;
pub mod force_atlas2;
pub mod hierarchical_repulsion;
pub mod repulsion;
pub mod spring;

/// Simulation phase. `Stepping → Stabilized` happens when the maximum node speed drops
/// below `min_velocity`; anything that can move nodes again goes back to `Stepping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Stepping,
    Stabilized,
}

/// Notifications drained by the caller once per frame. Explicit queue instead of emitter
/// fan-out so state transitions stay testable in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysicsEvent {
    StabilizationProgress { iterations: usize, total: usize },
    StabilizationDone { iterations: usize, converged: bool },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SimEdge {
    pub a: usize,
    pub b: usize,
    pub length: Option<f64>,
    /// Absolute level difference of the endpoints; 0 outside hierarchical layouts.
    pub level_span: i32,
}

/// Dense mirror of the active nodes and connected, physics-enabled edges.
#[derive(Debug, Clone, Default)]
pub(crate) struct SimState {
    pub ids: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
    pub fx: Vec<f64>,
    pub fy: Vec<f64>,
    pub mass: Vec<f64>,
    pub size: Vec<f64>,
    pub fixed_x: Vec<bool>,
    pub fixed_y: Vec<bool>,
    /// Frozen by the `only_dynamic_edges` stabilization option.
    pub frozen: Vec<bool>,
    pub degree: Vec<usize>,
    pub level: Vec<Option<i32>>,
    pub edges: Vec<SimEdge>,
    pub index: FxHashMap<String, usize>,
}

impl SimState {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    fn from_network(network: &Network, options: &PhysicsOptions) -> Self {
        let ids = network.node_indices();
        let n = ids.len();
        let index: FxHashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut state = Self {
            ids,
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            vx: vec![0.0; n],
            vy: vec![0.0; n],
            fx: vec![0.0; n],
            fy: vec![0.0; n],
            mass: Vec::with_capacity(n),
            size: Vec::with_capacity(n),
            fixed_x: Vec::with_capacity(n),
            fixed_y: Vec::with_capacity(n),
            frozen: vec![false; n],
            degree: Vec::with_capacity(n),
            level: Vec::with_capacity(n),
            edges: Vec::new(),
            index,
        };

        for id in &state.ids {
            let node = network.node(id).expect("node listed in index");
            state.x.push(node.x.unwrap_or(0.0));
            state.y.push(node.y.unwrap_or(0.0));
            state.mass.push(node.mass);
            state.size.push(node.size);
            state.fixed_x.push(node.fixed.x);
            state.fixed_y.push(node.fixed.y);
            state.degree.push(network.degree(id));
            state.level.push(node.level);
        }

        // Self-loops contribute no spring force; edges with a missing endpoint never made it
        // into the active edge index.
        for edge_id in network.edge_indices() {
            let edge = network.edge(&edge_id).expect("edge listed in index");
            if !edge.physics || edge.is_self_loop() {
                continue;
            }
            let (Some(&a), Some(&b)) = (state.index.get(&edge.from), state.index.get(&edge.to))
            else {
                continue;
            };
            let level_span = match (state.level[a], state.level[b]) {
                (Some(la), Some(lb)) => (la - lb).abs(),
                _ => 0,
            };
            state.edges.push(SimEdge {
                a,
                b,
                length: edge.length,
                level_span,
            });
        }

        if options.stabilization.only_dynamic_edges {
            for i in 0..state.len() {
                let incident = network.connected_edges(&state.ids[i]);
                if !incident.is_empty()
                    && incident
                        .iter()
                        .filter_map(|eid| network.edge(eid))
                        .all(|e| !e.physics)
                {
                    state.frozen[i] = true;
                }
            }
        }

        state
    }
}

pub struct PhysicsEngine {
    options: PhysicsOptions,
    state: SimState,
    phase: Phase,
    /// Current (possibly adapted) timestep.
    timestep: f64,
    iterations: usize,
    prev_max_velocity: f64,
    events: Vec<PhysicsEvent>,
}

impl PhysicsEngine {
    pub fn new(options: PhysicsOptions) -> Self {
        let timestep = options.timestep;
        Self {
            options,
            state: SimState::default(),
            phase: Phase::Idle,
            timestep,
            iterations: 0,
            prev_max_velocity: f64::INFINITY,
            events: Vec::new(),
        }
    }

    pub fn options(&self) -> &PhysicsOptions {
        &self.options
    }

    /// Replacing options can move nodes, so the engine drops back to `Stepping`.
    pub fn set_options(&mut self, options: PhysicsOptions) {
        self.timestep = options.timestep;
        self.options = options;
        self.wake();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_stabilized(&self) -> bool {
        self.phase == Phase::Stabilized
    }

    /// Steps taken since the last init or wake.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// (Re)build the simulation arrays from the network. Call after any topology change.
    pub fn init_from(&mut self, network: &Network) {
        self.state = SimState::from_network(network, &self.options);
        self.iterations = 0;
        self.timestep = self.options.timestep;
        self.prev_max_velocity = f64::INFINITY;
        self.phase = if self.options.enabled {
            Phase::Stepping
        } else {
            Phase::Idle
        };
    }

    /// Re-enter `Stepping` after a topology or option change while keeping velocities.
    pub fn wake(&mut self) {
        if self.options.enabled {
            self.phase = Phase::Stepping;
            self.iterations = 0;
        }
    }

    /// External cancellation at a frame boundary. Partial state is kept, not rolled back.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only position snapshot for one node.
    pub fn position_of(&self, id: &str) -> Option<(f64, f64)> {
        let i = self.state.index.get(id).copied()?;
        Some((self.state.x[i], self.state.y[i]))
    }

    /// Pin or release a node's axes at runtime (interaction layers use this while a drag
    /// is in progress). Releasing an axis re-enters `Stepping`.
    pub fn set_node_fixed(&mut self, id: &str, x: bool, y: bool) -> crate::Result<()> {
        let Some(&i) = self.state.index.get(id) else {
            return Err(crate::Error::UnknownNode {
                node_id: id.to_string(),
            });
        };
        self.state.fixed_x[i] = x;
        self.state.fixed_y[i] = y;
        if x {
            self.state.vx[i] = 0.0;
        }
        if y {
            self.state.vy[i] = 0.0;
        }
        self.wake();
        Ok(())
    }

    /// Move a dragged node to a pointer position. Velocity is discarded so the node does
    /// not fling off when released; the rest of the graph keeps simulating around it.
    pub fn drag_node(&mut self, id: &str, x: f64, y: f64) -> crate::Result<()> {
        let Some(&i) = self.state.index.get(id) else {
            return Err(crate::Error::UnknownNode {
                node_id: id.to_string(),
            });
        };
        if x.is_finite() {
            self.state.x[i] = x;
        }
        if y.is_finite() {
            self.state.y[i] = y;
        }
        self.state.vx[i] = 0.0;
        self.state.vy[i] = 0.0;
        self.wake();
        Ok(())
    }

    /// One simulation step: accumulate solver forces, integrate, return the maximum node
    /// speed (the stabilization metric).
    pub fn step(&mut self) -> f64 {
        if self.state.len() == 0 {
            self.phase = Phase::Stabilized;
            return 0.0;
        }

        self.calculate_forces();
        let max_velocity = self.integrate();
        self.iterations += 1;

        if self.options.adaptive_timestep {
            self.adapt_timestep(max_velocity);
        }
        self.prev_max_velocity = max_velocity;

        if max_velocity < self.options.min_velocity {
            self.phase = Phase::Stabilized;
        }
        max_velocity
    }

    /// One renderer-driven frame: step once and write positions back.
    pub fn tick(&mut self, network: &mut Network) -> f64 {
        if self.phase != Phase::Stepping {
            return 0.0;
        }
        let max_velocity = self.step();
        self.write_positions(network);
        max_velocity
    }

    /// Run the stabilization budget to completion. Exhausting the budget without reaching
    /// the velocity threshold is reported through the event queue, not an error.
    pub fn stabilize(&mut self, network: &mut Network) {
        if !self.options.enabled || !self.options.stabilization.enabled {
            self.phase = Phase::Stabilized;
            return;
        }

        self.init_from(network);
        let total = self.options.stabilization.iterations;
        let update_interval = self.options.stabilization.update_interval.max(1);
        let mut converged = false;
        let mut done = 0usize;

        for it in 1..=total {
            let max_velocity = self.step();
            done = it;
            if it % update_interval == 0 {
                self.events.push(PhysicsEvent::StabilizationProgress {
                    iterations: it,
                    total,
                });
            }
            if max_velocity < self.options.min_velocity {
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::info!(
                iterations = done,
                threshold = self.options.min_velocity,
                "stabilization budget exhausted before convergence; using partial result"
            );
        }
        self.phase = Phase::Stabilized;
        self.events.push(PhysicsEvent::StabilizationDone {
            iterations: done,
            converged,
        });
        self.write_positions(network);
    }

    /// Copy simulation positions back onto the container. Fixed axes were never mutated.
    pub fn write_positions(&self, network: &mut Network) {
        for i in 0..self.state.len() {
            if let Some(node) = network.node_mut(&self.state.ids[i]) {
                node.x = Some(self.state.x[i]);
                node.y = Some(self.state.y[i]);
            }
        }
    }

    fn calculate_forces(&mut self) {
        let state = &mut self.state;
        state.fx.fill(0.0);
        state.fy.fill(0.0);

        match self.options.solver {
            Solver::BarnesHut => {
                barnes_hut::solve(state, &self.options);
                central_gravity::solve(state, &self.options);
                spring::solve(state, &self.options);
            }
            Solver::Repulsion => {
                repulsion::solve(state, &self.options);
                central_gravity::solve(state, &self.options);
                spring::solve(state, &self.options);
            }
            Solver::ForceAtlas2Based => {
                force_atlas2::solve(state, &self.options);
                central_gravity::solve_linear(state, &self.options);
                spring::solve(state, &self.options);
            }
            Solver::HierarchicalRepulsion => {
                hierarchical_repulsion::solve(state, &self.options);
                central_gravity::solve(state, &self.options);
                spring::solve_hierarchical(state, &self.options);
            }
        }
    }

    /// Damped Euler step. A fixed axis keeps its velocity component zeroed and its
    /// coordinate untouched; non-finite forces are absorbed by zeroing the velocity.
    fn integrate(&mut self) -> f64 {
        let state = &mut self.state;
        let dt = self.timestep;
        let damping = self.options.damping;
        let max_velocity = self.options.max_velocity;
        let mut max_speed = 0.0f64;

        for i in 0..state.len() {
            if state.frozen[i] {
                state.vx[i] = 0.0;
                state.vy[i] = 0.0;
                continue;
            }

            if state.fixed_x[i] {
                state.vx[i] = 0.0;
            } else {
                let drag = damping * state.vx[i];
                let ax = (state.fx[i] - drag) / state.mass[i];
                let mut vx = state.vx[i] + ax * dt;
                if !vx.is_finite() {
                    tracing::warn!(node = %state.ids[i], "non-finite x velocity; resetting to zero");
                    vx = 0.0;
                }
                state.vx[i] = vx.clamp(-max_velocity, max_velocity);
                let x = state.x[i] + state.vx[i] * dt;
                if x.is_finite() {
                    state.x[i] = x;
                } else {
                    state.vx[i] = 0.0;
                }
            }

            if state.fixed_y[i] {
                state.vy[i] = 0.0;
            } else {
                let drag = damping * state.vy[i];
                let ay = (state.fy[i] - drag) / state.mass[i];
                let mut vy = state.vy[i] + ay * dt;
                if !vy.is_finite() {
                    tracing::warn!(node = %state.ids[i], "non-finite y velocity; resetting to zero");
                    vy = 0.0;
                }
                state.vy[i] = vy.clamp(-max_velocity, max_velocity);
                let y = state.y[i] + state.vy[i] * dt;
                if y.is_finite() {
                    state.y[i] = y;
                } else {
                    state.vy[i] = 0.0;
                }
            }

            let speed = (state.vx[i] * state.vx[i] + state.vy[i] * state.vy[i]).sqrt();
            max_speed = max_speed.max(speed);
        }
        max_speed
    }

    /// Grow the timestep while the simulation keeps calming down, shrink it hard when the
    /// maximum speed regresses. Bounded to `[timestep, 10 × timestep]` of the configured
    /// value so a single run cannot diverge.
    fn adapt_timestep(&mut self, max_velocity: f64) {
        let base = self.options.timestep;
        if max_velocity < self.prev_max_velocity {
            self.timestep = (self.timestep * 1.2).min(base * 10.0);
        } else {
            self.timestep = (self.timestep / 4.0).max(base);
        }
    }
}
