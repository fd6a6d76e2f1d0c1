//! Node/edge container APIs used by `narwhal`.
//!
//! Baseline: the `body.nodes` / `body.edges` collections of `visjs/vis-network`.
//!
//! This crate holds the core [`Network`] container plus a small set of helper algorithms
//! re-exported as `narwhal_graphlib::alg`. The container is deliberately free of any layout
//! or physics knowledge so tests can construct minimal graphs without the engine.

mod graph;

pub mod alg;

pub use graph::{Edge, Fixed, Network, Node};
