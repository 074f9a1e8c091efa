//! Greedy growth of transport networks and beta sweeps over them.
//!
//! - [`params`]: run parameters and dataset records.
//! - [`growth_engine`]: the propose/evaluate/select/commit loop.
//! - [`observer`]: progress events and their sinks.
//! - [`pareto`]: sweeps across beta and the resulting trade-off curve.

pub mod growth_engine;
pub mod observer;
pub mod params;
pub mod pareto;
