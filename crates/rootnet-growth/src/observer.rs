//! Progress events emitted by the growth engine.
//!
//! The engine never writes logs or files itself; it reports to an injected
//! [`GrowthObserver`]. [`TracingObserver`] forwards events to `tracing`;
//! [`RecordingObserver`] keeps them in memory.

use glam::DVec2;
use rootnet_evaluator::{objective::ObjectiveValue, transport::UnresolvedAcquisition};
use serde::Serialize;

use crate::{growth_engine::Direction, params::GrowthParams};

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GrowthEvent {
    RunStarted {
        params: GrowthParams,
    },
    CandidateEvaluated {
        iteration: usize,
        index: usize,
        direction: Direction,
        position: DVec2,
        value: ObjectiveValue,
    },
    UnresolvedAcquisition {
        iteration: usize,
        candidate: usize,
        acquisition: UnresolvedAcquisition,
    },
    IterationCommitted {
        iteration: usize,
        winner: usize,
        direction: Direction,
        tree_size: usize,
        position: DVec2,
        coverage: u64,
        transport: f64,
        combined_value: f64,
    },
    RunFinished {
        iterations: usize,
        objective: ObjectiveValue,
    },
}

/// Receives growth events.
pub trait GrowthObserver {
    fn on_event(&mut self, event: &GrowthEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl GrowthObserver for NoopObserver {
    fn on_event(&mut self, _event: &GrowthEvent) {}
}

/// Collects every event it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Vec<GrowthEvent>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[GrowthEvent] {
        &self.events
    }

    /// Winning candidate index of each committed iteration, in order.
    pub fn winners(&self) -> impl Iterator<Item = usize> + '_ {
        self.events.iter().filter_map(|e| match e {
            GrowthEvent::IterationCommitted { winner, .. } => Some(*winner),
            _ => None,
        })
    }
}

impl GrowthObserver for RecordingObserver {
    fn on_event(&mut self, event: &GrowthEvent) {
        self.events.push(event.clone());
    }
}

/// Logs events through `tracing`, labelled with the current run.
#[derive(Debug, Default, Clone)]
pub struct TracingObserver {
    run: String,
}

impl TracingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GrowthObserver for TracingObserver {
    fn on_event(&mut self, event: &GrowthEvent) {
        match event {
            GrowthEvent::RunStarted { params } => {
                self.run = format!("{}@{}", params.name, params.beta);
                tracing::info!(
                    run = %self.run,
                    beta = params.beta,
                    segment_length = params.segment_length,
                    n_segments = params.n_segments,
                    radius = params.radius,
                    unit_length = params.unit_length,
                    "growth run started"
                );
            }
            GrowthEvent::CandidateEvaluated {
                iteration,
                index,
                direction,
                position,
                value,
            } => {
                tracing::debug!(
                    run = %self.run,
                    iteration,
                    index,
                    %direction,
                    x = position.x,
                    y = position.y,
                    coverage = value.coverage,
                    transport = value.transport,
                    combined = value.combined_value,
                    "candidate evaluated"
                );
            }
            GrowthEvent::UnresolvedAcquisition {
                iteration,
                candidate,
                acquisition,
            } => {
                tracing::debug!(
                    run = %self.run,
                    iteration,
                    candidate,
                    node = %acquisition.node_id,
                    cells = acquisition.cells,
                    "unresolved acquisition contributed no transport"
                );
            }
            GrowthEvent::IterationCommitted {
                iteration,
                winner,
                direction,
                tree_size,
                position,
                coverage,
                transport,
                combined_value,
            } => {
                tracing::info!(
                    run = %self.run,
                    iteration,
                    winner,
                    %direction,
                    tree_size,
                    x = position.x,
                    y = position.y,
                    coverage,
                    transport,
                    combined = combined_value,
                    "iteration committed"
                );
            }
            GrowthEvent::RunFinished {
                iterations,
                objective,
            } => {
                tracing::info!(
                    run = %self.run,
                    iterations,
                    coverage = objective.coverage,
                    transport = objective.transport,
                    combined = objective.combined_value,
                    "growth run finished"
                );
            }
        }
    }
}
