//! Greedy growth of a transport network.
//!
//! # How It Works
//!
//! The network starts as a single root at `(0, 0)`. Each iteration extends the
//! current tip by one segment:
//!
//! 1. **Propose** - exactly three candidates, in the fixed order left, right, down.
//!    Upward growth is never proposed.
//! 2. **Evaluate** - each candidate copies the committed network, appends its node,
//!    and is scored by the [`ObjectiveCombiner`] on its own clone of the *pristine*
//!    field. Candidates never observe each other's claims.
//! 3. **Select** - the highest combined value wins; ties go to the lowest index.
//! 4. **Commit** - the winner's network, field and tip replace the committed state.
//!
//! # Design: Greedy One-Step Lookahead
//!
//! There is no backtracking and no lookahead beyond the next segment. Every
//! candidate is scored from scratch over the whole network, so an iteration costs
//! three full coverage/transport passes.
//!
//! # Usage
//!
//! ```
//! use rootnet_growth::{
//!     growth_engine::GrowthEngine, observer::NoopObserver, params::GrowthParams,
//! };
//!
//! let params = GrowthParams::new("demo", 0.5, 2.0, 3, 2.0);
//! let engine = GrowthEngine::new(params).unwrap();
//! let outcome = engine.run(&mut NoopObserver).unwrap();
//!
//! assert_eq!(outcome.network.node_count(), 4);
//! assert_eq!(outcome.objective.coverage, 22);
//! ```

use std::thread;

use arrayvec::ArrayVec;
use glam::DVec2;
use rootnet_engine::{
    FieldGeometry, FieldInit, FieldInitError, InvalidFieldError, Network, NodeId, ResourceField,
    ValidationStage,
};
use rootnet_evaluator::objective::{ObjectiveCombiner, ObjectiveEvaluation, ObjectiveValue};
use serde::{Deserialize, Serialize};

use crate::{
    observer::{GrowthEvent, GrowthObserver},
    params::{GrowthParams, ParamError},
};

/// Position of the root node.
pub const ROOT_POSITION: DVec2 = DVec2::ZERO;

const CANDIDATE_COUNT: usize = 3;

/// Growth direction of a candidate, relative to the tip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[display("down")]
    Down,
}

impl Direction {
    /// All proposed directions, in tie-break order.
    pub const ALL: [Self; CANDIDATE_COUNT] = [Self::Left, Self::Right, Self::Down];

    /// Offset from the tip for a segment of `segment_length`.
    #[must_use]
    pub fn offset(self, segment_length: f64) -> DVec2 {
        match self {
            Self::Left => DVec2::new(-segment_length, 0.0),
            Self::Right => DVec2::new(segment_length, 0.0),
            Self::Down => DVec2::new(0.0, segment_length),
        }
    }
}

/// How the candidates of one iteration are evaluated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EvaluationMode {
    #[default]
    Sequential,
    /// One scoped thread per candidate. Selection is unaffected.
    Parallel,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GrowthError {
    #[display("invalid growth parameters")]
    InvalidParams(ParamError),
    #[display("invalid field initializer")]
    InvalidFieldInit(FieldInitError),
    #[display("growth aborted on an invalid field")]
    InvalidField(InvalidFieldError),
}

/// Result of a completed growth run.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthOutcome {
    pub network: Network,
    /// The committed field, carrying the final network's claims.
    pub field: ResourceField,
    /// Objective of the final network.
    pub objective: ObjectiveValue,
    /// Winning objective of every iteration.
    pub history: Vec<ObjectiveValue>,
}

#[derive(Debug)]
struct Candidate {
    direction: Direction,
    node: NodeId,
    network: Network,
    field: ResourceField,
}

#[derive(Debug)]
struct EvaluatedCandidate {
    candidate: Candidate,
    evaluation: ObjectiveEvaluation,
}

/// Greedy tree builder for one set of [`GrowthParams`].
#[derive(Debug, Clone)]
pub struct GrowthEngine {
    params: GrowthParams,
    combiner: ObjectiveCombiner,
    pristine: ResourceField,
}

impl GrowthEngine {
    /// Creates an engine over a uniform resource field.
    pub fn new(params: GrowthParams) -> Result<Self, GrowthError> {
        Self::with_field_transform(params, |field| field)
    }

    /// Creates an engine whose field is built by `init`.
    pub fn with_field_init(params: GrowthParams, init: FieldInit) -> Result<Self, GrowthError> {
        Self::from_field(params, |geometry| Ok(init.build(geometry)?))
    }

    /// Creates an engine whose default field is passed through `transform`.
    ///
    /// The transformed field must be valid; it becomes the pristine field every
    /// candidate starts from.
    pub fn with_field_transform<F>(params: GrowthParams, transform: F) -> Result<Self, GrowthError>
    where
        F: FnOnce(ResourceField) -> ResourceField,
    {
        Self::from_field(params, |geometry| {
            Ok(ResourceField::with_init(geometry, transform))
        })
    }

    fn from_field<F>(params: GrowthParams, make_field: F) -> Result<Self, GrowthError>
    where
        F: FnOnce(FieldGeometry) -> Result<ResourceField, GrowthError>,
    {
        params.validate()?;
        let pristine = make_field(params.field_geometry())?;
        pristine.check(ValidationStage::Construction)?;
        Ok(Self {
            combiner: ObjectiveCombiner::new(params.beta, params.radius),
            params,
            pristine,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    #[must_use]
    pub fn pristine_field(&self) -> &ResourceField {
        &self.pristine
    }

    /// Runs the growth with sequential candidate evaluation.
    pub fn run(&self, observer: &mut dyn GrowthObserver) -> Result<GrowthOutcome, GrowthError> {
        self.run_with(EvaluationMode::Sequential, observer)
    }

    /// Runs `n_segments` iterations and returns the final network.
    ///
    /// Any invalid field aborts the whole run.
    pub fn run_with(
        &self,
        mode: EvaluationMode,
        observer: &mut dyn GrowthObserver,
    ) -> Result<GrowthOutcome, GrowthError> {
        observer.on_event(&GrowthEvent::RunStarted {
            params: self.params.clone(),
        });

        let mut network = Network::new(ROOT_POSITION);
        let mut field = self.pristine.clone();
        let mut tip = NodeId::ROOT;
        let mut history = Vec::with_capacity(self.params.n_segments);

        for iteration in 0..self.params.n_segments {
            let candidates = self.propose(&network, tip);
            let mut evaluated = self.evaluate_candidates(candidates, mode)?;

            for (index, e) in evaluated.iter().enumerate() {
                observer.on_event(&GrowthEvent::CandidateEvaluated {
                    iteration,
                    index,
                    direction: e.candidate.direction,
                    position: e.candidate.network.last_node().position,
                    value: e.evaluation.value,
                });
                for acquisition in &e.evaluation.unresolved {
                    observer.on_event(&GrowthEvent::UnresolvedAcquisition {
                        iteration,
                        candidate: index,
                        acquisition: *acquisition,
                    });
                }
            }

            let values = evaluated
                .iter()
                .map(|e| e.evaluation.value)
                .collect::<ArrayVec<_, CANDIDATE_COUNT>>();
            let winner = select_best(&values).expect("candidates are never empty");
            let EvaluatedCandidate {
                candidate,
                evaluation,
            } = evaluated.swap_remove(winner);

            network = candidate.network;
            field = candidate.field;
            tip = candidate.node;
            field.check(ValidationStage::PostCommit)?;

            let value = evaluation.value;
            observer.on_event(&GrowthEvent::IterationCommitted {
                iteration,
                winner,
                direction: candidate.direction,
                tree_size: network.node_count(),
                position: network.nodes()[tip.0].position,
                coverage: value.coverage,
                transport: value.transport,
                combined_value: value.combined_value,
            });
            history.push(value);
        }

        let objective = *history.last().expect("at least one segment is grown");
        observer.on_event(&GrowthEvent::RunFinished {
            iterations: history.len(),
            objective,
        });

        Ok(GrowthOutcome {
            network,
            field,
            objective,
            history,
        })
    }

    fn propose(&self, network: &Network, tip: NodeId) -> ArrayVec<Candidate, CANDIDATE_COUNT> {
        let origin = network.nodes()[tip.0].position;
        Direction::ALL
            .into_iter()
            .map(|direction| {
                let mut network = network.clone();
                let node =
                    network.add_child(tip, origin + direction.offset(self.params.segment_length));
                Candidate {
                    direction,
                    node,
                    network,
                    field: self.pristine.clone(),
                }
            })
            .collect()
    }

    fn evaluate_candidates(
        &self,
        candidates: ArrayVec<Candidate, CANDIDATE_COUNT>,
        mode: EvaluationMode,
    ) -> Result<ArrayVec<EvaluatedCandidate, CANDIDATE_COUNT>, InvalidFieldError> {
        match mode {
            EvaluationMode::Sequential => candidates
                .into_iter()
                .map(|candidate| self.evaluate_candidate(candidate))
                .collect(),
            EvaluationMode::Parallel => thread::scope(|s| {
                let handles = candidates
                    .into_iter()
                    .map(|candidate| s.spawn(move || self.evaluate_candidate(candidate)))
                    .collect::<ArrayVec<_, CANDIDATE_COUNT>>();
                // joined in proposal order, so indices match `Direction::ALL`
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect()
            }),
        }
    }

    fn evaluate_candidate(
        &self,
        mut candidate: Candidate,
    ) -> Result<EvaluatedCandidate, InvalidFieldError> {
        let evaluation = self
            .combiner
            .evaluate(&candidate.network, &mut candidate.field)?;
        Ok(EvaluatedCandidate {
            candidate,
            evaluation,
        })
    }
}

/// Index of the first maximal combined value, or `None` for an empty slice.
#[must_use]
pub fn select_best(values: &[ObjectiveValue]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value.combined_value <= best_value => {}
            _ => best = Some((index, value.combined_value)),
        }
    }
    best.map(|(index, _)| index)
}
