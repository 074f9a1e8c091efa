//! Beta sweeps and the coverage/transport trade-off curve.
//!
//! A sweep runs one growth per beta on identical parameters otherwise. Each run
//! stands alone: a failing beta is recorded in its [`SweepEntry`] and the
//! remaining betas still run.

use rootnet_engine::FieldInit;
use rootnet_evaluator::objective::ObjectiveValue;
use serde::{Deserialize, Serialize};

use crate::{
    growth_engine::{EvaluationMode, GrowthEngine, GrowthError, GrowthOutcome},
    observer::GrowthObserver,
    params::GrowthParams,
};

/// Betas swept when none are configured. Zero is excluded.
pub const DEFAULT_BETAS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    pub beta: f64,
    pub coverage: u64,
    pub transport: f64,
    pub combined_value: f64,
}

impl From<ObjectiveValue> for ParetoPoint {
    fn from(value: ObjectiveValue) -> Self {
        Self {
            beta: value.beta,
            coverage: value.coverage,
            transport: value.transport,
            combined_value: value.combined_value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub beta: f64,
    pub coverage: f64,
    pub transport: f64,
}

/// Final objectives of one record across betas, in sweep order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoCurve {
    pub name: String,
    pub points: Vec<ParetoPoint>,
}

impl ParetoCurve {
    #[must_use]
    pub fn from_points(name: impl Into<String>, points: Vec<ParetoPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Min-max normalizes both axes to `[0, 1]`.
    ///
    /// An axis whose values are all equal is left as is.
    #[must_use]
    pub fn normalized(&self) -> Vec<NormalizedPoint> {
        #[expect(clippy::cast_precision_loss)]
        let coverage = normalize_axis(self.points.iter().map(|p| p.coverage as f64));
        let transport = normalize_axis(self.points.iter().map(|p| p.transport));
        self.points
            .iter()
            .zip(coverage.into_iter().zip(transport))
            .map(|(p, (coverage, transport))| NormalizedPoint {
                beta: p.beta,
                coverage,
                transport,
            })
            .collect()
    }
}

fn normalize_axis(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let values = values.collect::<Vec<_>>();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > min {
        values.iter().map(|v| (v - min) / (max - min)).collect()
    } else {
        values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepEntry {
    pub beta: f64,
    pub outcome: Result<GrowthOutcome, GrowthError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub name: String,
    pub entries: Vec<SweepEntry>,
}

impl SweepResult {
    /// Curve over the betas that completed.
    #[must_use]
    pub fn curve(&self) -> ParetoCurve {
        let points = self
            .entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().ok())
            .map(|outcome| ParetoPoint::from(outcome.objective))
            .collect();
        ParetoCurve::from_points(self.name.clone(), points)
    }

    pub fn failures(&self) -> impl Iterator<Item = (f64, &GrowthError)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.beta, err)))
    }
}

#[derive(Debug, Clone)]
pub struct BetaSweep {
    params: GrowthParams,
    betas: Vec<f64>,
    field_init: FieldInit,
}

impl BetaSweep {
    /// Sweeps `betas` over `params`; the beta already in `params` is ignored.
    #[must_use]
    pub fn new(params: GrowthParams, betas: impl Into<Vec<f64>>) -> Self {
        Self {
            params,
            betas: betas.into(),
            field_init: FieldInit::default(),
        }
    }

    #[must_use]
    pub fn with_field_init(mut self, field_init: FieldInit) -> Self {
        self.field_init = field_init;
        self
    }

    pub fn run(&self, mode: EvaluationMode, observer: &mut dyn GrowthObserver) -> SweepResult {
        let entries = self
            .betas
            .iter()
            .map(|&beta| {
                let params = self.params.clone().with_beta(beta);
                let outcome = GrowthEngine::with_field_init(params, self.field_init)
                    .and_then(|engine| engine.run_with(mode, observer));
                if let Err(err) = &outcome {
                    tracing::warn!(
                        name = %self.params.name,
                        beta,
                        error = %err,
                        "growth run failed"
                    );
                }
                SweepEntry { beta, outcome }
            })
            .collect();
        SweepResult {
            name: self.params.name.clone(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        observer::{NoopObserver, RecordingObserver},
        params::ParamError,
    };

    fn point(beta: f64, coverage: u64, transport: f64) -> ParetoPoint {
        ObjectiveValue::new(beta, coverage, transport).into()
    }

    #[test]
    fn test_normalization_maps_axes_to_unit_range() {
        let curve = ParetoCurve::from_points(
            "x",
            vec![point(0.2, 10, 4.0), point(0.4, 30, 8.0), point(0.6, 20, 6.0)],
        );
        let normalized = curve.normalized();
        let coverage = normalized.iter().map(|p| p.coverage).collect::<Vec<_>>();
        let transport = normalized.iter().map(|p| p.transport).collect::<Vec<_>>();
        assert_eq!(coverage, vec![0.0, 1.0, 0.5]);
        assert_eq!(transport, vec![0.0, 1.0, 0.5]);
        assert_eq!(normalized[2].beta, 0.6);
    }

    #[test]
    fn test_constant_axis_is_not_normalized() {
        let curve = ParetoCurve::from_points("x", vec![point(0.2, 106, 50.0), point(0.8, 106, 60.0)]);
        let normalized = curve.normalized();
        assert_eq!(normalized[0].coverage, 106.0);
        assert_eq!(normalized[1].coverage, 106.0);
        assert_eq!(normalized[0].transport, 0.0);
        assert_eq!(normalized[1].transport, 1.0);
        assert!(ParetoCurve::from_points("empty", vec![]).normalized().is_empty());
    }

    #[test]
    fn test_sweep_runs_every_beta() {
        let params = GrowthParams::new("A", 0.5, 5.0, 4, 3.0);
        let mut observer = RecordingObserver::new();
        let result =
            BetaSweep::new(params, vec![0.2, 0.8]).run(EvaluationMode::Sequential, &mut observer);

        assert_eq!(result.name, "A");
        assert_eq!(result.failures().count(), 0);
        let curve = result.curve();
        assert_eq!(curve.points.len(), 2);
        // both betas grow the same path here
        assert_eq!(curve.points[0].coverage, 106);
        assert_eq!(curve.points[1].coverage, 106);
        assert_eq!(curve.points[0].transport, 50.0);
        assert!((curve.points[0].combined_value - 61.2).abs() < 1e-9);
        assert!((curve.points[1].combined_value - 94.8).abs() < 1e-9);
        assert_eq!(
            observer.events().iter().filter(|e| e.is_run_started()).count(),
            2
        );
    }

    #[test]
    fn test_failing_beta_does_not_stop_the_sweep() {
        let params = GrowthParams::new("B", 0.5, 2.0, 2, 2.0);
        let result = BetaSweep::new(params, vec![0.0, 0.5])
            .run(EvaluationMode::Parallel, &mut NoopObserver);

        let failures = result.failures().collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 0.0);
        assert_eq!(
            failures[0].1,
            &GrowthError::InvalidParams(ParamError::Beta { value: 0.0 })
        );
        let curve = result.curve();
        assert_eq!(curve.points.len(), 1);
        assert_eq!(curve.points[0].beta, 0.5);
    }
}
