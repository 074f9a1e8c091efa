//! Combined objective: weighted sum of coverage and transport.
//!
//! ```text
//! combined_value = beta · coverage + (1 − beta) · transport
//! ```
//!
//! [`ObjectiveCombiner::evaluate`] checks the field's structure before coverage,
//! after coverage, and after transport. A failure at any checkpoint aborts the
//! evaluation without returning a partial value.
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use rootnet_engine::{FieldGeometry, Network, ResourceField};
//! use rootnet_evaluator::objective::ObjectiveCombiner;
//!
//! let network = Network::new(DVec2::ZERO);
//! let mut field = ResourceField::new(FieldGeometry::new(4.0, 4.0, 1.0));
//!
//! let evaluation = ObjectiveCombiner::new(0.5, 2.0)
//!     .evaluate(&network, &mut field)
//!     .unwrap();
//! assert_eq!(evaluation.value.coverage, 3);
//! assert_eq!(evaluation.value.combined_value, 1.5);
//! ```

use rootnet_engine::{InvalidFieldError, Network, ResourceField, ValidationStage};
use serde::{Deserialize, Serialize};

use crate::{
    coverage,
    transport::{self, UnresolvedAcquisition},
};

/// Scores of one evaluated network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveValue {
    pub beta: f64,
    pub coverage: u64,
    pub transport: f64,
    pub combined_value: f64,
}

impl ObjectiveValue {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(beta: f64, coverage: u64, transport: f64) -> Self {
        Self {
            beta,
            coverage,
            transport,
            combined_value: beta * coverage as f64 + (1.0 - beta) * transport,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveEvaluation {
    pub value: ObjectiveValue,
    pub unresolved: Vec<UnresolvedAcquisition>,
}

/// Evaluates networks against a fixed `beta` and reach `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveCombiner {
    beta: f64,
    radius: f64,
}

impl ObjectiveCombiner {
    #[must_use]
    pub const fn new(beta: f64, radius: f64) -> Self {
        Self { beta, radius }
    }

    /// Runs coverage then transport on `field`, which is consumed in place.
    pub fn evaluate(
        &self,
        network: &Network,
        field: &mut ResourceField,
    ) -> Result<ObjectiveEvaluation, InvalidFieldError> {
        field.check(ValidationStage::BeforeCoverage)?;
        let coverage = coverage::evaluate(network, field, self.radius);
        field.check(ValidationStage::AfterCoverage)?;
        let transport = transport::evaluate(network, field);
        field.check(ValidationStage::AfterTransport)?;

        Ok(ObjectiveEvaluation {
            value: ObjectiveValue::new(self.beta, coverage, transport.transport),
            unresolved: transport.unresolved,
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use rootnet_engine::{Cell, CellIndex, FieldDefect, FieldGeometry, NodeId};

    use super::*;

    const GEOMETRY: FieldGeometry = FieldGeometry::new(4.0, 4.0, 1.0);

    #[test]
    fn test_combined_value_formula() {
        for (beta, coverage, transport) in [(0.2, 13, 2.0), (0.5, 0, 7.5), (0.8, 106, 50.0)] {
            let value = ObjectiveValue::new(beta, coverage, transport);
            #[expect(clippy::cast_precision_loss)]
            let expected = beta * coverage as f64 + (1.0 - beta) * transport;
            assert!((value.combined_value - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_evaluate_right_extension() {
        let mut network = Network::new(DVec2::ZERO);
        network.add_child(NodeId::ROOT, DVec2::new(2.0, 0.0));
        let mut field = ResourceField::new(GEOMETRY);

        let evaluation = ObjectiveCombiner::new(0.5, 2.0)
            .evaluate(&network, &mut field)
            .unwrap();
        assert_eq!(
            evaluation.value,
            ObjectiveValue {
                beta: 0.5,
                coverage: 7,
                transport: 2.0,
                combined_value: 4.5,
            }
        );
        assert!(evaluation.unresolved.is_empty());
        assert_eq!(field.metadata().acquired_cells, 7);
    }

    #[test]
    fn test_invalid_field_before_coverage() {
        let network = Network::new(DVec2::ZERO);
        let mut field = ResourceField::from_rows(
            GEOMETRY,
            vec![vec![Cell::RESOURCE; 4], vec![Cell::RESOURCE; 3]],
        );
        let err = ObjectiveCombiner::new(0.5, 2.0)
            .evaluate(&network, &mut field)
            .unwrap_err();
        assert_eq!(err.stage, ValidationStage::BeforeCoverage);
        assert_eq!(
            err.defect,
            FieldDefect::Ragged {
                row: 1,
                expected: 4,
                found: 3
            }
        );
        // nothing was claimed
        assert_eq!(field.metadata().acquired_cells, 0);
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let network = Network::new(DVec2::ZERO);
        let mut field = ResourceField::from_rows(GEOMETRY, vec![]);
        let err = ObjectiveCombiner::new(0.5, 2.0)
            .evaluate(&network, &mut field)
            .unwrap_err();
        assert_eq!(err.stage, ValidationStage::BeforeCoverage);
        assert_eq!(err.defect, FieldDefect::Empty);
    }

    #[test]
    fn test_reports_unresolved_acquisitions() {
        let network = Network::new(DVec2::ZERO);
        let mut field = ResourceField::new(GEOMETRY);
        field.cell_mut(CellIndex::new(3, 3)).unwrap().claim(NodeId(5));

        let evaluation = ObjectiveCombiner::new(0.5, 2.0)
            .evaluate(&network, &mut field)
            .unwrap();
        assert_eq!(evaluation.value.coverage, 3);
        assert_eq!(evaluation.value.transport, 0.0);
        assert_eq!(evaluation.unresolved.len(), 1);
        assert_eq!(evaluation.unresolved[0].node_id, NodeId(5));
    }
}
