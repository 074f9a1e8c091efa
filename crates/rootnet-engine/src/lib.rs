//! Data model for greedy transport-network growth.
//!
//! - [`field`]: the discretized resource field and radius queries over it.
//! - [`field_init`]: named initializers for resource distributions.
//! - [`network`]: the rooted, append-only transport network.
//!
//! The error types shared by the evaluator and growth crates live here as well.

pub use self::{
    field::{Cell, CellIndex, FieldDefect, FieldGeometry, FieldMetadata, ResourceField},
    field_init::{FieldInit, FieldInitError},
    network::{Edge, EdgeId, Network, Node, NodeId},
};

pub mod field;
pub mod field_init;
pub mod network;

/// Point at which a field was found to be invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ValidationStage {
    #[display("on construction")]
    Construction,
    #[display("before coverage")]
    BeforeCoverage,
    #[display("after coverage")]
    AfterCoverage,
    #[display("after transport")]
    AfterTransport,
    #[display("after commit")]
    PostCommit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid field {stage}: {defect}")]
pub struct InvalidFieldError {
    pub stage: ValidationStage,
    pub defect: FieldDefect,
}

impl ResourceField {
    /// Validates the field, tagging any defect with `stage`.
    pub fn check(&self, stage: ValidationStage) -> Result<(), InvalidFieldError> {
        self.validate()
            .map_err(|defect| InvalidFieldError { stage, defect })
    }
}
