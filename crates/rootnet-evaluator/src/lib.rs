//! Evaluators scoring a transport network over a resource field.
//!
//! ```text
//! Objective (beta-weighted combination, validity checkpoints)
//!     ↓ uses
//! Coverage (claims resource, mutates the field)  →  Transport (reads claims)
//!     ↓ query
//! ResourceField::candidate_cells
//! ```
//!
//! - [`coverage`]: breadth-first resource capture.
//! - [`transport`]: root-path distance per capturing node.
//! - [`objective`]: the combined value and the checkpointed evaluation pipeline.

pub mod coverage;
pub mod objective;
pub mod transport;
