//! # conclave-consensus
//!
//! Aggregates council members' per-category predictions for a contest into
//! one consensus value, an agreement score, and a confidence score.
//!
//! ## Modules
//!
//! - [`ballot`]: Per-category vote collection, validation drops, weight renormalization
//! - [`categorical`]: Weighted plurality vote with deterministic tie-break
//! - [`numeric`]: Confidence- and calibration-weighted mean for numeric/percentage
//! - [`engine`]: Dispatch by data type, contest and batch aggregation

pub mod ballot;
pub mod categorical;
pub mod engine;
pub mod numeric;

pub use ballot::{Ballot, BallotEntry};
pub use engine::{CalibrationView, ConsensusEngine, ContestInput};

/// A computed consensus before it is stamped with run/game/category ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub value: conclave_core::PredictionValue,
    pub agreement: f64,
    pub confidence: f64,
}
