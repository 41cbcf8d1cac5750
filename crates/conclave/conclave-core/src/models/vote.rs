use serde::{Deserialize, Serialize};

use super::selection::check_unit;
use super::{ExpertId, RunId};
use crate::errors::ValidationError;

/// Inputs to a council member's voting weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingMetrics {
    pub expert_id: ExpertId,
    pub accuracy: f64,
    pub recent_performance: f64,
    /// Confidence-calibration component in [0, 1].
    pub confidence_calibration: f64,
    /// Consecutive prior runs the expert has held a council seat.
    pub tenure_runs: u32,
}

impl VotingMetrics {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_unit("accuracy", self.accuracy)?;
        check_unit("recent_performance", self.recent_performance)?;
        check_unit("confidence_calibration", self.confidence_calibration)
    }
}

/// A council member's voting weight for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteWeight {
    pub expert_id: ExpertId,
    pub run_id: RunId,
    pub raw_weight: f64,
    /// Strictly positive; all members of a run sum to 1.0.
    pub normalized_weight: f64,
}
