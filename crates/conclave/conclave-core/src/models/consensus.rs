use serde::{Deserialize, Serialize};

use super::{ExpertId, PredictionValue, RunId};

/// Terminal state of a category's aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusStatus {
    /// A consensus value was computed.
    Reached,
    /// No valid votes remained. Callers must handle this as a legitimate outcome.
    InsufficientData,
}

/// A vote excluded from a category's aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedVote {
    pub expert_id: ExpertId,
    pub reason: String,
}

/// The aggregated prediction for one category in one contest. Never mutated;
/// late corrections produce a new run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub game_id: String,
    pub category_id: String,
    pub run_id: RunId,
    pub status: ConsensusStatus,
    /// `None` iff `status == InsufficientData`.
    pub consensus_value: Option<PredictionValue>,
    pub agreement: f64,
    pub confidence: f64,
    pub contributing_experts: Vec<ExpertId>,
    pub dropped: Vec<DroppedVote>,
}

impl ConsensusResult {
    pub fn insufficient(
        run_id: &RunId,
        game_id: &str,
        category_id: &str,
        dropped: Vec<DroppedVote>,
    ) -> Self {
        Self {
            game_id: game_id.to_string(),
            category_id: category_id.to_string(),
            run_id: run_id.clone(),
            status: ConsensusStatus::InsufficientData,
            consensus_value: None,
            agreement: 0.0,
            confidence: 0.0,
            contributing_experts: Vec::new(),
            dropped,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.status == ConsensusStatus::Reached
    }
}
