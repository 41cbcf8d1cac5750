use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ExpertId;

/// Kind of stance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionTrigger {
    /// A categorical flip to a different choice.
    CompleteReversal,
    /// A numeric or percentage shift.
    MagnitudeAdjustment,
}

impl RevisionTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CompleteReversal => "complete_reversal",
            Self::MagnitudeAdjustment => "magnitude_adjustment",
        }
    }
}

/// Record of an expert changing its stance on an unresolved category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefRevision {
    pub revision_id: String,
    pub expert_id: ExpertId,
    pub game_id: String,
    pub category_id: String,
    pub from_prediction_id: String,
    pub to_prediction_id: String,
    /// Undecayed impact in [0, 1].
    pub impact_score: f64,
    pub trigger_type: RevisionTrigger,
    pub revised_at: DateTime<Utc>,
}
