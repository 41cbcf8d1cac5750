use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PredictionValue;

/// Ground truth for one category of a resolved contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub game_id: String,
    pub category_id: String,
    pub actual_value: PredictionValue,
    /// When the outcome became known. Drives the learning-rate decay.
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    pub fn new(game_id: &str, category_id: &str, actual_value: impl Into<PredictionValue>) -> Self {
        Self {
            game_id: game_id.to_string(),
            category_id: category_id.to_string(),
            actual_value: actual_value.into(),
            settled_at: Utc::now(),
        }
    }

    pub fn at(mut self, settled_at: DateTime<Utc>) -> Self {
        self.settled_at = settled_at;
        self
    }
}
