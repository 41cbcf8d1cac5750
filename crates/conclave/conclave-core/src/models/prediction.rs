use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ExpertId;
use crate::errors::ValidationError;

/// A predicted (or actual) value.
///
/// External payloads arrive as JSON; [`PredictionValue::from_json`] maps
/// anything that is neither a string, number, nor boolean to `Malformed` so
/// it can be dropped by validation instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PredictionValue {
    Choice(String),
    Number(f64),
    Flag(bool),
    Malformed(String),
}

impl PredictionValue {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Choice(s.clone()),
            serde_json::Value::Bool(b) => Self::Flag(*b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Malformed(n.to_string()),
            },
            other => Self::Malformed(other.to_string()),
        }
    }

    /// Categorical view. Flags map to `"true"` / `"false"`.
    pub fn as_choice(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Choice(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Flag(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Choice(_) => "choice",
            Self::Number(_) => "number",
            Self::Flag(_) => "flag",
            Self::Malformed(_) => "malformed",
        }
    }
}

impl From<&str> for PredictionValue {
    fn from(s: &str) -> Self {
        Self::Choice(s.to_string())
    }
}

impl From<f64> for PredictionValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One expert's vote for one category in one contest. Immutable once created;
/// a changed stance is a new prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction_id: String,
    pub expert_id: ExpertId,
    pub game_id: String,
    pub category_id: String,
    pub value: PredictionValue,
    /// Self-reported confidence in [0, 1].
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    pub fn new(
        expert_id: impl Into<ExpertId>,
        game_id: &str,
        category_id: &str,
        value: impl Into<PredictionValue>,
        confidence: f64,
    ) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            expert_id: expert_id.into(),
            game_id: game_id.to_string(),
            category_id: category_id.to_string(),
            value: value.into(),
            confidence,
            created_at: Utc::now(),
        }
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn check_confidence(&self) -> Result<(), ValidationError> {
        if (0.0..=1.0).contains(&self.confidence) {
            Ok(())
        } else {
            Err(ValidationError::InvalidConfidence(self.confidence))
        }
    }
}
