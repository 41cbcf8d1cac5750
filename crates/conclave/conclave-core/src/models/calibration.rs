use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ExpertId, RunId};

/// Posterior key. Updates for one key must be serialized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalibrationKey {
    pub expert_id: ExpertId,
    pub category_id: String,
}

impl CalibrationKey {
    pub fn new(expert_id: impl Into<ExpertId>, category_id: &str) -> Self {
        Self {
            expert_id: expert_id.into(),
            category_id: category_id.to_string(),
        }
    }
}

impl fmt::Display for CalibrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.expert_id, self.category_id)
    }
}

/// Per-key posterior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Posterior {
    /// Beta(α, β) over "prediction was correct", for categorical categories.
    Beta { alpha: f64, beta: f64 },
    /// Exponential moving average of absolute error, for numeric/percentage.
    Ema { mu: f64, sigma: f64 },
}

impl Posterior {
    /// Uniform Beta(1, 1) prior.
    pub fn uniform_beta() -> Self {
        Self::Beta { alpha: 1.0, beta: 1.0 }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Beta { .. } => "beta",
            Self::Ema { .. } => "ema",
        }
    }

    /// Weight multiplier in (0, 1] from EMA error: `1 / (1 + mu / span)`.
    /// Beta posteriors and degenerate inputs give 1.
    pub fn precision_factor(&self, domain_span: f64) -> f64 {
        match *self {
            Self::Ema { mu, .. } if mu.is_finite() && mu >= 0.0 && domain_span > 0.0 => {
                1.0 / (1.0 + mu / domain_span)
            }
            _ => 1.0,
        }
    }
}

/// Stored calibration state for one (expert, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    pub key: CalibrationKey,
    pub posterior: Posterior,
    /// Run that last wrote this state.
    pub run_id: RunId,
    /// Settled contests folded into the posterior.
    pub observations: u64,
    /// Optimistic-concurrency version; bumped on every successful write.
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl CalibrationState {
    /// Fresh bootstrap state at version 0.
    pub fn bootstrap(key: CalibrationKey, posterior: Posterior, run_id: &RunId) -> Self {
        Self {
            key,
            posterior,
            run_id: run_id.clone(),
            observations: 0,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn precision_factor(&self, domain_span: f64) -> f64 {
        self.posterior.precision_factor(domain_span)
    }

    /// EMA mean absolute error, if this is an EMA posterior.
    pub fn ema_mu(&self) -> Option<f64> {
        match self.posterior {
            Posterior::Ema { mu, .. } => Some(mu),
            Posterior::Beta { .. } => None,
        }
    }
}
