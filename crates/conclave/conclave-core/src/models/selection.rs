use serde::{Deserialize, Serialize};

use super::{ExpertId, RunId};
use crate::errors::ValidationError;

/// Rolling performance inputs for one expert over an evaluation window.
///
/// All five components are pre-normalized to [0, 1] by the performance
/// tracker; the scorer only combines them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub expert_id: ExpertId,
    pub accuracy: f64,
    /// Accuracy over the last four windows.
    pub recent_performance: f64,
    /// Derived from prediction variance.
    pub consistency: f64,
    /// 1 − confidence-calibration error.
    pub calibration_quality: f64,
    pub specialization_strength: f64,
}

impl PerformanceStats {
    /// Reject any component outside [0, 1].
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_unit("accuracy", self.accuracy)?;
        check_unit("recent_performance", self.recent_performance)?;
        check_unit("consistency", self.consistency)?;
        check_unit("calibration_quality", self.calibration_quality)?;
        check_unit("specialization_strength", self.specialization_strength)
    }
}

/// Service-level inputs for the eligibility gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityStats {
    pub expert_id: ExpertId,
    /// Settled predictions in the evaluation window.
    pub sample_size: u32,
    /// Fraction of outputs that passed schema validation.
    pub schema_validity_rate: f64,
    pub avg_latency_ms: f64,
}

/// Why an expert was held out of a selection window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EligibilityFailure {
    InsufficientSamples { have: u32, need: u32 },
    SchemaValidity { rate: f64, min: f64 },
    Latency { avg_ms: f64, max_ms: f64 },
}

/// Eligibility gate verdict for one expert in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub expert_id: ExpertId,
    pub run_id: RunId,
    pub eligible: bool,
    pub schema_validity_rate: f64,
    pub avg_latency_ms: f64,
    pub failures: Vec<EligibilityFailure>,
}

/// The five weighted components, kept for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    pub accuracy: f64,
    pub recent_performance: f64,
    pub consistency: f64,
    pub calibration_quality: f64,
    pub specialization_strength: f64,
}

/// Selection score for one expert in one run. Superseded each window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionScore {
    pub expert_id: ExpertId,
    pub run_id: RunId,
    pub score: f64,
    pub components: ComponentBreakdown,
}

pub(crate) fn check_unit(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidMetric { field, value })
    }
}
