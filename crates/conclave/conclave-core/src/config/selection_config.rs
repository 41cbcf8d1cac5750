use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights of the five selection-score components. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionWeights {
    pub accuracy: f64,
    pub recent_performance: f64,
    pub consistency: f64,
    pub calibration_quality: f64,
    pub specialization_strength: f64,
}

impl SelectionWeights {
    pub fn as_array(&self) -> [(&'static str, f64); 5] {
        [
            ("accuracy", self.accuracy),
            ("recent_performance", self.recent_performance),
            ("consistency", self.consistency),
            ("calibration_quality", self.calibration_quality),
            ("specialization_strength", self.specialization_strength),
        ]
    }
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            accuracy: defaults::DEFAULT_W_ACCURACY,
            recent_performance: defaults::DEFAULT_W_RECENT,
            consistency: defaults::DEFAULT_W_CONSISTENCY,
            calibration_quality: defaults::DEFAULT_W_CALIBRATION,
            specialization_strength: defaults::DEFAULT_W_SPECIALIZATION,
        }
    }
}

/// Council selection and eligibility gate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// K: seats in the council. Default: 5.
    pub council_size: usize,
    /// Size of the registered expert roster. When set, K may not exceed it.
    pub roster_size: Option<usize>,
    pub weights: SelectionWeights,
    /// Minimum settled predictions in the window. Default: 20.
    pub min_sample_size: u32,
    /// Minimum schema-validity rate. Default: 0.985.
    pub min_schema_validity: f64,
    /// Average latency ceiling in milliseconds. Default: 6000.
    pub max_latency_ms: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            council_size: defaults::DEFAULT_COUNCIL_SIZE,
            roster_size: None,
            weights: SelectionWeights::default(),
            min_sample_size: defaults::DEFAULT_MIN_SAMPLE_SIZE,
            min_schema_validity: defaults::DEFAULT_MIN_SCHEMA_VALIDITY,
            max_latency_ms: defaults::DEFAULT_MAX_LATENCY_MS,
        }
    }
}
