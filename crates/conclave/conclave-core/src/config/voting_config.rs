use serde::{Deserialize, Serialize};

use super::defaults;

/// Vote weight configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingConfig {
    pub accuracy_weight: f64,
    pub recent_performance_weight: f64,
    pub confidence_weight: f64,
    pub tenure_weight: f64,
    /// Council runs after which the tenure component saturates at 1.0.
    pub tenure_saturation_runs: u32,
    /// Floor for a member's raw weight, keeping every normalized weight > 0.
    pub min_raw_weight: f64,
}

impl VotingConfig {
    pub fn weight_sum(&self) -> f64 {
        self.accuracy_weight + self.recent_performance_weight + self.confidence_weight + self.tenure_weight
    }
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            accuracy_weight: defaults::DEFAULT_VW_ACCURACY,
            recent_performance_weight: defaults::DEFAULT_VW_RECENT,
            confidence_weight: defaults::DEFAULT_VW_CONFIDENCE,
            tenure_weight: defaults::DEFAULT_VW_TENURE,
            tenure_saturation_runs: defaults::DEFAULT_TENURE_SATURATION_RUNS,
            min_raw_weight: defaults::DEFAULT_MIN_RAW_WEIGHT,
        }
    }
}
