use serde::{Deserialize, Serialize};

use super::defaults;

/// Calibration tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// EMA smoothing constant λ in (0, 1]. Shared by all experts.
    pub ema_lambda: f64,
    /// Learning rate before temporal decay. Beta increments are scaled by it.
    pub base_rate: f64,
    /// Bootstrap EMA mean absolute error.
    pub seed_mean: f64,
    /// Bootstrap EMA standard deviation.
    pub seed_stddev: f64,
    /// Compare-and-swap retries before an update is queued.
    pub max_cas_retries: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            ema_lambda: defaults::DEFAULT_EMA_LAMBDA,
            base_rate: defaults::DEFAULT_BASE_RATE,
            seed_mean: defaults::DEFAULT_SEED_MEAN,
            seed_stddev: defaults::DEFAULT_SEED_STDDEV,
            max_cas_retries: defaults::DEFAULT_MAX_CAS_RETRIES,
        }
    }
}
