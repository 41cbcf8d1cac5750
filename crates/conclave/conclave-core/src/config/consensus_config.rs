use serde::{Deserialize, Serialize};

use super::defaults;

/// Consensus aggregation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Two categorical weight sums within this distance are a tie.
    pub tie_tolerance: f64,
    /// Scale numeric/percentage member weights by EMA calibration precision.
    pub calibration_weighting: bool,
    /// Aggregate independent contests on the rayon pool.
    pub parallel: bool,
    /// Categories every contest reports on, submitted or not. A category
    /// nobody voted on comes back as `InsufficientData`.
    pub expected_categories: Vec<String>,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            tie_tolerance: defaults::DEFAULT_TIE_TOLERANCE,
            calibration_weighting: defaults::DEFAULT_CALIBRATION_WEIGHTING,
            parallel: defaults::DEFAULT_PARALLEL_CONTESTS,
            expected_categories: Vec::new(),
        }
    }
}
