//! SelectionScorer: combine five normalized components into one score.
//!
//! ```text
//! score = 0.35·accuracy + 0.25·recent_performance + 0.20·consistency
//!       + 0.10·calibration_quality + 0.10·specialization_strength
//! ```
//!
//! Pure: identical inputs always yield identical scores.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{info, instrument, warn};

use conclave_core::config::SelectionWeights;
use conclave_core::errors::ValidationError;
use conclave_core::models::{
    ComponentBreakdown, EligibilityVerdict, ExpertId, PerformanceStats, RunId, SelectionScore,
};

/// Computes selection scores.
pub struct SelectionScorer {
    weights: SelectionWeights,
}

impl SelectionScorer {
    pub fn new(weights: &SelectionWeights) -> Self {
        Self {
            weights: weights.clone(),
        }
    }

    /// Score one expert. Components outside [0, 1] are rejected.
    pub fn score(&self, run_id: &RunId, stats: &PerformanceStats) -> Result<SelectionScore, ValidationError> {
        stats.validate()?;
        let w = &self.weights;
        let score = w.accuracy * stats.accuracy
            + w.recent_performance * stats.recent_performance
            + w.consistency * stats.consistency
            + w.calibration_quality * stats.calibration_quality
            + w.specialization_strength * stats.specialization_strength;

        Ok(SelectionScore {
            expert_id: stats.expert_id.clone(),
            run_id: run_id.clone(),
            score: score.clamp(0.0, 1.0),
            components: ComponentBreakdown {
                accuracy: stats.accuracy,
                recent_performance: stats.recent_performance,
                consistency: stats.consistency,
                calibration_quality: stats.calibration_quality,
                specialization_strength: stats.specialization_strength,
            },
        })
    }

    /// Score only experts with a positive verdict. Ineligible experts get no
    /// score at all; invalid stats are logged and skipped.
    ///
    /// Output is sorted by expert id.
    #[instrument(skip(self, stats, verdicts), fields(run_id = %run_id))]
    pub fn score_eligible(
        &self,
        run_id: &RunId,
        stats: &[PerformanceStats],
        verdicts: &[EligibilityVerdict],
    ) -> Vec<SelectionScore> {
        let eligible: HashSet<&ExpertId> = verdicts
            .iter()
            .filter(|v| v.eligible && &v.run_id == run_id)
            .map(|v| &v.expert_id)
            .collect();

        let mut scores: Vec<SelectionScore> = stats
            .par_iter()
            .filter(|s| eligible.contains(&s.expert_id))
            .filter_map(|s| match self.score(run_id, s) {
                Ok(score) => Some(score),
                Err(e) => {
                    warn!(expert_id = %s.expert_id, error = %e, "dropping expert with invalid performance stats");
                    None
                }
            })
            .collect();
        scores.sort_by(|a, b| a.expert_id.cmp(&b.expert_id));

        info!(scored = scores.len(), eligible = eligible.len(), "selection scores computed");
        scores
    }
}
