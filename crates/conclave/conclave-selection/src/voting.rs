//! VoteWeightCalculator: per-member voting weight for a run.
//!
//! ```text
//! raw_weight        = 0.40·accuracy + 0.30·recent_performance
//!                   + 0.20·confidence_calibration + 0.10·tenure
//! normalized_weight = raw_weight / Σ raw_weight
//! ```
//!
//! `tenure = min(1, tenure_runs / tenure_saturation_runs)`. Raw weights are
//! floored at `min_raw_weight` so every member keeps a strictly positive vote;
//! weights sum to one through renormalization alone.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use conclave_core::config::VotingConfig;
use conclave_core::models::{CouncilSnapshot, ExpertId, RunId, VoteWeight, VotingMetrics};

/// Computes normalized vote weights for a council.
pub struct VoteWeightCalculator {
    config: VotingConfig,
}

impl VoteWeightCalculator {
    pub fn new(config: &VotingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Tenure component in [0, 1].
    pub fn tenure_component(&self, tenure_runs: u32) -> f64 {
        (tenure_runs as f64 / self.config.tenure_saturation_runs as f64).min(1.0)
    }

    /// Unnormalized weight, floored at `min_raw_weight`. `None` if the
    /// metrics fail validation.
    pub fn raw_weight(&self, metrics: &VotingMetrics) -> Option<f64> {
        if let Err(e) = metrics.validate() {
            warn!(expert_id = %metrics.expert_id, error = %e, "invalid voting metrics");
            return None;
        }
        let c = &self.config;
        let raw = c.accuracy_weight * metrics.accuracy
            + c.recent_performance_weight * metrics.recent_performance
            + c.confidence_weight * metrics.confidence_calibration
            + c.tenure_weight * self.tenure_component(metrics.tenure_runs);
        Some(raw.max(c.min_raw_weight))
    }

    /// Weights for every council member, in rank order.
    ///
    /// Members with missing or invalid metrics receive the floor weight
    /// rather than being removed from the council.
    #[instrument(skip(self, council, metrics), fields(run_id = %run_id, seats = council.members.len()))]
    pub fn compute(
        &self,
        run_id: &RunId,
        council: &CouncilSnapshot,
        metrics: &[VotingMetrics],
    ) -> Vec<VoteWeight> {
        let by_expert: HashMap<&ExpertId, &VotingMetrics> =
            metrics.iter().map(|m| (&m.expert_id, m)).collect();

        let raws: Vec<(ExpertId, f64)> = council
            .members
            .iter()
            .map(|member| {
                let raw = match by_expert.get(&member.expert_id) {
                    Some(m) => self.raw_weight(m),
                    None => {
                        warn!(expert_id = %member.expert_id, "no voting metrics for council member");
                        None
                    }
                };
                (member.expert_id.clone(), raw.unwrap_or(self.config.min_raw_weight))
            })
            .collect();

        let total: f64 = raws.iter().map(|(_, r)| r).sum();
        let weights: Vec<VoteWeight> = raws
            .into_iter()
            .map(|(expert_id, raw_weight)| VoteWeight {
                expert_id,
                run_id: run_id.clone(),
                raw_weight,
                normalized_weight: raw_weight / total,
            })
            .collect();

        debug!(total_raw = total, "vote weights normalized");
        weights
    }
}
