//! EligibilityGate: admission check applied before selection scoring.
//!
//! An expert is eligible iff all hold:
//! - `sample_size >= min_sample_size`
//! - `schema_validity_rate >= min_schema_validity` (default 0.985)
//! - `avg_latency_ms <= max_latency_ms`
//!
//! A failing expert is excluded from the current window only; stored
//! historical scores are untouched.

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use conclave_core::config::SelectionConfig;
use conclave_core::models::{EligibilityFailure, EligibilityStats, EligibilityVerdict, RunId};

/// Evaluates experts against the configured SLOs.
pub struct EligibilityGate {
    min_sample_size: u32,
    min_schema_validity: f64,
    max_latency_ms: f64,
}

impl EligibilityGate {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            min_sample_size: config.min_sample_size,
            min_schema_validity: config.min_schema_validity,
            max_latency_ms: config.max_latency_ms,
        }
    }

    /// Evaluate one expert. Every failing SLO is listed, not just the first.
    pub fn evaluate(&self, run_id: &RunId, stats: &EligibilityStats) -> EligibilityVerdict {
        let mut failures = Vec::new();

        if stats.sample_size < self.min_sample_size {
            failures.push(EligibilityFailure::InsufficientSamples {
                have: stats.sample_size,
                need: self.min_sample_size,
            });
        }
        // NaN rates fail the gate.
        if !(stats.schema_validity_rate >= self.min_schema_validity) {
            failures.push(EligibilityFailure::SchemaValidity {
                rate: stats.schema_validity_rate,
                min: self.min_schema_validity,
            });
        }
        if !(stats.avg_latency_ms <= self.max_latency_ms) {
            failures.push(EligibilityFailure::Latency {
                avg_ms: stats.avg_latency_ms,
                max_ms: self.max_latency_ms,
            });
        }

        let eligible = failures.is_empty();
        if !eligible {
            debug!(expert_id = %stats.expert_id, run_id = %run_id, ?failures, "expert failed eligibility gate");
        }

        EligibilityVerdict {
            expert_id: stats.expert_id.clone(),
            run_id: run_id.clone(),
            eligible,
            schema_validity_rate: stats.schema_validity_rate,
            avg_latency_ms: stats.avg_latency_ms,
            failures,
        }
    }

    /// Evaluate every expert in parallel. Output order matches input order.
    #[instrument(skip(self, stats), fields(experts = stats.len()))]
    pub fn evaluate_all(&self, run_id: &RunId, stats: &[EligibilityStats]) -> Vec<EligibilityVerdict> {
        let verdicts: Vec<EligibilityVerdict> =
            stats.par_iter().map(|s| self.evaluate(run_id, s)).collect();
        let eligible = verdicts.iter().filter(|v| v.eligible).count();
        info!(run_id = %run_id, eligible, total = verdicts.len(), "eligibility gate evaluated");
        verdicts
    }
}
