//! ConsensusEngine: aggregate one contest, or many in parallel.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use conclave_consensus::ConsensusEngine;
//! use conclave_core::config::ConsensusConfig;
//! use conclave_core::models::{RunId, VoteWeight};
//! use conclave_core::{CategoryRegistry, Prediction};
//!
//! let engine = ConsensusEngine::new(&ConsensusConfig::default(), Arc::new(CategoryRegistry::with_defaults()));
//! let run = RunId::from("run-1");
//! let weights = vec![VoteWeight {
//!     expert_id: "a".into(),
//!     run_id: run.clone(),
//!     raw_weight: 0.7,
//!     normalized_weight: 1.0,
//! }];
//! let predictions = vec![Prediction::new("a", "g1", "winner", "home", 0.8)];
//! let results = engine.aggregate_contest(&run, "g1", &weights, &predictions, &HashMap::new());
//! assert!(results[0].is_reached());
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use conclave_core::config::ConsensusConfig;
use conclave_core::models::{
    CalibrationKey, CalibrationState, ConsensusResult, ConsensusStatus, Prediction, RunId,
    VoteWeight,
};
use conclave_core::{Category, CategoryRegistry, DataType};

use crate::ballot::{latest_by_expert, Ballot};
use crate::{categorical, numeric, Aggregate};

/// Calibration states read once per run, keyed by (expert, category).
pub type CalibrationView = HashMap<CalibrationKey, CalibrationState>;

/// All predictions collected for one contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestInput {
    pub game_id: String,
    pub predictions: Vec<Prediction>,
}

/// Per-category consensus over a council's weighted votes.
pub struct ConsensusEngine {
    config: ConsensusConfig,
    registry: Arc<CategoryRegistry>,
}

impl ConsensusEngine {
    pub fn new(config: &ConsensusConfig, registry: Arc<CategoryRegistry>) -> Self {
        Self {
            config: config.clone(),
            registry,
        }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Aggregate every expected category plus every registered category the
    /// contest's predictions mention, in category id order. Predictions for
    /// unregistered categories are ignored. Weights from other runs are
    /// ignored.
    #[instrument(skip_all, fields(run_id = %run_id, game_id = %game_id))]
    pub fn aggregate_contest(
        &self,
        run_id: &RunId,
        game_id: &str,
        weights: &[VoteWeight],
        predictions: &[Prediction],
        calibration: &CalibrationView,
    ) -> Vec<ConsensusResult> {
        let predictions: Vec<Prediction> = predictions
            .iter()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect();
        let weights: Vec<VoteWeight> = weights
            .iter()
            .filter(|w| &w.run_id == run_id)
            .cloned()
            .collect();

        let mut category_ids = BTreeSet::new();
        for id in &self.config.expected_categories {
            if self.registry.get(id).is_some() {
                category_ids.insert(id.as_str());
            } else {
                debug!(category_id = %id, "expected category not registered; skipped");
            }
        }
        for p in &predictions {
            if self.registry.get(&p.category_id).is_some() {
                category_ids.insert(p.category_id.as_str());
            } else {
                debug!(category_id = %p.category_id, expert_id = %p.expert_id, "prediction for unregistered category ignored");
            }
        }

        let results: Vec<ConsensusResult> = category_ids
            .into_iter()
            .filter_map(|id| self.registry.get(id))
            .map(|category| self.aggregate_category(run_id, game_id, category, &weights, &predictions, calibration))
            .collect();

        let reached = results.iter().filter(|r| r.is_reached()).count();
        info!(categories = results.len(), reached, "contest aggregated");
        results
    }

    /// Aggregate one category. Zero surviving votes yield an
    /// `InsufficientData` result with no value.
    pub fn aggregate_category(
        &self,
        run_id: &RunId,
        game_id: &str,
        category: &Category,
        weights: &[VoteWeight],
        predictions: &[Prediction],
        calibration: &CalibrationView,
    ) -> ConsensusResult {
        let latest = latest_by_expert(predictions, &category.category_id);
        let ballot = Ballot::collect(category, weights, &latest);

        if ballot.is_empty() {
            warn!(game_id, category_id = %category.category_id, "no valid votes; insufficient data");
            return ConsensusResult::insufficient(run_id, game_id, &category.category_id, ballot.dropped);
        }

        let aggregate = match category.data_type {
            DataType::Categorical => categorical::aggregate(&ballot, self.config.tie_tolerance),
            DataType::Numeric | DataType::Percentage => {
                let factors = self.calibration_factors(&ballot, category, calibration);
                numeric::aggregate(&ballot, category, &factors)
            }
        };

        match aggregate {
            Some(Aggregate {
                value,
                agreement,
                confidence,
            }) => ConsensusResult {
                game_id: game_id.to_string(),
                category_id: category.category_id.clone(),
                run_id: run_id.clone(),
                status: ConsensusStatus::Reached,
                consensus_value: Some(value),
                agreement,
                confidence,
                contributing_experts: ballot.experts(),
                dropped: ballot.dropped,
            },
            None => ConsensusResult::insufficient(run_id, game_id, &category.category_id, ballot.dropped),
        }
    }

    /// Aggregate independent contests, on the rayon pool when configured.
    /// Output order matches input order.
    #[instrument(skip_all, fields(run_id = %run_id, contests = contests.len()))]
    pub fn aggregate_contests(
        &self,
        run_id: &RunId,
        contests: &[ContestInput],
        weights: &[VoteWeight],
        calibration: &CalibrationView,
    ) -> Vec<Vec<ConsensusResult>> {
        let run = |c: &ContestInput| self.aggregate_contest(run_id, &c.game_id, weights, &c.predictions, calibration);
        if self.config.parallel {
            contests.par_iter().map(run).collect()
        } else {
            contests.iter().map(run).collect()
        }
    }

    fn calibration_factors(&self, ballot: &Ballot, category: &Category, calibration: &CalibrationView) -> Vec<f64> {
        if !self.config.calibration_weighting {
            return Vec::new();
        }
        let span = category.domain_span();
        ballot
            .entries
            .iter()
            .map(|e| {
                let key = CalibrationKey::new(e.expert_id.clone(), &category.category_id);
                calibration.get(&key).map_or(1.0, |s| s.precision_factor(span))
            })
            .collect()
    }
}
