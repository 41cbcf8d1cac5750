//! Belief revisions: stance changes on an unresolved category.
//!
//! Consecutive valid predictions by one expert for one (contest, category)
//! are compared. A different categorical choice is a complete reversal with
//! impact 1. A numeric change is a magnitude adjustment with impact
//! `min(1, |Δ| / domain_span)`. Unchanged stances record nothing.

use chrono::{DateTime, Utc};

use conclave_core::models::{BeliefRevision, Prediction, RevisionTrigger};
use conclave_core::{Category, DataType};
use conclave_decay::{age_days, half_life_decay};

/// Detects belief revisions in an expert's prediction history.
#[derive(Debug, Default, Clone, Copy)]
pub struct BeliefRevisionTracker;

impl BeliefRevisionTracker {
    pub fn new() -> Self {
        Self
    }

    /// Revisions across `history`, which must hold one expert's predictions
    /// for one contest and category. Predictions failing validation are
    /// skipped. Output is in time order.
    pub fn detect(&self, category: &Category, history: &[&Prediction]) -> Vec<BeliefRevision> {
        let mut valid: Vec<&Prediction> = history
            .iter()
            .copied()
            .filter(|p| category.validate(&p.value).is_ok())
            .collect();
        valid.sort_by(|a, b| (a.created_at, &a.prediction_id).cmp(&(b.created_at, &b.prediction_id)));

        valid
            .windows(2)
            .filter_map(|pair| self.compare(category, pair[0], pair[1]))
            .collect()
    }

    fn compare(&self, category: &Category, from: &Prediction, to: &Prediction) -> Option<BeliefRevision> {
        let (trigger_type, impact_score) = match category.data_type {
            DataType::Categorical => {
                if from.value.as_choice()? == to.value.as_choice()? {
                    return None;
                }
                (RevisionTrigger::CompleteReversal, 1.0)
            }
            DataType::Numeric | DataType::Percentage => {
                let delta = (to.value.as_number()? - from.value.as_number()?).abs();
                if delta == 0.0 {
                    return None;
                }
                (
                    RevisionTrigger::MagnitudeAdjustment,
                    (delta / category.domain_span()).min(1.0),
                )
            }
        };

        Some(BeliefRevision {
            revision_id: format!("{}->{}", from.prediction_id, to.prediction_id),
            expert_id: to.expert_id.clone(),
            game_id: to.game_id.clone(),
            category_id: to.category_id.clone(),
            from_prediction_id: from.prediction_id.clone(),
            to_prediction_id: to.prediction_id.clone(),
            impact_score,
            trigger_type,
            revised_at: to.created_at,
        })
    }
}

/// Impact of a revision as seen at a later time, decayed by the owning
/// expert's half-life.
pub trait RevisionDecay {
    fn decayed_impact(&self, now: DateTime<Utc>, half_life_days: f64) -> f64;
}

impl RevisionDecay for BeliefRevision {
    fn decayed_impact(&self, now: DateTime<Utc>, half_life_days: f64) -> f64 {
        self.impact_score * half_life_decay(age_days(self.revised_at, now), half_life_days)
    }
}
