//! Ballot: the valid votes for one category of one contest.
//!
//! A member is dropped for the category when its prediction is missing, fails
//! the category's domain check, or carries a confidence outside [0, 1]. The
//! survivors' weights are renormalized to sum to 1. Dropping is local to the
//! category; other categories of the same contest are unaffected.

use std::collections::HashMap;

use tracing::warn;

use conclave_core::models::{DroppedVote, ExpertId, Prediction, PredictionValue, VoteWeight};
use conclave_core::Category;

/// One surviving vote.
#[derive(Debug, Clone, PartialEq)]
pub struct BallotEntry {
    pub expert_id: ExpertId,
    pub value: PredictionValue,
    pub confidence: f64,
    /// Renormalized over surviving members.
    pub weight: f64,
}

/// Surviving votes for a category, sorted by expert id, plus the drops.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ballot {
    pub entries: Vec<BallotEntry>,
    pub dropped: Vec<DroppedVote>,
}

impl Ballot {
    /// Collect one vote per council member.
    ///
    /// `latest` maps each expert to its most recent prediction for this
    /// category. Experts outside `weights` never vote.
    pub fn collect(
        category: &Category,
        weights: &[VoteWeight],
        latest: &HashMap<&ExpertId, &Prediction>,
    ) -> Self {
        let mut entries = Vec::with_capacity(weights.len());
        let mut dropped = Vec::new();

        for weight in weights {
            let reason = match latest.get(&weight.expert_id) {
                None => Some("missing prediction".to_string()),
                Some(p) => match category.validate(&p.value) {
                    Err(e) => Some(e.to_string()),
                    Ok(()) => match p.check_confidence() {
                        Err(e) => Some(e.to_string()),
                        Ok(()) => {
                            entries.push(BallotEntry {
                                expert_id: weight.expert_id.clone(),
                                value: p.value.clone(),
                                confidence: p.confidence,
                                weight: weight.normalized_weight,
                            });
                            None
                        }
                    },
                },
            };
            if let Some(reason) = reason {
                warn!(
                    expert_id = %weight.expert_id,
                    category_id = %category.category_id,
                    reason = %reason,
                    "vote dropped from category"
                );
                dropped.push(DroppedVote {
                    expert_id: weight.expert_id.clone(),
                    reason,
                });
            }
        }

        entries.sort_by(|a, b| a.expert_id.cmp(&b.expert_id));
        let mut ballot = Self { entries, dropped };
        ballot.renormalize();
        ballot
    }

    /// Rescale surviving weights to sum to 1. Non-positive totals split evenly.
    pub fn renormalize(&mut self) {
        let total: f64 = self.entries.iter().map(|e| e.weight).sum();
        let n = self.entries.len() as f64;
        for entry in &mut self.entries {
            entry.weight = if total > 0.0 && total.is_finite() {
                entry.weight / total
            } else {
                1.0 / n
            };
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unweighted mean self-reported confidence of surviving members.
    pub fn mean_confidence(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.iter().map(|e| e.confidence).sum::<f64>() / self.entries.len() as f64
    }

    pub fn experts(&self) -> Vec<ExpertId> {
        self.entries.iter().map(|e| e.expert_id.clone()).collect()
    }
}

/// Latest prediction per expert for `category_id`: greatest `created_at`,
/// ties on prediction id.
pub fn latest_by_expert<'a>(
    predictions: &'a [Prediction],
    category_id: &str,
) -> HashMap<&'a ExpertId, &'a Prediction> {
    let mut latest: HashMap<&ExpertId, &Prediction> = HashMap::new();
    for p in predictions.iter().filter(|p| p.category_id == category_id) {
        latest
            .entry(&p.expert_id)
            .and_modify(|current| {
                if (p.created_at, &p.prediction_id) > (current.created_at, &current.prediction_id) {
                    *current = p;
                }
            })
            .or_insert(p);
    }
    latest
}
