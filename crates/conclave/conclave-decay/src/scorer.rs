//! MemoryDecayScorer: recency-adjusted retrieval ranking.
//!
//! ```text
//! decay       = 0.5^(age_days / half_life_days)
//! final_score = similarity_weight × similarity + decay_weight × decay
//! ```
//!
//! Weights default to 0.70 / 0.30 and, like half-lives, are tunable per
//! expert (and per category for half-lives) through `DecayConfig`.
//! The scorer holds no mutable state and is safe to share across threads.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use conclave_core::config::DecayConfig;
use conclave_core::models::{Expert, ExpertId};

use crate::law::{age_days, half_life_decay};
use crate::resolver::HalfLifeResolver;

/// A memory retrieved by semantic search, awaiting recency adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCandidate {
    pub memory_id: String,
    pub expert_id: ExpertId,
    /// Category the memory relates to, for half-life overrides.
    pub category_id: Option<String>,
    /// Semantic similarity in [0, 1]. Out-of-range values are clamped.
    pub similarity: f64,
    pub created_at: DateTime<Utc>,
}

/// Breakdown of a candidate's retrieval score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalScore {
    pub memory_id: String,
    pub similarity: f64,
    pub decay: f64,
    pub half_life_days: f64,
    pub final_score: f64,
}

/// Scores memories by similarity blended with half-life decay.
#[derive(Debug, Clone, Default)]
pub struct MemoryDecayScorer {
    resolver: HalfLifeResolver,
}

impl MemoryDecayScorer {
    pub fn new(config: &DecayConfig) -> Self {
        Self {
            resolver: HalfLifeResolver::new(config),
        }
    }

    pub fn from_roster(config: &DecayConfig, roster: &[Expert]) -> Self {
        Self {
            resolver: HalfLifeResolver::from_roster(config, roster),
        }
    }

    pub fn resolver(&self) -> &HalfLifeResolver {
        &self.resolver
    }

    /// Raw decay for a memory of `age_days` under `half_life_days`.
    pub fn decay(&self, age_days: f64, half_life_days: f64) -> f64 {
        half_life_decay(age_days, half_life_days)
    }

    /// Decay using the expert's configured half-life.
    pub fn decay_for(&self, expert_id: &ExpertId, category_id: Option<&str>, age_days: f64) -> f64 {
        half_life_decay(age_days, self.resolver.half_life_days(expert_id, category_id))
    }

    /// Score one candidate as of `now`.
    pub fn score(&self, candidate: &MemoryCandidate, now: DateTime<Utc>) -> RetrievalScore {
        let half_life_days = self
            .resolver
            .half_life_days(&candidate.expert_id, candidate.category_id.as_deref());
        let decay = half_life_decay(age_days(candidate.created_at, now), half_life_days);
        let similarity = if candidate.similarity.is_finite() {
            candidate.similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (w_sim, w_decay) = self.resolver.blend(&candidate.expert_id);

        RetrievalScore {
            memory_id: candidate.memory_id.clone(),
            similarity,
            decay,
            half_life_days,
            final_score: w_sim * similarity + w_decay * decay,
        }
    }

    /// Score and sort candidates by `final_score` descending; ties go to the
    /// lower memory id.
    pub fn rank(&self, candidates: &[MemoryCandidate], now: DateTime<Utc>) -> Vec<RetrievalScore> {
        let mut scored: Vec<RetrievalScore> = candidates.iter().map(|c| self.score(c, now)).collect();
        scored.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.memory_id.cmp(&b.memory_id))
        });
        scored
    }
}
