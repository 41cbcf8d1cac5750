use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-expert decay tuning. Changing these requires no code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertDecayProfile {
    /// Expert-wide memory half-life in days (30–900).
    pub half_life_days: f64,
    /// Category-specific half-lives, e.g. slower decay for weather memories.
    #[serde(default)]
    pub category_overrides: BTreeMap<String, f64>,
    /// Overrides the global similarity weight for this expert.
    #[serde(default)]
    pub similarity_weight: Option<f64>,
    /// Overrides the global decay weight for this expert.
    #[serde(default)]
    pub decay_weight: Option<f64>,
}

impl ExpertDecayProfile {
    pub fn new(half_life_days: f64) -> Self {
        Self {
            half_life_days,
            category_overrides: BTreeMap::new(),
            similarity_weight: None,
            decay_weight: None,
        }
    }

    pub fn with_category(mut self, category_id: &str, half_life_days: f64) -> Self {
        self.category_overrides.insert(category_id.to_string(), half_life_days);
        self
    }

    pub fn with_blend(mut self, similarity_weight: f64, decay_weight: f64) -> Self {
        self.similarity_weight = Some(similarity_weight);
        self.decay_weight = Some(decay_weight);
        self
    }
}

/// Temporal decay and memory retrieval configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Retrieval blend: weight of semantic similarity. Default: 0.70.
    pub similarity_weight: f64,
    /// Retrieval blend: weight of recency decay. Default: 0.30.
    pub decay_weight: f64,
    /// Half-life for experts with no profile. Default: 90 days.
    pub default_half_life_days: f64,
    /// Profiles keyed by expert id.
    pub experts: BTreeMap<String, ExpertDecayProfile>,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            similarity_weight: defaults::DEFAULT_SIMILARITY_WEIGHT,
            decay_weight: defaults::DEFAULT_DECAY_WEIGHT,
            default_half_life_days: defaults::DEFAULT_HALF_LIFE_DAYS,
            experts: BTreeMap::new(),
        }
    }
}
