use conclave_core::config::{DecayConfig, ExpertDecayProfile};
use conclave_core::models::{Expert, ExpertId};

/// Resolves the half-life and retrieval blend for an expert (and optionally a
/// category) from configuration.
///
/// Lookup order: expert's category override, expert's half-life, then the
/// global default.
#[derive(Debug, Clone, Default)]
pub struct HalfLifeResolver {
    config: DecayConfig,
}

impl HalfLifeResolver {
    pub fn new(config: &DecayConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Build from config, adding a profile for every roster expert that has
    /// none, using the expert's own `memory_half_life_days`.
    pub fn from_roster(config: &DecayConfig, roster: &[Expert]) -> Self {
        let mut config = config.clone();
        for expert in roster {
            config
                .experts
                .entry(expert.expert_id.0.clone())
                .or_insert_with(|| ExpertDecayProfile::new(expert.memory_half_life_days));
        }
        Self { config }
    }

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    pub fn profile(&self, expert_id: &ExpertId) -> Option<&ExpertDecayProfile> {
        self.config.experts.get(expert_id.as_str())
    }

    /// Half-life in days for memories or evidence of `expert_id` in `category_id`.
    pub fn half_life_days(&self, expert_id: &ExpertId, category_id: Option<&str>) -> f64 {
        match self.profile(expert_id) {
            Some(profile) => category_id
                .and_then(|c| profile.category_overrides.get(c).copied())
                .unwrap_or(profile.half_life_days),
            None => self.config.default_half_life_days,
        }
    }

    /// `(similarity_weight, decay_weight)` for the expert.
    pub fn blend(&self, expert_id: &ExpertId) -> (f64, f64) {
        let global = (self.config.similarity_weight, self.config.decay_weight);
        match self.profile(expert_id) {
            Some(ExpertDecayProfile {
                similarity_weight: Some(s),
                decay_weight: Some(d),
                ..
            }) => (*s, *d),
            _ => global,
        }
    }
}
