use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ExpertId;
use crate::constants::{MAX_EXPERT_HALF_LIFE_DAYS, MIN_EXPERT_HALF_LIFE_DAYS};
use crate::errors::{ConclaveResult, ConfigError};

/// A forecaster in the pool. Identity is immutable; traits may be retuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expert {
    pub expert_id: ExpertId,
    /// Personality trait vector. Opaque to the pipeline.
    #[serde(default)]
    pub traits: BTreeMap<String, f64>,
    /// Days after which a memory retains half its weight.
    pub memory_half_life_days: f64,
}

impl Expert {
    /// Create an expert, rejecting half-lives outside 30–900 days.
    pub fn new(expert_id: impl Into<ExpertId>, memory_half_life_days: f64) -> ConclaveResult<Self> {
        let expert = Self {
            expert_id: expert_id.into(),
            traits: BTreeMap::new(),
            memory_half_life_days,
        };
        expert.check_half_life()?;
        Ok(expert)
    }

    pub fn with_trait(mut self, name: &str, value: f64) -> Self {
        self.traits.insert(name.to_string(), value);
        self
    }

    /// Half-life must be within the supported range.
    pub fn check_half_life(&self) -> ConclaveResult<()> {
        let hl = self.memory_half_life_days;
        if !hl.is_finite() || !(MIN_EXPERT_HALF_LIFE_DAYS..=MAX_EXPERT_HALF_LIFE_DAYS).contains(&hl) {
            return Err(ConfigError::ValidationFailed {
                field: format!("experts.{}.memory_half_life_days", self.expert_id),
                message: format!(
                    "{hl} outside [{MIN_EXPERT_HALF_LIFE_DAYS}, {MAX_EXPERT_HALF_LIFE_DAYS}]"
                ),
            }
            .into());
        }
        Ok(())
    }
}
