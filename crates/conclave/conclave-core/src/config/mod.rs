//! Pipeline configuration with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`CONCLAVE_*`)
//! 2. Config file (`conclave.toml`)
//! 3. Compiled defaults
//!
//! Validation runs once, at load. Nothing is re-validated mid-run.
//!
//! # Examples
//!
//! ```
//! use conclave_core::config::ConclaveConfig;
//!
//! let config = ConclaveConfig::from_toml("[selection]\ncouncil_size = 7\n").unwrap();
//! assert_eq!(config.selection.council_size, 7);
//! assert!((config.decay.similarity_weight - 0.70).abs() < f64::EPSILON);
//! ```

mod calibration_config;
mod consensus_config;
mod decay_config;
pub mod defaults;
mod observability_config;
mod selection_config;
mod voting_config;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use calibration_config::CalibrationConfig;
pub use consensus_config::ConsensusConfig;
pub use decay_config::{DecayConfig, ExpertDecayProfile};
pub use observability_config::ObservabilityConfig;
pub use selection_config::{SelectionConfig, SelectionWeights};
pub use voting_config::VotingConfig;

use crate::constants::{MAX_EXPERT_HALF_LIFE_DAYS, MIN_EXPERT_HALF_LIFE_DAYS, WEIGHT_SUM_TOLERANCE};
use crate::errors::ConfigError;
use crate::models::Expert;

/// Environment variable names recognised by [`ConclaveConfig::apply_env_overrides`].
pub const ENV_COUNCIL_SIZE: &str = "CONCLAVE_COUNCIL_SIZE";
pub const ENV_MAX_LATENCY_MS: &str = "CONCLAVE_MAX_LATENCY_MS";
pub const ENV_EMA_LAMBDA: &str = "CONCLAVE_EMA_LAMBDA";
pub const ENV_LOG_LEVEL: &str = "CONCLAVE_LOG_LEVEL";

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConclaveConfig {
    pub selection: SelectionConfig,
    pub voting: VotingConfig,
    pub consensus: ConsensusConfig,
    pub calibration: CalibrationConfig,
    pub decay: DecayConfig,
    pub observability: ObservabilityConfig,
}

impl ConclaveConfig {
    /// Load configuration: defaults, then the optional file, then env vars,
    /// then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without env overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CONCLAVE_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_COUNCIL_SIZE) {
            debug!(var = ENV_COUNCIL_SIZE, "config overridden from environment");
            self.selection.council_size = parse_env(ENV_COUNCIL_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_LATENCY_MS) {
            debug!(var = ENV_MAX_LATENCY_MS, "config overridden from environment");
            self.selection.max_latency_ms = parse_env(ENV_MAX_LATENCY_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_EMA_LAMBDA) {
            debug!(var = ENV_EMA_LAMBDA, "config overridden from environment");
            self.calibration.ema_lambda = parse_env(ENV_EMA_LAMBDA, &value)?;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            debug!(var = ENV_LOG_LEVEL, "config overridden from environment");
            self.observability.log_level = value;
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_selection()?;
        self.validate_voting()?;
        self.validate_consensus()?;
        self.validate_calibration()?;
        self.validate_decay()
    }

    /// Check the config against the registered roster: K may not exceed it,
    /// and every expert's half-life must be in range.
    pub fn validate_roster(&self, roster: &[Expert]) -> Result<(), ConfigError> {
        if self.selection.council_size > roster.len() {
            return Err(invalid(
                "selection.council_size",
                format!(
                    "council size {} exceeds roster of {} experts",
                    self.selection.council_size,
                    roster.len()
                ),
            ));
        }
        for expert in roster {
            check_expert_half_life(
                &format!("experts.{}.memory_half_life_days", expert.expert_id),
                expert.memory_half_life_days,
            )?;
        }
        Ok(())
    }

    fn validate_selection(&self) -> Result<(), ConfigError> {
        let s = &self.selection;
        if s.council_size == 0 {
            return Err(invalid("selection.council_size", "must be at least 1"));
        }
        if let Some(roster) = s.roster_size {
            if s.council_size > roster {
                return Err(invalid(
                    "selection.council_size",
                    format!("council size {} exceeds roster size {roster}", s.council_size),
                ));
            }
        }
        let weights = s.weights.as_array();
        for (name, w) in weights {
            check_non_negative(&format!("selection.weights.{name}"), w)?;
        }
        check_weight_sum("selection.weights", weights.iter().map(|(_, w)| w).sum())?;
        check_unit_interval("selection.min_schema_validity", s.min_schema_validity)?;
        if !(s.max_latency_ms > 0.0 && s.max_latency_ms.is_finite()) {
            return Err(invalid("selection.max_latency_ms", "must be a positive number"));
        }
        Ok(())
    }

    fn validate_voting(&self) -> Result<(), ConfigError> {
        let v = &self.voting;
        for (name, w) in [
            ("voting.accuracy_weight", v.accuracy_weight),
            ("voting.recent_performance_weight", v.recent_performance_weight),
            ("voting.confidence_weight", v.confidence_weight),
            ("voting.tenure_weight", v.tenure_weight),
        ] {
            check_non_negative(name, w)?;
        }
        check_weight_sum("voting", v.weight_sum())?;
        if v.tenure_saturation_runs == 0 {
            return Err(invalid("voting.tenure_saturation_runs", "must be at least 1"));
        }
        if !(v.min_raw_weight > 0.0 && v.min_raw_weight.is_finite()) {
            return Err(invalid("voting.min_raw_weight", "must be > 0"));
        }
        Ok(())
    }

    fn validate_consensus(&self) -> Result<(), ConfigError> {
        let t = self.consensus.tie_tolerance;
        if !(t >= 0.0 && t.is_finite()) {
            return Err(invalid("consensus.tie_tolerance", "must be >= 0"));
        }
        Ok(())
    }

    fn validate_calibration(&self) -> Result<(), ConfigError> {
        let c = &self.calibration;
        if !(c.ema_lambda > 0.0 && c.ema_lambda <= 1.0) {
            return Err(invalid("calibration.ema_lambda", "must be in (0, 1]"));
        }
        if !(c.base_rate > 0.0 && c.base_rate.is_finite()) {
            return Err(invalid("calibration.base_rate", "must be > 0"));
        }
        if !(c.seed_mean >= 0.0 && c.seed_mean.is_finite()) {
            return Err(invalid("calibration.seed_mean", "must be >= 0"));
        }
        if !(c.seed_stddev >= 0.0 && c.seed_stddev.is_finite()) {
            return Err(invalid("calibration.seed_stddev", "must be >= 0"));
        }
        Ok(())
    }

    fn validate_decay(&self) -> Result<(), ConfigError> {
        let d = &self.decay;
        check_blend("decay", d.similarity_weight, d.decay_weight)?;
        check_positive("decay.default_half_life_days", d.default_half_life_days)?;
        for (expert_id, profile) in &d.experts {
            check_expert_half_life(
                &format!("decay.experts.{expert_id}.half_life_days"),
                profile.half_life_days,
            )?;
            for (category, days) in &profile.category_overrides {
                check_positive(
                    &format!("decay.experts.{expert_id}.category_overrides.{category}"),
                    *days,
                )?;
            }
            match (profile.similarity_weight, profile.decay_weight) {
                (None, None) => {}
                (Some(s), Some(w)) => check_blend(&format!("decay.experts.{expert_id}"), s, w)?,
                _ => {
                    return Err(invalid(
                        &format!("decay.experts.{expert_id}"),
                        "similarity_weight and decay_weight must be set together",
                    ))
                }
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.into(),
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        var: var.to_string(),
        value: value.to_string(),
    })
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be >= 0"))
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be between 0.0 and 1.0"))
    }
}

fn check_weight_sum(field: &str, sum: f64) -> Result<(), ConfigError> {
    if (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
        Ok(())
    } else {
        Err(invalid(field, format!("weights must sum to 1.0, got {sum}")))
    }
}

fn check_blend(field: &str, similarity: f64, decay: f64) -> Result<(), ConfigError> {
    check_non_negative(&format!("{field}.similarity_weight"), similarity)?;
    check_non_negative(&format!("{field}.decay_weight"), decay)?;
    check_weight_sum(field, similarity + decay)
}

fn check_expert_half_life(field: &str, days: f64) -> Result<(), ConfigError> {
    if days.is_finite() && (MIN_EXPERT_HALF_LIFE_DAYS..=MAX_EXPERT_HALF_LIFE_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("half-life {days} outside [{MIN_EXPERT_HALF_LIFE_DAYS}, {MAX_EXPERT_HALF_LIFE_DAYS}] days"),
        ))
    }
}
