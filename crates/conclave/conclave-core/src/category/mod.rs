//! Prediction categories: identifiers, data types, value domains, and
//! scoring weights. Categories are immutable reference data.

mod defaults;
mod registry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::PredictionValue;

pub use defaults::default_categories;
pub use registry::CategoryRegistry;

/// How a category's values are represented and aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// One of an enumerated set of choices. Binary outcomes are two-choice categoricals.
    Categorical,
    /// A continuous quantity within a numeric range.
    Numeric,
    /// A probability in [0, 1].
    Percentage,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Categorical => "categorical",
            Self::Numeric => "numeric",
            Self::Percentage => "percentage",
        }
    }

    /// Whether this type is calibrated with a Beta posterior (vs. EMA).
    pub fn uses_beta_posterior(&self) -> bool {
        matches!(self, Self::Categorical)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Difficulty tier, informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Easy,
    Moderate,
    Hard,
    Expert,
}

/// The set of values a category accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidDomain {
    /// Enumerated choices (categorical).
    Choices { values: Vec<String> },
    /// Inclusive numeric range (numeric / percentage).
    Range { min: f64, max: f64 },
}

/// A prediction category definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub group: String,
    pub data_type: DataType,
    pub valid_domain: ValidDomain,
    /// Relative importance when scoring an expert across categories. Must be > 0.
    pub scoring_weight: f64,
    pub difficulty: DifficultyTier,
}

impl Category {
    /// Build a categorical category over the given choices.
    pub fn categorical(id: &str, group: &str, choices: &[&str], difficulty: DifficultyTier) -> Self {
        Self {
            category_id: id.to_string(),
            group: group.to_string(),
            data_type: DataType::Categorical,
            valid_domain: ValidDomain::Choices {
                values: choices.iter().map(|c| c.to_string()).collect(),
            },
            scoring_weight: 1.0,
            difficulty,
        }
    }

    /// Build a numeric category over `[min, max]`.
    pub fn numeric(id: &str, group: &str, min: f64, max: f64, difficulty: DifficultyTier) -> Self {
        Self {
            category_id: id.to_string(),
            group: group.to_string(),
            data_type: DataType::Numeric,
            valid_domain: ValidDomain::Range { min, max },
            scoring_weight: 1.0,
            difficulty,
        }
    }

    /// Build a percentage category; the domain is always `[0, 1]`.
    pub fn percentage(id: &str, group: &str, difficulty: DifficultyTier) -> Self {
        Self {
            category_id: id.to_string(),
            group: group.to_string(),
            data_type: DataType::Percentage,
            valid_domain: ValidDomain::Range { min: 0.0, max: 1.0 },
            scoring_weight: 1.0,
            difficulty,
        }
    }

    pub fn with_scoring_weight(mut self, weight: f64) -> Self {
        self.scoring_weight = weight;
        self
    }

    /// Width of the numeric domain. 1.0 for categoricals and degenerate ranges.
    pub fn domain_span(&self) -> f64 {
        match &self.valid_domain {
            ValidDomain::Range { min, max } if max > min => max - min,
            _ => 1.0,
        }
    }

    /// Check that the definition itself is consistent.
    pub fn check_definition(&self) -> Result<(), ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidDefinition {
            category_id: self.category_id.clone(),
            reason: reason.to_string(),
        };

        if self.category_id.trim().is_empty() {
            return Err(invalid("empty category id"));
        }
        if self.scoring_weight <= 0.0 || !self.scoring_weight.is_finite() {
            return Err(invalid("scoring weight must be > 0"));
        }
        match (&self.data_type, &self.valid_domain) {
            (DataType::Categorical, ValidDomain::Choices { values }) => {
                if values.len() < 2 {
                    return Err(invalid("categorical needs at least two choices"));
                }
            }
            (DataType::Numeric, ValidDomain::Range { min, max }) => {
                if !(min.is_finite() && max.is_finite()) || min >= max {
                    return Err(invalid("numeric range must be finite with min < max"));
                }
            }
            (DataType::Percentage, ValidDomain::Range { min, max }) => {
                if *min != 0.0 || *max != 1.0 {
                    return Err(invalid("percentage domain must be [0, 1]"));
                }
            }
            _ => return Err(invalid("domain kind does not match data type")),
        }
        Ok(())
    }

    /// Validate a predicted value against this category's type and domain.
    pub fn validate(&self, value: &PredictionValue) -> Result<(), ValidationError> {
        match (&self.data_type, &self.valid_domain) {
            (DataType::Categorical, ValidDomain::Choices { values }) => {
                let choice = value.as_choice().ok_or_else(|| self.wrong_type(value))?;
                if values.iter().any(|v| v == choice.as_ref()) {
                    Ok(())
                } else {
                    Err(ValidationError::NotAChoice {
                        category_id: self.category_id.clone(),
                        value: choice.into_owned(),
                    })
                }
            }
            (DataType::Numeric | DataType::Percentage, ValidDomain::Range { min, max }) => {
                let number = value.as_number().ok_or_else(|| self.wrong_type(value))?;
                if !number.is_finite() {
                    return Err(ValidationError::NonFinite {
                        category_id: self.category_id.clone(),
                    });
                }
                if number < *min || number > *max {
                    return Err(ValidationError::OutOfRange {
                        category_id: self.category_id.clone(),
                        value: number,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(())
            }
            _ => Err(ValidationError::InvalidDefinition {
                category_id: self.category_id.clone(),
                reason: "domain kind does not match data type".to_string(),
            }),
        }
    }

    fn wrong_type(&self, value: &PredictionValue) -> ValidationError {
        ValidationError::WrongType {
            category_id: self.category_id.clone(),
            expected: self.data_type,
            found: value.kind_name().to_string(),
        }
    }
}
