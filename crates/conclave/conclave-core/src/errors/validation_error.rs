use crate::category::DataType;

/// Input validation failures.
///
/// These are recovered locally: the offending vote or metric is dropped
/// and processing continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The value's type does not match the category's data type.
    #[error("category {category_id}: expected {expected} value, found {found}")]
    WrongType {
        category_id: String,
        expected: DataType,
        found: String,
    },

    /// A categorical value is not one of the enumerated choices.
    #[error("category {category_id}: value {value:?} is not a valid choice")]
    NotAChoice { category_id: String, value: String },

    /// A numeric value is outside the category's range.
    #[error("category {category_id}: value {value} outside [{min}, {max}]")]
    OutOfRange {
        category_id: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A numeric value is NaN or infinite.
    #[error("category {category_id}: value is not finite")]
    NonFinite { category_id: String },

    /// Prediction confidence outside [0, 1].
    #[error("confidence {0} outside [0, 1]")]
    InvalidConfidence(f64),

    /// A pre-normalized metric outside [0, 1] or not finite.
    #[error("metric {field} = {value} outside [0, 1]")]
    InvalidMetric { field: &'static str, value: f64 },

    /// The prediction's category does not exist in the registry.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// A category definition is internally inconsistent.
    #[error("invalid category definition {category_id}: {reason}")]
    InvalidDefinition { category_id: String, reason: String },
}
