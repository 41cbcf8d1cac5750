//! Error taxonomy for the Conclave pipeline.
//!
//! `ConclaveError` is the top-level error returned through `ConclaveResult`.
//! Subsystem errors convert into it with `?`.
//!
//! Two failure kinds deliberately do NOT appear here:
//! - eligibility failures are reported as an `EligibilityVerdict`, not raised;
//! - insufficient data is a `ConsensusStatus`, not an error.

mod calibration_error;
mod config_error;
mod storage_error;
mod validation_error;

pub use calibration_error::CalibrationError;
pub use config_error::ConfigError;
pub use storage_error::StorageError;
pub use validation_error::ValidationError;

/// Result alias used across the workspace.
pub type ConclaveResult<T> = Result<T, ConclaveError>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum ConclaveError {
    /// A prediction, metric, or definition failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration rejected at load time.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calibration posterior update failure.
    #[error("calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock was poisoned or a concurrent primitive failed.
    #[error("concurrency error: {0}")]
    Concurrency(String),

    /// The requested run does not exist.
    #[error("run not found: {0}")]
    RunNotFound(String),

    /// A category id is not present in the registry.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
