//! # conclave-core
//!
//! Foundation crate for the Conclave consensus pipeline.
//! Defines the data model, the category registry, storage and collaborator
//! traits, errors, config, and constants. Every other crate in the
//! workspace depends on this.

pub mod category;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use category::{Category, CategoryRegistry, DataType, DifficultyTier, ValidDomain};
pub use config::ConclaveConfig;
pub use errors::{ConclaveError, ConclaveResult};
pub use models::{ExpertId, Prediction, PredictionValue, RunId};
