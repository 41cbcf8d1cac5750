//! # conclave-decay
//!
//! The single half-life decay law shared by memory retrieval, calibration
//! learning rates, and belief-revision impact, plus the retrieval scorer
//! that blends semantic similarity with recency.

pub mod law;
pub mod resolver;
pub mod scorer;

pub use law::{age_days, decayed_rate, half_life_decay};
pub use resolver::HalfLifeResolver;
pub use scorer::{MemoryCandidate, MemoryDecayScorer, RetrievalScore};
