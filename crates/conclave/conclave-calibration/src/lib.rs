//! # conclave-calibration
//!
//! Closes the loop after ground truth arrives: per-(expert, category)
//! posteriors, their settlement-driven updates, and belief-revision records.
//!
//! ## Modules
//!
//! - [`posterior`]: Beta and EMA update rules, Beta summaries via `statrs`
//! - [`store`]: In-memory compare-and-swap calibration store
//! - [`tracker`]: CalibrationTracker: exactly-once, per-key serialized updates with a pending queue
//! - [`revision`]: Belief-revision detection and decayed impact

pub mod posterior;
pub mod revision;
pub mod store;
pub mod tracker;

pub use posterior::{credible_interval, BetaSummary, Observation};
pub use revision::{BeliefRevisionTracker, RevisionDecay};
pub use store::InMemoryCalibrationStore;
pub use tracker::{CalibrationTracker, PendingUpdate, SettlementReport};
