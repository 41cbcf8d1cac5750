//! # conclave-selection
//!
//! Decides which experts' votes count for a run.
//!
//! ## Modules
//!
//! - [`eligibility`]: SLO-based admission gate (samples, schema validity, latency)
//! - [`scorer`]: Five-component selection score
//! - [`council`]: Deterministic top-K council selection
//! - [`voting`]: Four-component, renormalized vote weights

pub mod council;
pub mod eligibility;
pub mod scorer;
pub mod voting;

pub use council::CouncilSelector;
pub use eligibility::EligibilityGate;
pub use scorer::SelectionScorer;
pub use voting::VoteWeightCalculator;
