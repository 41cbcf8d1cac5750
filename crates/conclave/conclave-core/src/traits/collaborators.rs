//! External collaborators. Implementations do their I/O here so the
//! scoring and aggregation stages stay pure.

use crate::errors::ConclaveResult;
use crate::models::{
    EligibilityStats, ExpertId, PerformanceStats, Prediction, RunId, Settlement, VotingMetrics,
};

/// Supplies raw per-category predictions produced by the experts.
pub trait IPredictionSource: Send + Sync {
    /// Predictions from the given experts for one contest. May contain
    /// malformed values; those are dropped per category downstream.
    fn predictions_for(&self, game_id: &str, experts: &[ExpertId]) -> ConclaveResult<Vec<Prediction>>;
}

/// Supplies normalized rolling statistics, refreshed at least once per window.
pub trait IPerformanceSource: Send + Sync {
    fn performance_stats(&self, run_id: &RunId) -> ConclaveResult<Vec<PerformanceStats>>;
    fn eligibility_stats(&self, run_id: &RunId) -> ConclaveResult<Vec<EligibilityStats>>;
    fn voting_metrics(&self, run_id: &RunId, experts: &[ExpertId]) -> ConclaveResult<Vec<VotingMetrics>>;
}

/// Supplies ground truth once a contest resolves.
pub trait ISettlementFeed: Send + Sync {
    fn settlements_for(&self, game_id: &str) -> ConclaveResult<Vec<Settlement>>;
}
