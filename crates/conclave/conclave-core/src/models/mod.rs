//! Data model shared by every pipeline stage.

pub mod calibration;
pub mod consensus;
pub mod council;
pub mod expert;
pub mod ids;
pub mod prediction;
pub mod revision;
pub mod run;
pub mod selection;
pub mod settlement;
pub mod vote;

pub use calibration::{CalibrationKey, CalibrationState, Posterior};
pub use consensus::{ConsensusResult, ConsensusStatus, DroppedVote};
pub use council::{CouncilMembership, CouncilSnapshot};
pub use expert::Expert;
pub use ids::{ExpertId, RunId};
pub use prediction::{Prediction, PredictionValue};
pub use revision::{BeliefRevision, RevisionTrigger};
pub use run::{RunRecord, RunStatus};
pub use selection::{
    ComponentBreakdown, EligibilityFailure, EligibilityStats, EligibilityVerdict,
    PerformanceStats, SelectionScore,
};
pub use settlement::Settlement;
pub use vote::{VoteWeight, VotingMetrics};
