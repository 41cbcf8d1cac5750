use crate::errors::ConclaveResult;
use crate::models::{
    BeliefRevision, ConsensusResult, CouncilMembership, CouncilSnapshot, EligibilityVerdict,
    ExpertId, RunId, RunRecord, SelectionScore, VoteWeight,
};

/// Run-scoped persistence contract.
///
/// Every row is keyed by `run_id`; upserts for one run never touch another
/// run's rows. Readers must always filter by `run_id`.
pub trait IRunStore: Send + Sync {
    /// Register a run in `Open` state. Re-registering an open run is a no-op.
    fn begin_run(&self, run_id: &RunId, cohort: &str) -> ConclaveResult<()>;
    fn get_run(&self, run_id: &RunId) -> ConclaveResult<Option<RunRecord>>;
    fn mark_run_complete(&self, run_id: &RunId) -> ConclaveResult<()>;

    fn upsert_eligibility(&self, verdict: &EligibilityVerdict) -> ConclaveResult<()>;
    fn upsert_selection_score(&self, score: &SelectionScore) -> ConclaveResult<()>;
    /// Replace the run's council with the snapshot's members.
    fn upsert_council(&self, snapshot: &CouncilSnapshot) -> ConclaveResult<()>;
    fn upsert_vote_weights(&self, weights: &[VoteWeight]) -> ConclaveResult<()>;
    fn upsert_consensus(&self, result: &ConsensusResult) -> ConclaveResult<()>;
    fn insert_belief_revision(&self, revision: &BeliefRevision) -> ConclaveResult<()>;

    /// Experts whose eligibility verdict for the run is positive, in id order.
    fn list_eligible_experts(&self, run_id: &RunId) -> ConclaveResult<Vec<ExpertId>>;
    /// Selection scores for the run, in expert id order.
    fn list_selection_scores(&self, run_id: &RunId) -> ConclaveResult<Vec<SelectionScore>>;
    /// Council members for the run, in rank order.
    fn list_council_members(&self, run_id: &RunId) -> ConclaveResult<Vec<CouncilMembership>>;
    fn list_vote_weights(&self, run_id: &RunId) -> ConclaveResult<Vec<VoteWeight>>;
    fn list_consensus(&self, run_id: &RunId, game_id: &str) -> ConclaveResult<Vec<ConsensusResult>>;
    fn list_belief_revisions(&self, expert_id: &ExpertId) -> ConclaveResult<Vec<BeliefRevision>>;
}
