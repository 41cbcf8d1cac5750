//! StorageEngine: owns the write connection, runs migrations on open, and
//! implements IRunStore + ICalibrationStore.

use std::path::Path;

use tracing::{debug, info};

use conclave_core::errors::ConclaveResult;
use conclave_core::models::{
    BeliefRevision, CalibrationKey, CalibrationState, ConsensusResult, CouncilMembership,
    CouncilSnapshot, EligibilityVerdict, ExpertId, RunId, RunRecord, SelectionScore, VoteWeight,
};
use conclave_core::traits::{CasOutcome, ICalibrationStore, IRunStore};

use crate::migrations;
use crate::pool::WriteConnection;
use crate::queries::{calibration_ops, consensus_ops, run_ops, selection_ops};

/// SQLite-backed store for every pipeline entity.
pub struct StorageEngine {
    writer: WriteConnection,
}

impl StorageEngine {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> ConclaveResult<Self> {
        let engine = Self {
            writer: WriteConnection::open(path)?,
        };
        engine.initialize()?;
        info!(path = %path.display(), "storage opened");
        Ok(engine)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> ConclaveResult<Self> {
        let engine = Self {
            writer: WriteConnection::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> ConclaveResult<()> {
        self.writer.with_conn_sync(migrations::run_migrations)
    }

    pub fn schema_version(&self) -> ConclaveResult<u32> {
        self.writer.with_conn_sync(migrations::schema_version)
    }
}

impl IRunStore for StorageEngine {
    fn begin_run(&self, run_id: &RunId, cohort: &str) -> ConclaveResult<()> {
        debug!(run_id = %run_id, cohort, "registering run");
        self.writer.with_conn_sync(|conn| run_ops::insert_run(conn, run_id, cohort))
    }

    fn get_run(&self, run_id: &RunId) -> ConclaveResult<Option<RunRecord>> {
        self.writer.with_conn_sync(|conn| run_ops::get_run(conn, run_id))
    }

    fn mark_run_complete(&self, run_id: &RunId) -> ConclaveResult<()> {
        self.writer.with_conn_sync(|conn| run_ops::mark_complete(conn, run_id))
    }

    fn upsert_eligibility(&self, verdict: &EligibilityVerdict) -> ConclaveResult<()> {
        self.writer.with_conn_sync(|conn| selection_ops::upsert_eligibility(conn, verdict))
    }

    fn upsert_selection_score(&self, score: &SelectionScore) -> ConclaveResult<()> {
        self.writer.with_conn_sync(|conn| selection_ops::upsert_selection_score(conn, score))
    }

    fn upsert_council(&self, snapshot: &CouncilSnapshot) -> ConclaveResult<()> {
        self.writer.with_conn_sync(|conn| selection_ops::replace_council(conn, snapshot))
    }

    fn upsert_vote_weights(&self, weights: &[VoteWeight]) -> ConclaveResult<()> {
        self.writer.with_conn_sync(|conn| selection_ops::upsert_vote_weights(conn, weights))
    }

    fn upsert_consensus(&self, result: &ConsensusResult) -> ConclaveResult<()> {
        self.writer.with_conn_sync(|conn| consensus_ops::upsert_consensus(conn, result))
    }

    fn insert_belief_revision(&self, revision: &BeliefRevision) -> ConclaveResult<()> {
        self.writer.with_conn_sync(|conn| consensus_ops::insert_revision(conn, revision))
    }

    fn list_eligible_experts(&self, run_id: &RunId) -> ConclaveResult<Vec<ExpertId>> {
        self.writer.with_conn_sync(|conn| selection_ops::list_eligible(conn, run_id))
    }

    fn list_selection_scores(&self, run_id: &RunId) -> ConclaveResult<Vec<SelectionScore>> {
        self.writer.with_conn_sync(|conn| selection_ops::list_selection_scores(conn, run_id))
    }

    fn list_council_members(&self, run_id: &RunId) -> ConclaveResult<Vec<CouncilMembership>> {
        self.writer.with_conn_sync(|conn| selection_ops::list_council(conn, run_id))
    }

    fn list_vote_weights(&self, run_id: &RunId) -> ConclaveResult<Vec<VoteWeight>> {
        self.writer.with_conn_sync(|conn| selection_ops::list_vote_weights(conn, run_id))
    }

    fn list_consensus(&self, run_id: &RunId, game_id: &str) -> ConclaveResult<Vec<ConsensusResult>> {
        self.writer.with_conn_sync(|conn| consensus_ops::list_consensus(conn, run_id, game_id))
    }

    fn list_belief_revisions(&self, expert_id: &ExpertId) -> ConclaveResult<Vec<BeliefRevision>> {
        self.writer.with_conn_sync(|conn| consensus_ops::list_revisions(conn, expert_id))
    }
}

impl ICalibrationStore for StorageEngine {
    fn get(&self, key: &CalibrationKey) -> ConclaveResult<Option<CalibrationState>> {
        self.writer.with_conn_sync(|conn| calibration_ops::get_state(conn, key))
    }

    fn compare_and_swap(
        &self,
        expected: Option<u64>,
        next: &CalibrationState,
    ) -> ConclaveResult<CasOutcome> {
        self.writer
            .with_conn_sync(|conn| calibration_ops::compare_and_swap(conn, expected, next))
    }

    fn apply_settlement(
        &self,
        expected: Option<u64>,
        next: &CalibrationState,
        game_id: &str,
    ) -> ConclaveResult<CasOutcome> {
        self.writer
            .with_conn_sync(|conn| calibration_ops::apply_settlement(conn, expected, next, game_id))
    }

    fn is_applied(&self, key: &CalibrationKey, game_id: &str) -> ConclaveResult<bool> {
        self.writer
            .with_conn_sync(|conn| calibration_ops::is_applied(conn, key, game_id))
    }

    fn list_for_expert(&self, expert_id: &ExpertId) -> ConclaveResult<Vec<CalibrationState>> {
        self.writer.with_conn_sync(|conn| calibration_ops::list_for_expert(conn, expert_id))
    }
}
