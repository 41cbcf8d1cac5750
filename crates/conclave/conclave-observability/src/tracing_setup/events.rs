//! Structured log events for pipeline milestones.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

use conclave_core::models::{ConsensusResult, CouncilSnapshot, ExpertId, RunId};

pub fn run_started(run_id: &RunId, cohort: &str) {
    tracing::info!(event = "run_started", run_id = %run_id, cohort = %cohort, "run started");
}

/// Log the seated council. Short councils log at `warn`.
pub fn council_selected(snapshot: &CouncilSnapshot) {
    if snapshot.is_short() {
        tracing::warn!(
            event = "council_selected",
            run_id = %snapshot.run_id,
            seats = snapshot.members.len(),
            requested = snapshot.requested_size,
            eligible_pool = snapshot.eligible_pool,
            fingerprint = %snapshot.fingerprint,
            "council seated below requested size"
        );
    } else {
        tracing::info!(
            event = "council_selected",
            run_id = %snapshot.run_id,
            seats = snapshot.members.len(),
            eligible_pool = snapshot.eligible_pool,
            fingerprint = %snapshot.fingerprint,
            "council selected"
        );
    }
}

pub fn consensus_computed(result: &ConsensusResult) {
    tracing::info!(
        event = "consensus_computed",
        run_id = %result.run_id,
        game_id = %result.game_id,
        category_id = %result.category_id,
        reached = result.is_reached(),
        agreement = result.agreement,
        confidence = result.confidence,
        contributors = result.contributing_experts.len(),
        "consensus computed"
    );
}

pub fn calibration_queued(expert_id: &ExpertId, category_id: &str, game_id: &str) {
    tracing::warn!(
        event = "calibration_queued",
        expert_id = %expert_id,
        category_id = %category_id,
        game_id = %game_id,
        "calibration update queued after exhausting retries"
    );
}

pub fn run_completed(run_id: &RunId, contests: usize, reached: usize) {
    tracing::info!(
        event = "run_completed",
        run_id = %run_id,
        contests = contests,
        reached = reached,
        "run completed"
    );
}
