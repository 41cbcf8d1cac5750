//! Consensus results and belief revisions.

use rusqlite::{params, Connection};

use conclave_core::errors::ConclaveResult;
use conclave_core::models::{
    BeliefRevision, ConsensusResult, ConsensusStatus, ExpertId, RevisionTrigger, RunId,
};

use super::{format_ts, parse_json, parse_ts};
use crate::{corrupt, to_storage_err};

fn status_name(status: ConsensusStatus) -> &'static str {
    match status {
        ConsensusStatus::Reached => "reached",
        ConsensusStatus::InsufficientData => "insufficient_data",
    }
}

fn parse_status(raw: &str) -> ConclaveResult<ConsensusStatus> {
    match raw {
        "reached" => Ok(ConsensusStatus::Reached),
        "insufficient_data" => Ok(ConsensusStatus::InsufficientData),
        other => Err(corrupt("consensus_results", format!("unknown status {other:?}"))),
    }
}

fn parse_trigger(raw: &str) -> ConclaveResult<RevisionTrigger> {
    match raw {
        "complete_reversal" => Ok(RevisionTrigger::CompleteReversal),
        "magnitude_adjustment" => Ok(RevisionTrigger::MagnitudeAdjustment),
        other => Err(corrupt("belief_revisions", format!("unknown trigger {other:?}"))),
    }
}

pub fn upsert_consensus(conn: &Connection, result: &ConsensusResult) -> ConclaveResult<()> {
    let value = result
        .consensus_value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    let contributing = serde_json::to_string(&result.contributing_experts)?;
    let dropped = serde_json::to_string(&result.dropped)?;
    conn.execute(
        "INSERT INTO consensus_results
            (run_id, game_id, category_id, status, consensus_value, agreement, confidence, contributing_experts, dropped)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(run_id, game_id, category_id) DO UPDATE SET
            status = excluded.status,
            consensus_value = excluded.consensus_value,
            agreement = excluded.agreement,
            confidence = excluded.confidence,
            contributing_experts = excluded.contributing_experts,
            dropped = excluded.dropped",
        params![
            result.run_id.as_str(),
            result.game_id,
            result.category_id,
            status_name(result.status),
            value,
            result.agreement,
            result.confidence,
            contributing,
            dropped,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_consensus(conn: &Connection, run_id: &RunId, game_id: &str) -> ConclaveResult<Vec<ConsensusResult>> {
    let mut stmt = conn
        .prepare(
            "SELECT category_id, status, consensus_value, agreement, confidence, contributing_experts, dropped
             FROM consensus_results
             WHERE run_id = ?1 AND game_id = ?2
             ORDER BY category_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id.as_str(), game_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        let (category_id, status, value, agreement, confidence, contributing, dropped) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        results.push(ConsensusResult {
            game_id: game_id.to_string(),
            category_id,
            run_id: run_id.clone(),
            status: parse_status(&status)?,
            consensus_value: value.map(|v| parse_json("consensus_results", &v)).transpose()?,
            agreement,
            confidence,
            contributing_experts: parse_json("consensus_results", &contributing)?,
            dropped: parse_json("consensus_results", &dropped)?,
        });
    }
    Ok(results)
}

/// Revisions are immutable; re-inserting the same id is a no-op.
pub fn insert_revision(conn: &Connection, revision: &BeliefRevision) -> ConclaveResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO belief_revisions
            (revision_id, expert_id, game_id, category_id, from_prediction_id, to_prediction_id,
             impact_score, trigger_type, revised_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            revision.revision_id,
            revision.expert_id.as_str(),
            revision.game_id,
            revision.category_id,
            revision.from_prediction_id,
            revision.to_prediction_id,
            revision.impact_score,
            revision.trigger_type.name(),
            format_ts(&revision.revised_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_revisions(conn: &Connection, expert_id: &ExpertId) -> ConclaveResult<Vec<BeliefRevision>> {
    let mut stmt = conn
        .prepare(
            "SELECT revision_id, game_id, category_id, from_prediction_id, to_prediction_id,
                    impact_score, trigger_type, revised_at
             FROM belief_revisions
             WHERE expert_id = ?1
             ORDER BY revised_at, revision_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![expert_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut revisions = Vec::new();
    for row in rows {
        let (revision_id, game_id, category_id, from_id, to_id, impact_score, trigger, revised_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        revisions.push(BeliefRevision {
            revision_id,
            expert_id: expert_id.clone(),
            game_id,
            category_id,
            from_prediction_id: from_id,
            to_prediction_id: to_id,
            impact_score,
            trigger_type: parse_trigger(&trigger)?,
            revised_at: parse_ts("belief_revisions", &revised_at)?,
        });
    }
    Ok(revisions)
}
