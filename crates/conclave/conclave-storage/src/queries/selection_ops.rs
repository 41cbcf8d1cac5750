//! Eligibility verdicts, selection scores, council snapshots, vote weights.

use rusqlite::{params, Connection};

use conclave_core::errors::ConclaveResult;
use conclave_core::models::{
    CouncilMembership, CouncilSnapshot, EligibilityVerdict, ExpertId, RunId, SelectionScore,
    VoteWeight,
};

use super::parse_json;
use crate::to_storage_err;

pub fn upsert_eligibility(conn: &Connection, verdict: &EligibilityVerdict) -> ConclaveResult<()> {
    let failures = serde_json::to_string(&verdict.failures)?;
    conn.execute(
        "INSERT INTO eligibility (run_id, expert_id, eligible, schema_validity_rate, avg_latency_ms, failures)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(run_id, expert_id) DO UPDATE SET
            eligible = excluded.eligible,
            schema_validity_rate = excluded.schema_validity_rate,
            avg_latency_ms = excluded.avg_latency_ms,
            failures = excluded.failures",
        params![
            verdict.run_id.as_str(),
            verdict.expert_id.as_str(),
            verdict.eligible,
            verdict.schema_validity_rate,
            verdict.avg_latency_ms,
            failures,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_eligible(conn: &Connection, run_id: &RunId) -> ConclaveResult<Vec<ExpertId>> {
    let mut stmt = conn
        .prepare("SELECT expert_id FROM eligibility WHERE run_id = ?1 AND eligible = 1 ORDER BY expert_id")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id.as_str()], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.map(|r| r.map(ExpertId).map_err(|e| to_storage_err(e.to_string())))
        .collect()
}

pub fn upsert_selection_score(conn: &Connection, score: &SelectionScore) -> ConclaveResult<()> {
    let components = serde_json::to_string(&score.components)?;
    conn.execute(
        "INSERT INTO selection_scores (run_id, expert_id, score, components)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(run_id, expert_id) DO UPDATE SET
            score = excluded.score,
            components = excluded.components",
        params![score.run_id.as_str(), score.expert_id.as_str(), score.score, components],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn list_selection_scores(conn: &Connection, run_id: &RunId) -> ConclaveResult<Vec<SelectionScore>> {
    let mut stmt = conn
        .prepare("SELECT expert_id, score, components FROM selection_scores WHERE run_id = ?1 ORDER BY expert_id")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?, row.get::<_, String>(2)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut scores = Vec::new();
    for row in rows {
        let (expert_id, score, components) = row.map_err(|e| to_storage_err(e.to_string()))?;
        scores.push(SelectionScore {
            expert_id: ExpertId(expert_id),
            run_id: run_id.clone(),
            score,
            components: parse_json("selection_scores", &components)?,
        });
    }
    Ok(scores)
}

/// Replace the run's council in one transaction.
pub fn replace_council(conn: &Connection, snapshot: &CouncilSnapshot) -> ConclaveResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let run_id = snapshot.run_id.as_str();

    tx.execute("DELETE FROM council_members WHERE run_id = ?1", params![run_id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    for member in &snapshot.members {
        tx.execute(
            "INSERT INTO council_members (run_id, expert_id, rank, score) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, member.expert_id.as_str(), member.rank, member.score],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    tx.execute(
        "INSERT INTO council_snapshots (run_id, requested_size, eligible_pool, fingerprint)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(run_id) DO UPDATE SET
            requested_size = excluded.requested_size,
            eligible_pool = excluded.eligible_pool,
            fingerprint = excluded.fingerprint",
        params![
            run_id,
            snapshot.requested_size as i64,
            snapshot.eligible_pool as i64,
            snapshot.fingerprint,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    tx.commit().map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_council(conn: &Connection, run_id: &RunId) -> ConclaveResult<Vec<CouncilMembership>> {
    let mut stmt = conn
        .prepare("SELECT expert_id, rank, score FROM council_members WHERE run_id = ?1 ORDER BY rank")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id.as_str()], |row| {
            Ok(CouncilMembership {
                run_id: run_id.clone(),
                expert_id: ExpertId(row.get(0)?),
                rank: row.get(1)?,
                score: row.get(2)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.map(|r| r.map_err(|e| to_storage_err(e.to_string()))).collect()
}

/// Upsert a run's weights in one transaction.
pub fn upsert_vote_weights(conn: &Connection, weights: &[VoteWeight]) -> ConclaveResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(e.to_string()))?;
    for w in weights {
        tx.execute(
            "INSERT INTO vote_weights (run_id, expert_id, raw_weight, normalized_weight)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(run_id, expert_id) DO UPDATE SET
                raw_weight = excluded.raw_weight,
                normalized_weight = excluded.normalized_weight",
            params![w.run_id.as_str(), w.expert_id.as_str(), w.raw_weight, w.normalized_weight],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    tx.commit().map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_vote_weights(conn: &Connection, run_id: &RunId) -> ConclaveResult<Vec<VoteWeight>> {
    let mut stmt = conn
        .prepare(
            "SELECT w.expert_id, w.raw_weight, w.normalized_weight
             FROM vote_weights w
             LEFT JOIN council_members m ON m.run_id = w.run_id AND m.expert_id = w.expert_id
             WHERE w.run_id = ?1
             ORDER BY m.rank, w.expert_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id.as_str()], |row| {
            Ok(VoteWeight {
                expert_id: ExpertId(row.get(0)?),
                run_id: run_id.clone(),
                raw_weight: row.get(1)?,
                normalized_weight: row.get(2)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.map(|r| r.map_err(|e| to_storage_err(e.to_string()))).collect()
}
