//! Run registry.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use conclave_core::errors::{ConclaveError, ConclaveResult};
use conclave_core::models::{RunId, RunRecord, RunStatus};

use super::{format_ts, parse_ts};
use crate::{corrupt, to_storage_err};

pub fn insert_run(conn: &Connection, run_id: &RunId, cohort: &str) -> ConclaveResult<()> {
    conn.execute(
        "INSERT INTO runs (run_id, cohort, status, started_at)
         VALUES (?1, ?2, 'open', ?3)
         ON CONFLICT(run_id) DO NOTHING",
        params![run_id.as_str(), cohort, format_ts(&Utc::now())],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_run(conn: &Connection, run_id: &RunId) -> ConclaveResult<Option<RunRecord>> {
    let row = conn
        .query_row(
            "SELECT cohort, status, started_at, completed_at FROM runs WHERE run_id = ?1",
            params![run_id.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((cohort, status, started_at, completed_at)) = row else {
        return Ok(None);
    };
    let status = RunStatus::parse(&status).ok_or_else(|| corrupt("runs", format!("unknown status {status:?}")))?;
    Ok(Some(RunRecord {
        run_id: run_id.clone(),
        cohort,
        status,
        started_at: parse_ts("runs", &started_at)?,
        completed_at: completed_at.map(|ts| parse_ts("runs", &ts)).transpose()?,
    }))
}

pub fn mark_complete(conn: &Connection, run_id: &RunId) -> ConclaveResult<()> {
    let changed = conn
        .execute(
            "UPDATE runs SET status = 'complete', completed_at = ?2
             WHERE run_id = ?1 AND status = 'open'",
            params![run_id.as_str(), format_ts(&Utc::now())],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 && get_run(conn, run_id)?.is_none() {
        return Err(ConclaveError::RunNotFound(run_id.to_string()));
    }
    Ok(())
}
