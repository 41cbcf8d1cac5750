//! Versioned calibration rows.
//!
//! Writes are conditional on the stored version: an absent key is inserted
//! with `INSERT OR IGNORE`, an existing one is updated `WHERE version = ?`.
//! Zero affected rows means another writer won.
//!
//! Settlements also write a `calibration_applications` row inside the same
//! IMMEDIATE transaction; an existing row means the contest was applied.

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

use conclave_core::errors::ConclaveResult;
use conclave_core::models::{CalibrationKey, CalibrationState, ExpertId, Posterior, RunId};
use conclave_core::traits::CasOutcome;

use super::{format_ts, parse_ts};
use crate::{corrupt, to_storage_err};

const SELECT_COLUMNS: &str =
    "SELECT expert_id, category_id, posterior_kind, param_a, param_b, run_id, observations, version, updated_at
     FROM calibration_states";

type RawState = (String, String, String, f64, f64, String, i64, i64, String);

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawState> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn decode(raw: RawState) -> ConclaveResult<CalibrationState> {
    let (expert_id, category_id, kind, a, b, run_id, observations, version, updated_at) = raw;
    let posterior = match kind.as_str() {
        "beta" => Posterior::Beta { alpha: a, beta: b },
        "ema" => Posterior::Ema { mu: a, sigma: b },
        other => return Err(corrupt("calibration_states", format!("unknown posterior kind {other:?}"))),
    };
    Ok(CalibrationState {
        key: CalibrationKey {
            expert_id: ExpertId(expert_id),
            category_id,
        },
        posterior,
        run_id: RunId(run_id),
        observations: observations as u64,
        version: version as u64,
        updated_at: parse_ts("calibration_states", &updated_at)?,
    })
}

fn params_of(posterior: &Posterior) -> (&'static str, f64, f64) {
    match *posterior {
        Posterior::Beta { alpha, beta } => ("beta", alpha, beta),
        Posterior::Ema { mu, sigma } => ("ema", mu, sigma),
    }
}

pub fn get_state(conn: &Connection, key: &CalibrationKey) -> ConclaveResult<Option<CalibrationState>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE expert_id = ?1 AND category_id = ?2"),
        params![key.expert_id.as_str(), key.category_id],
        read_raw,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(decode)
    .transpose()
}

fn current_version(conn: &Connection, key: &CalibrationKey) -> ConclaveResult<Option<u64>> {
    conn.query_row(
        "SELECT version FROM calibration_states WHERE expert_id = ?1 AND category_id = ?2",
        params![key.expert_id.as_str(), key.category_id],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map(|v| v.map(|v| v as u64))
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn compare_and_swap(
    conn: &Connection,
    expected: Option<u64>,
    next: &CalibrationState,
) -> ConclaveResult<CasOutcome> {
    let (kind, a, b) = params_of(&next.posterior);
    let key = &next.key;
    let new_version = expected.map_or(1, |v| v + 1);

    let changed = match expected {
        None => conn.execute(
            "INSERT OR IGNORE INTO calibration_states
                (expert_id, category_id, posterior_kind, param_a, param_b, run_id, observations, version, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
            params![
                key.expert_id.as_str(),
                key.category_id,
                kind,
                a,
                b,
                next.run_id.as_str(),
                next.observations as i64,
                format_ts(&next.updated_at),
            ],
        ),
        Some(version) => conn.execute(
            "UPDATE calibration_states
             SET posterior_kind = ?3, param_a = ?4, param_b = ?5, run_id = ?6,
                 observations = ?7, version = ?8, updated_at = ?9
             WHERE expert_id = ?1 AND category_id = ?2 AND version = ?10",
            params![
                key.expert_id.as_str(),
                key.category_id,
                kind,
                a,
                b,
                next.run_id.as_str(),
                next.observations as i64,
                new_version as i64,
                format_ts(&next.updated_at),
                version as i64,
            ],
        ),
    }
    .map_err(|e| to_storage_err(e.to_string()))?;

    if changed == 1 {
        Ok(CasOutcome::Applied { version: new_version })
    } else {
        Ok(CasOutcome::Conflict {
            current: current_version(conn, key)?,
        })
    }
}

pub fn is_applied(conn: &Connection, key: &CalibrationKey, game_id: &str) -> ConclaveResult<bool> {
    conn.query_row(
        "SELECT 1 FROM calibration_applications
         WHERE expert_id = ?1 AND category_id = ?2 AND game_id = ?3",
        params![key.expert_id.as_str(), key.category_id, game_id],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Versioned write plus ledger row, all-or-nothing.
pub fn apply_settlement(
    conn: &Connection,
    expected: Option<u64>,
    next: &CalibrationState,
    game_id: &str,
) -> ConclaveResult<CasOutcome> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| to_storage_err(format!("apply_settlement begin: {e}")))?;

    match apply_settlement_inner(&tx, expected, next, game_id) {
        Ok(outcome @ CasOutcome::Applied { .. }) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("apply_settlement commit: {e}")))?;
            Ok(outcome)
        }
        Ok(outcome) => {
            let _ = tx.rollback();
            Ok(outcome)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn apply_settlement_inner(
    conn: &Connection,
    expected: Option<u64>,
    next: &CalibrationState,
    game_id: &str,
) -> ConclaveResult<CasOutcome> {
    if is_applied(conn, &next.key, game_id)? {
        return Ok(CasOutcome::AlreadyApplied);
    }
    let outcome = compare_and_swap(conn, expected, next)?;
    let CasOutcome::Applied { version } = outcome else {
        return Ok(outcome);
    };
    conn.execute(
        "INSERT INTO calibration_applications (expert_id, category_id, game_id, run_id, version, applied_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            next.key.expert_id.as_str(),
            next.key.category_id,
            game_id,
            next.run_id.as_str(),
            version as i64,
            format_ts(&next.updated_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(outcome)
}

pub fn list_for_expert(conn: &Connection, expert_id: &ExpertId) -> ConclaveResult<Vec<CalibrationState>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} WHERE expert_id = ?1 ORDER BY category_id"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![expert_id.as_str()], read_raw)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut states = Vec::new();
    for row in rows {
        states.push(decode(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(states)
}
