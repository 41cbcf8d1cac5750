//! SQL for each table family. Every function takes a borrowed connection so
//! it can run inside the writer's critical section or a transaction.

pub mod calibration_ops;
pub mod consensus_ops;
pub mod run_ops;
pub mod selection_ops;

use chrono::{DateTime, Utc};

use conclave_core::errors::ConclaveResult;

use crate::corrupt;

pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn parse_ts(table: &'static str, raw: &str) -> ConclaveResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(table, format!("bad timestamp {raw:?}: {e}")))
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(table: &'static str, raw: &str) -> ConclaveResult<T> {
    serde_json::from_str(raw).map_err(|e| corrupt(table, e.to_string()))
}
