//! Numbered schema migrations, applied in order above `PRAGMA user_version`.

mod v001_run_tables;
mod v002_calibration_tables;
mod v003_calibration_applications;

use rusqlite::Connection;
use tracing::info;

use conclave_core::errors::{ConclaveResult, StorageError};

/// Latest schema version.
pub const LATEST_VERSION: u32 = 3;

pub fn run_migrations(conn: &Connection) -> ConclaveResult<()> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::MigrationFailed {
            version: 0,
            message: e.to_string(),
        })?;

    let migrations: &[(&str, u32)] = &[
        (v001_run_tables::MIGRATION_SQL, 1),
        (v002_calibration_tables::MIGRATION_SQL, 2),
        (v003_calibration_applications::MIGRATION_SQL, 3),
    ];

    for (sql, version) in migrations {
        if current_version < *version {
            info!(version, "applying migration");
            conn.execute_batch(sql).map_err(|e| StorageError::MigrationFailed {
                version: *version,
                message: e.to_string(),
            })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
        }
    }
    Ok(())
}

/// Current `user_version` of the database.
pub fn schema_version(conn: &Connection) -> ConclaveResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| crate::to_storage_err(e.to_string()))
}
