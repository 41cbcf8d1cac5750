//! # conclave-storage
//!
//! SQLite persistence for Conclave. [`StorageEngine`] implements both the
//! run-scoped [`IRunStore`](conclave_core::traits::IRunStore) contract and
//! the versioned [`ICalibrationStore`](conclave_core::traits::ICalibrationStore).
//!
//! All writes go through one mutex-guarded connection. Schema changes are
//! numbered migrations tracked by `PRAGMA user_version`.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use conclave_core::errors::{ConclaveError, StorageError};

/// Wrap a rusqlite failure message as a storage error.
pub(crate) fn to_storage_err(message: String) -> ConclaveError {
    ConclaveError::Storage(StorageError::Sqlite { message })
}

/// A row that could not be decoded.
pub(crate) fn corrupt(table: &'static str, message: impl Into<String>) -> ConclaveError {
    ConclaveError::Storage(StorageError::CorruptRow {
        table,
        message: message.into(),
    })
}
