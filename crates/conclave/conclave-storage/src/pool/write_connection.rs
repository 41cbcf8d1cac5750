//! Single serialized write connection.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use conclave_core::errors::{ConclaveError, ConclaveResult};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Owns the only connection; callers take turns through the mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> ConclaveResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> ConclaveResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> ConclaveResult<T>
    where
        F: FnOnce(&Connection) -> ConclaveResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| ConclaveError::Concurrency(format!("write connection lock poisoned: {e}")))?;
        f(&guard)
    }
}
