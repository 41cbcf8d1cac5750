/// Persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    /// Schema migration failed.
    #[error("migration v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    /// A stored row could not be decoded.
    #[error("corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },
}
