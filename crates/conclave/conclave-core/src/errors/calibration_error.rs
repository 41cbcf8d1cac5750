/// Calibration update failures.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    /// Compare-and-swap retries exhausted for a posterior key. The update is
    /// queued for replay, never dropped.
    #[error("concurrent update conflict on {key} after {attempts} attempts")]
    ConcurrentUpdateConflict { key: String, attempts: u32 },

    /// Stored posterior kind does not match the category's data type.
    #[error("posterior kind mismatch on {key}: expected {expected}")]
    PosteriorMismatch { key: String, expected: &'static str },
}
