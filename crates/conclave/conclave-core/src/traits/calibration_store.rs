use crate::errors::ConclaveResult;
use crate::models::{CalibrationKey, CalibrationState, ExpertId};

/// Result of a compare-and-swap write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// Written; the stored state now has this version.
    Applied { version: u64 },
    /// Another writer got there first. `current` is the stored version, or
    /// `None` if the key is absent.
    Conflict { current: Option<u64> },
    /// The contest was already folded into this key; nothing was written.
    AlreadyApplied,
}

/// Keyed posterior store with optimistic concurrency.
///
/// Every update is a read-modify-write: read the state, compute the new
/// posterior, then `compare_and_swap` against the version that was read.
///
/// Settled contests go through `apply_settlement`, which also records
/// `(key, game_id)` in an application ledger kept beside the states, so a
/// contest moves a posterior at most once no matter how many trackers
/// share the store.
pub trait ICalibrationStore: Send + Sync {
    fn get(&self, key: &CalibrationKey) -> ConclaveResult<Option<CalibrationState>>;

    /// Write `next` iff the stored version equals `expected`
    /// (`None` = key must be absent). On success the stored version is
    /// `expected.map_or(1, |v| v + 1)`, regardless of `next.version`.
    fn compare_and_swap(
        &self,
        expected: Option<u64>,
        next: &CalibrationState,
    ) -> ConclaveResult<CasOutcome>;

    /// `compare_and_swap` plus a ledger entry for `(next.key, game_id)`,
    /// written atomically. Returns [`CasOutcome::AlreadyApplied`] without
    /// touching the state if the ledger already holds the entry; on a
    /// conflict neither is written.
    fn apply_settlement(
        &self,
        expected: Option<u64>,
        next: &CalibrationState,
        game_id: &str,
    ) -> ConclaveResult<CasOutcome>;

    /// Whether `game_id` has already been applied to `key`.
    fn is_applied(&self, key: &CalibrationKey, game_id: &str) -> ConclaveResult<bool>;

    /// All states for an expert, in category order.
    fn list_for_expert(&self, expert_id: &ExpertId) -> ConclaveResult<Vec<CalibrationState>>;
}
