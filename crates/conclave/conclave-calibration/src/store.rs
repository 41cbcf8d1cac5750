//! InMemoryCalibrationStore: DashMap-backed compare-and-swap store.
//!
//! Shard locks make each `compare_and_swap` atomic per key, so concurrent
//! writers to one (expert, category) serialize while different keys proceed
//! in parallel. The application ledger is checked and written under the
//! same shard lock as the state it guards.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};

use conclave_core::errors::ConclaveResult;
use conclave_core::models::{CalibrationKey, CalibrationState, ExpertId};
use conclave_core::traits::{CasOutcome, ICalibrationStore};

#[derive(Debug, Default)]
pub struct InMemoryCalibrationStore {
    states: DashMap<CalibrationKey, CalibrationState>,
    applications: DashSet<(CalibrationKey, String)>,
}

impl InMemoryCalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn swap(&self, expected: Option<u64>, next: &CalibrationState, game_id: Option<&str>) -> CasOutcome {
        let written = |version: u64| CalibrationState {
            version,
            updated_at: Utc::now(),
            ..next.clone()
        };
        let ledger_key = game_id.map(|g| (next.key.clone(), g.to_string()));

        let entry = self.states.entry(next.key.clone());
        if ledger_key.as_ref().is_some_and(|k| self.applications.contains(k)) {
            return CasOutcome::AlreadyApplied;
        }
        let record = || {
            if let Some(key) = &ledger_key {
                self.applications.insert(key.clone());
            }
        };
        match entry {
            Entry::Occupied(mut slot) => {
                let current = slot.get().version;
                if expected != Some(current) {
                    return CasOutcome::Conflict { current: Some(current) };
                }
                slot.insert(written(current + 1));
                record();
                CasOutcome::Applied { version: current + 1 }
            }
            Entry::Vacant(slot) => {
                if expected.is_some() {
                    return CasOutcome::Conflict { current: None };
                }
                let _held = slot.insert(written(1));
                record();
                CasOutcome::Applied { version: 1 }
            }
        }
    }
}

impl ICalibrationStore for InMemoryCalibrationStore {
    fn get(&self, key: &CalibrationKey) -> ConclaveResult<Option<CalibrationState>> {
        Ok(self.states.get(key).map(|s| s.value().clone()))
    }

    fn compare_and_swap(
        &self,
        expected: Option<u64>,
        next: &CalibrationState,
    ) -> ConclaveResult<CasOutcome> {
        Ok(self.swap(expected, next, None))
    }

    fn apply_settlement(
        &self,
        expected: Option<u64>,
        next: &CalibrationState,
        game_id: &str,
    ) -> ConclaveResult<CasOutcome> {
        Ok(self.swap(expected, next, Some(game_id)))
    }

    fn is_applied(&self, key: &CalibrationKey, game_id: &str) -> ConclaveResult<bool> {
        Ok(self.applications.contains(&(key.clone(), game_id.to_string())))
    }

    fn list_for_expert(&self, expert_id: &ExpertId) -> ConclaveResult<Vec<CalibrationState>> {
        let mut states: Vec<CalibrationState> = self
            .states
            .iter()
            .filter(|entry| &entry.key().expert_id == expert_id)
            .map(|entry| entry.value().clone())
            .collect();
        states.sort_by(|a, b| a.key.category_id.cmp(&b.key.category_id));
        Ok(states)
    }
}
