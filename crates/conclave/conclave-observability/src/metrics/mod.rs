//! Per-run counters.

use serde::{Deserialize, Serialize};

use conclave_core::models::{ConsensusResult, CouncilSnapshot, EligibilityVerdict, RunId};

/// Counts for one run, filled in as the pipeline advances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub run_id: RunId,
    pub eligible: usize,
    pub ineligible: usize,
    pub council_seats: usize,
    pub requested_seats: usize,
    pub contests: usize,
    pub categories_reached: usize,
    pub categories_insufficient: usize,
    pub dropped_votes: usize,
    pub calibration_applied: usize,
    pub calibration_queued: usize,
    pub duplicate_settlements: usize,
    pub revisions: usize,
}

impl RunMetrics {
    pub fn new(run_id: &RunId) -> Self {
        Self {
            run_id: run_id.clone(),
            ..Self::default()
        }
    }

    pub fn record_verdicts(&mut self, verdicts: &[EligibilityVerdict]) {
        let eligible = verdicts.iter().filter(|v| v.eligible).count();
        self.eligible += eligible;
        self.ineligible += verdicts.len() - eligible;
    }

    pub fn record_council(&mut self, snapshot: &CouncilSnapshot) {
        self.council_seats = snapshot.members.len();
        self.requested_seats = snapshot.requested_size;
    }

    /// Record one contest's per-category results.
    pub fn record_contest(&mut self, results: &[ConsensusResult]) {
        self.contests += 1;
        for result in results {
            if result.is_reached() {
                self.categories_reached += 1;
            } else {
                self.categories_insufficient += 1;
            }
            self.dropped_votes += result.dropped.len();
        }
    }

    pub fn record_settlement(&mut self, applied: usize, queued: usize, duplicates: usize, revisions: usize) {
        self.calibration_applied += applied;
        self.calibration_queued += queued;
        self.duplicate_settlements += duplicates;
        self.revisions += revisions;
    }

    /// Share of aggregated categories that reached consensus; 0 when none ran.
    pub fn reached_ratio(&self) -> f64 {
        let total = self.categories_reached + self.categories_insufficient;
        if total == 0 {
            0.0
        } else {
            self.categories_reached as f64 / total as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
