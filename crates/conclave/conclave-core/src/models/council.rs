use serde::{Deserialize, Serialize};

use super::{ExpertId, RunId};

/// One admitted council seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilMembership {
    pub run_id: RunId,
    pub expert_id: ExpertId,
    /// 1-based, unique within the run.
    pub rank: u32,
    pub score: f64,
}

/// Immutable council for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilSnapshot {
    pub run_id: RunId,
    pub members: Vec<CouncilMembership>,
    /// Configured K.
    pub requested_size: usize,
    /// Number of eligible, scored experts considered.
    pub eligible_pool: usize,
    /// blake3 digest of the ordered `(rank, expert_id, score)` rows.
    pub fingerprint: String,
}

impl CouncilSnapshot {
    /// The council has fewer seats than K because the eligible pool was small.
    pub fn is_short(&self) -> bool {
        self.members.len() < self.requested_size
    }

    pub fn expert_ids(&self) -> Vec<ExpertId> {
        self.members.iter().map(|m| m.expert_id.clone()).collect()
    }

    pub fn contains(&self, expert_id: &ExpertId) -> bool {
        self.members.iter().any(|m| &m.expert_id == expert_id)
    }
}
