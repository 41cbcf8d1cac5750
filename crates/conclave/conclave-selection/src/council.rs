//! CouncilSelector: admit the top-K experts by selection score.
//!
//! Ordering: score descending, then `recent_performance` descending, then
//! expert id ascending. The result is fully determined by the input set, so
//! re-running with the same scores and run id yields the same snapshot,
//! down to the fingerprint.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{info, instrument, warn};

use conclave_core::models::{CouncilMembership, CouncilSnapshot, RunId, SelectionScore};

/// Selects the council for a run.
pub struct CouncilSelector {
    council_size: usize,
}

impl CouncilSelector {
    pub fn new(council_size: usize) -> Self {
        Self { council_size }
    }

    pub fn council_size(&self) -> usize {
        self.council_size
    }

    /// Rank `scores` and keep the top K. Scores from other runs are ignored.
    /// A pool smaller than K yields a smaller council; that is reported, not an error.
    #[instrument(skip(self, scores), fields(run_id = %run_id, pool = scores.len()))]
    pub fn select(&self, run_id: &RunId, scores: &[SelectionScore]) -> CouncilSnapshot {
        let mut ranked: Vec<&SelectionScore> = scores.iter().filter(|s| &s.run_id == run_id).collect();
        ranked.sort_by(|a, b| compare(a, b));
        let mut seen = HashSet::new();
        ranked.retain(|s| seen.insert(s.expert_id.clone()));

        let eligible_pool = ranked.len();
        let members: Vec<CouncilMembership> = ranked
            .into_iter()
            .take(self.council_size)
            .enumerate()
            .map(|(i, s)| CouncilMembership {
                run_id: run_id.clone(),
                expert_id: s.expert_id.clone(),
                rank: i as u32 + 1,
                score: s.score,
            })
            .collect();

        if members.len() < self.council_size {
            warn!(
                seated = members.len(),
                requested = self.council_size,
                "eligible pool smaller than council size"
            );
        }

        let fingerprint = fingerprint(&members);
        info!(seated = members.len(), fingerprint = %fingerprint, "council selected");

        CouncilSnapshot {
            run_id: run_id.clone(),
            members,
            requested_size: self.council_size,
            eligible_pool,
            fingerprint,
        }
    }
}

fn compare(a: &SelectionScore, b: &SelectionScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.components.recent_performance.total_cmp(&a.components.recent_performance))
        .then_with(|| a.expert_id.cmp(&b.expert_id))
}

/// blake3 over `rank|expert_id|score-bits` rows.
fn fingerprint(members: &[CouncilMembership]) -> String {
    let mut hasher = blake3::Hasher::new();
    for m in members {
        hasher.update(&m.rank.to_le_bytes());
        hasher.update(m.expert_id.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(&m.score.to_bits().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
