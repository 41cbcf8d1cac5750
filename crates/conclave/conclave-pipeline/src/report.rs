use serde::Serialize;

use conclave_core::models::{ConsensusResult, CouncilSnapshot, RunId, VoteWeight};
use conclave_observability::RunMetrics;

/// Everything one executed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub council: CouncilSnapshot,
    pub weights: Vec<VoteWeight>,
    /// Per contest, in the order the contests were requested.
    pub results: Vec<Vec<ConsensusResult>>,
    pub metrics: RunMetrics,
}

impl RunReport {
    /// Results for one contest, if it was part of the run.
    pub fn contest(&self, game_id: &str) -> Option<&[ConsensusResult]> {
        self.results
            .iter()
            .find(|r| r.first().is_some_and(|c| c.game_id == game_id))
            .map(Vec::as_slice)
    }
}
