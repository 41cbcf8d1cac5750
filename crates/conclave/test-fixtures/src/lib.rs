//! Test fixtures for Conclave: JSON scenario loading plus builders for
//! experts, statistics, councils, weights, and predictions.

use std::path::PathBuf;

use serde::de::DeserializeOwned;

use conclave_core::models::{
    CouncilMembership, CouncilSnapshot, EligibilityStats, Expert, ExpertId, PerformanceStats,
    Prediction, PredictionValue, RunId, VoteWeight, VotingMetrics,
};

/// Root directory of the test-fixtures data folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("scenarios").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// `n` experts named `expert-0..n` with half-lives spread over 30–900 days.
pub fn roster(n: usize) -> Vec<Expert> {
    (0..n)
        .map(|i| {
            let half_life = 30.0 + (i as f64 * 97.0) % 870.0;
            Expert {
                expert_id: ExpertId(format!("expert-{i}")),
                traits: Default::default(),
                memory_half_life_days: half_life,
            }
        })
        .collect()
}

/// Performance stats with explicit components.
pub fn performance(
    expert: &str,
    accuracy: f64,
    recent: f64,
    consistency: f64,
    calibration: f64,
    specialization: f64,
) -> PerformanceStats {
    PerformanceStats {
        expert_id: ExpertId::from(expert),
        accuracy,
        recent_performance: recent,
        consistency,
        calibration_quality: calibration,
        specialization_strength: specialization,
    }
}

/// Performance stats with every component equal to `level`.
pub fn uniform_performance(expert: &str, level: f64) -> PerformanceStats {
    performance(expert, level, level, level, level, level)
}

/// Eligibility stats that pass the default gate.
pub fn healthy(expert: &str) -> EligibilityStats {
    EligibilityStats {
        expert_id: ExpertId::from(expert),
        sample_size: 50,
        schema_validity_rate: 0.995,
        avg_latency_ms: 1_200.0,
    }
}

/// Voting metrics.
pub fn voting(expert: &str, accuracy: f64, recent: f64, confidence: f64, tenure_runs: u32) -> VotingMetrics {
    VotingMetrics {
        expert_id: ExpertId::from(expert),
        accuracy,
        recent_performance: recent,
        confidence_calibration: confidence,
        tenure_runs,
    }
}

/// A council seating `experts` in the given rank order.
pub fn council(run_id: &RunId, experts: &[&str]) -> CouncilSnapshot {
    let members = experts
        .iter()
        .enumerate()
        .map(|(i, e)| CouncilMembership {
            run_id: run_id.clone(),
            expert_id: ExpertId::from(*e),
            rank: i as u32 + 1,
            score: 1.0 - i as f64 * 0.01,
        })
        .collect();
    CouncilSnapshot {
        run_id: run_id.clone(),
        members,
        requested_size: experts.len(),
        eligible_pool: experts.len(),
        fingerprint: "fixture".to_string(),
    }
}

/// Vote weights taken as already normalized.
pub fn weights(run_id: &RunId, pairs: &[(&str, f64)]) -> Vec<VoteWeight> {
    pairs
        .iter()
        .map(|(e, w)| VoteWeight {
            expert_id: ExpertId::from(*e),
            run_id: run_id.clone(),
            raw_weight: *w,
            normalized_weight: *w,
        })
        .collect()
}

/// A prediction timestamped now.
pub fn predict(
    expert: &str,
    game: &str,
    category: &str,
    value: impl Into<PredictionValue>,
    confidence: f64,
) -> Prediction {
    Prediction::new(expert, game, category, value, confidence)
}
