use conclave_core::config::ObservabilityConfig;
use conclave_core::models::{ConsensusResult, DroppedVote, ExpertId, PredictionValue, RunId};
use conclave_observability::tracing_setup::events;
use conclave_observability::{init_from_config, init_tracing_with_filter, RunMetrics};
use test_fixtures::council;

// ─── Tracing setup ───────────────────────────────────────────────────────────

#[test]
fn second_init_is_harmless() {
    let _ = init_tracing_with_filter("debug");
    assert!(!init_tracing_with_filter("debug"));
    assert!(!init_from_config(&ObservabilityConfig::default()));

    // Events must not panic with or without a subscriber.
    let run = RunId::from("r1");
    events::run_started(&run, "production");
    events::council_selected(&council(&run, &["a", "b"]));
    events::calibration_queued(&ExpertId::from("a"), "winner", "g1");
    events::run_completed(&run, 1, 1);
}

// ─── Run metrics ─────────────────────────────────────────────────────────────

fn reached(run: &RunId, category: &str) -> ConsensusResult {
    ConsensusResult {
        game_id: "g1".to_string(),
        category_id: category.to_string(),
        run_id: run.clone(),
        status: conclave_core::models::ConsensusStatus::Reached,
        consensus_value: Some(PredictionValue::from("home")),
        agreement: 0.8,
        confidence: 0.6,
        contributing_experts: vec![ExpertId::from("a")],
        dropped: vec![DroppedVote {
            expert_id: ExpertId::from("b"),
            reason: "missing prediction".to_string(),
        }],
    }
}

#[test]
fn metrics_count_contest_outcomes() {
    let run = RunId::from("r1");
    let mut metrics = RunMetrics::new(&run);
    assert_eq!(metrics.reached_ratio(), 0.0);

    metrics.record_council(&council(&run, &["a", "b", "c"]));
    metrics.record_contest(&[
        reached(&run, "winner"),
        reached(&run, "overtime"),
        ConsensusResult::insufficient(&run, "g1", "total_points", Vec::new()),
    ]);
    metrics.record_settlement(3, 1, 2, 1);

    assert_eq!(metrics.council_seats, 3);
    assert_eq!(metrics.contests, 1);
    assert_eq!(metrics.categories_reached, 2);
    assert_eq!(metrics.categories_insufficient, 1);
    assert_eq!(metrics.dropped_votes, 2);
    assert!((metrics.reached_ratio() - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(metrics.calibration_queued, 1);
}

#[test]
fn metrics_serialize_to_json() {
    let mut metrics = RunMetrics::new(&RunId::from("r9"));
    metrics.record_settlement(4, 0, 0, 2);
    let json = metrics.to_json().unwrap();
    assert_eq!(json["run_id"], "r9");
    assert_eq!(json["calibration_applied"], 4);
    assert_eq!(json["revisions"], 2);
}
