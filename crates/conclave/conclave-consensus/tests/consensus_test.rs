use std::collections::HashMap;
use std::sync::Arc;

use conclave_consensus::{CalibrationView, ConsensusEngine, ContestInput};
use conclave_core::config::ConsensusConfig;
use conclave_core::models::{
    CalibrationKey, CalibrationState, ConsensusStatus, Posterior, PredictionValue, RunId,
};
use conclave_core::{Category, CategoryRegistry, DifficultyTier};
use test_fixtures::{predict, weights};

fn engine() -> ConsensusEngine {
    ConsensusEngine::new(&ConsensusConfig::default(), Arc::new(CategoryRegistry::with_defaults()))
}

fn run() -> RunId {
    RunId::from("run-7")
}

fn five_seat_weights() -> Vec<conclave_core::models::VoteWeight> {
    weights(&run(), &[("e1", 0.30), ("e2", 0.25), ("e3", 0.20), ("e4", 0.15), ("e5", 0.10)])
}

// ── Categorical ─────────────────────────────────────────────────────────

#[test]
fn weighted_categorical_vote_picks_home() {
    let votes = ["home", "home", "away", "home", "away"];
    let predictions: Vec<_> = votes
        .iter()
        .enumerate()
        .map(|(i, v)| predict(&format!("e{}", i + 1), "g1", "winner", *v, 1.0))
        .collect();

    let results = engine().aggregate_contest(&run(), "g1", &five_seat_weights(), &predictions, &HashMap::new());
    assert_eq!(results.len(), 1);
    let r = &results[0];
    assert_eq!(r.status, ConsensusStatus::Reached);
    assert_eq!(r.consensus_value, Some(PredictionValue::from("home")));
    assert!((r.agreement - 0.70).abs() < 1e-9);
    assert!((r.confidence - 0.70).abs() < 1e-9);
    assert_eq!(r.contributing_experts.len(), 5);
}

#[test]
fn expected_category_nobody_submitted_is_insufficient() {
    let mut config = ConsensusConfig::default();
    config.expected_categories = vec!["winner".to_string(), "total_points".to_string()];
    let engine = ConsensusEngine::new(&config, Arc::new(CategoryRegistry::with_defaults()));
    let predictions: Vec<_> = (1..=5)
        .map(|i| predict(&format!("e{i}"), "g1", "winner", "home", 0.8))
        .collect();

    let results = engine.aggregate_contest(&run(), "g1", &five_seat_weights(), &predictions, &HashMap::new());
    assert_eq!(results.len(), 2);
    let total = results.iter().find(|r| r.category_id == "total_points").unwrap();
    assert_eq!(total.status, ConsensusStatus::InsufficientData);
    assert_eq!(total.consensus_value, None);
    assert_eq!(total.dropped.len(), 5);
    assert!(total.dropped.iter().all(|d| d.reason == "missing prediction"));

    let winner = results.iter().find(|r| r.category_id == "winner").unwrap();
    assert_eq!(winner.status, ConsensusStatus::Reached);
}

#[test]
fn unregistered_expected_category_is_skipped() {
    let mut config = ConsensusConfig::default();
    config.expected_categories = vec!["corner_kicks".to_string()];
    let engine = ConsensusEngine::new(&config, Arc::new(CategoryRegistry::with_defaults()));
    let predictions = vec![predict("e1", "g1", "winner", "home", 0.8)];
    let w = weights(&run(), &[("e1", 1.0)]);

    let results = engine.aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].category_id, "winner");
}

#[test]
fn categorical_confidence_scales_by_mean_member_confidence() {
    let predictions = vec![
        predict("e1", "g1", "winner", "home", 0.9),
        predict("e2", "g1", "winner", "home", 0.5),
    ];
    let w = weights(&run(), &[("e1", 0.5), ("e2", 0.5)]);
    let r = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    assert!((r.agreement - 1.0).abs() < 1e-12);
    assert!((r.confidence - 0.7).abs() < 1e-12);
}

#[test]
fn flag_votes_match_boolean_choices() {
    let registry = CategoryRegistry::from_categories(vec![Category::categorical(
        "defensive_td",
        "situational",
        &["true", "false"],
        DifficultyTier::Expert,
    )])
    .unwrap();
    let engine = ConsensusEngine::new(&ConsensusConfig::default(), Arc::new(registry));
    let predictions = vec![
        predict("e1", "g1", "defensive_td", PredictionValue::Flag(true), 0.6),
        predict("e2", "g1", "defensive_td", PredictionValue::Flag(false), 0.6),
        predict("e3", "g1", "defensive_td", PredictionValue::Flag(false), 0.6),
    ];
    let w = weights(&run(), &[("e1", 0.4), ("e2", 0.35), ("e3", 0.25)]);
    let r = &engine.aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    assert_eq!(r.consensus_value, Some(PredictionValue::from("false")));
}

// ── Numeric ─────────────────────────────────────────────────────────────

#[test]
fn weighted_numeric_mean() {
    let predictions = vec![
        predict("e1", "g1", "total_points", 48.0, 0.8),
        predict("e2", "g1", "total_points", 44.0, 0.8),
    ];
    let w = weights(&run(), &[("e1", 0.6), ("e2", 0.4)]);
    let r = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    let value = r.consensus_value.as_ref().and_then(PredictionValue::as_number).unwrap();
    assert!((value - 46.4).abs() < 1e-9);
    assert!(r.agreement > 0.9 && r.agreement < 1.0);
}

#[test]
fn malformed_vote_renormalizes_over_remaining_members() {
    let mut predictions = vec![predict("e1", "g1", "total_points", "forty-eight", 1.0)];
    for (expert, value) in [("e2", 40.0), ("e3", 50.0), ("e4", 60.0), ("e5", 30.0)] {
        predictions.push(predict(expert, "g1", "total_points", value, 1.0));
    }
    for expert in ["e1", "e2", "e3", "e4", "e5"] {
        predictions.push(predict(expert, "g1", "winner", "home", 1.0));
    }

    let results = engine().aggregate_contest(&run(), "g1", &five_seat_weights(), &predictions, &HashMap::new());
    let points = results.iter().find(|r| r.category_id == "total_points").unwrap();
    let winner = results.iter().find(|r| r.category_id == "winner").unwrap();

    // Remaining weights 0.25, 0.20, 0.15, 0.10 renormalize over 0.70.
    let expected = (0.25 * 40.0 + 0.20 * 50.0 + 0.15 * 60.0 + 0.10 * 30.0) / 0.70;
    let value = points.consensus_value.as_ref().and_then(PredictionValue::as_number).unwrap();
    assert!((value - expected).abs() < 1e-9);
    assert_eq!(points.contributing_experts.len(), 4);
    assert_eq!(points.dropped.len(), 1);
    assert_eq!(points.dropped[0].expert_id.as_str(), "e1");

    assert_eq!(winner.contributing_experts.len(), 5);
    assert!(winner.dropped.is_empty());
}

#[test]
fn percentage_outside_unit_interval_is_dropped() {
    let predictions = vec![
        predict("e1", "g1", "home_win_probability", 1.4, 0.9),
        predict("e2", "g1", "home_win_probability", 0.62, 0.9),
    ];
    let w = weights(&run(), &[("e1", 0.9), ("e2", 0.1)]);
    let r = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    assert_eq!(r.consensus_value, Some(PredictionValue::Number(0.62)));
    assert_eq!(r.dropped.len(), 1);
}

#[test]
fn all_votes_invalid_yields_insufficient_data() {
    let predictions = vec![
        predict("e1", "g1", "total_points", "lots", 0.9),
        predict("e2", "g1", "total_points", -5.0, 0.9),
    ];
    let w = weights(&run(), &[("e1", 0.5), ("e2", 0.5)]);
    let r = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    assert_eq!(r.status, ConsensusStatus::InsufficientData);
    assert!(r.consensus_value.is_none());
    assert_eq!(r.dropped.len(), 2);
}

#[test]
fn missing_member_prediction_is_dropped() {
    let predictions = vec![predict("e1", "g1", "winner", "away", 0.6)];
    let w = weights(&run(), &[("e1", 0.4), ("e2", 0.6)]);
    let r = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    assert_eq!(r.consensus_value, Some(PredictionValue::from("away")));
    assert!((r.agreement - 1.0).abs() < 1e-12);
    assert_eq!(r.dropped[0].reason, "missing prediction");
}

#[test]
fn non_council_predictions_do_not_vote() {
    let predictions = vec![
        predict("e1", "g1", "winner", "home", 0.6),
        predict("outsider", "g1", "winner", "away", 1.0),
    ];
    let w = weights(&run(), &[("e1", 1.0)]);
    let r = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    assert_eq!(r.consensus_value, Some(PredictionValue::from("home")));
    assert_eq!(r.contributing_experts.len(), 1);
}

#[test]
fn ema_calibration_down_weights_noisy_member() {
    let predictions = vec![
        predict("e1", "g1", "total_points", 40.0, 1.0),
        predict("e2", "g1", "total_points", 60.0, 1.0),
    ];
    let w = weights(&run(), &[("e1", 0.5), ("e2", 0.5)]);
    let mut calibration: CalibrationView = HashMap::new();
    let key = CalibrationKey::new("e2", "total_points");
    calibration.insert(
        key.clone(),
        CalibrationState::bootstrap(key, Posterior::Ema { mu: 150.0, sigma: 10.0 }, &run()),
    );

    let weighted = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &calibration)[0];
    let value = weighted.consensus_value.as_ref().and_then(PredictionValue::as_number).unwrap();
    assert!((value - (40.0 + 60.0 * 0.5) / 1.5).abs() < 1e-9);

    let plain_config = ConsensusConfig {
        calibration_weighting: false,
        ..ConsensusConfig::default()
    };
    let plain = ConsensusEngine::new(&plain_config, Arc::new(CategoryRegistry::with_defaults()));
    let r = &plain.aggregate_contest(&run(), "g1", &w, &predictions, &calibration)[0];
    assert_eq!(r.consensus_value, Some(PredictionValue::Number(50.0)));
}

// ── Batch ───────────────────────────────────────────────────────────────

#[test]
fn parallel_and_sequential_batches_agree() {
    let contests: Vec<ContestInput> = (0..20)
        .map(|g| {
            let game = format!("g{g}");
            ContestInput {
                predictions: vec![
                    predict("e1", &game, "winner", if g % 2 == 0 { "home" } else { "away" }, 0.7),
                    predict("e2", &game, "winner", "home", 0.6),
                    predict("e1", &game, "total_points", 40.0 + g as f64, 0.9),
                    predict("e2", &game, "total_points", 50.0, 0.4),
                ],
                game_id: game,
            }
        })
        .collect();
    let w = weights(&run(), &[("e1", 0.55), ("e2", 0.45)]);

    let parallel = engine().aggregate_contests(&run(), &contests, &w, &HashMap::new());
    let sequential_engine = ConsensusEngine::new(
        &ConsensusConfig {
            parallel: false,
            ..ConsensusConfig::default()
        },
        Arc::new(CategoryRegistry::with_defaults()),
    );
    let sequential = sequential_engine.aggregate_contests(&run(), &contests, &w, &HashMap::new());

    assert_eq!(parallel, sequential);
    assert_eq!(parallel.len(), 20);
    assert_eq!(parallel[3][0].game_id, "g3");
}

#[test]
fn weights_from_other_runs_are_ignored() {
    let predictions = vec![predict("e1", "g1", "winner", "home", 0.6)];
    let w = weights(&RunId::from("cohort-b"), &[("e1", 1.0)]);
    let r = &engine().aggregate_contest(&run(), "g1", &w, &predictions, &HashMap::new())[0];
    assert_eq!(r.status, ConsensusStatus::InsufficientData);
}
