use std::collections::HashMap;
use std::sync::Arc;

use conclave_consensus::ConsensusEngine;
use conclave_core::config::ConsensusConfig;
use conclave_core::models::{Prediction, PredictionValue, RunId, VoteWeight};
use conclave_core::CategoryRegistry;
use proptest::prelude::*;
use test_fixtures::{predict, weights};

fn engine() -> ConsensusEngine {
    ConsensusEngine::new(&ConsensusConfig::default(), Arc::new(CategoryRegistry::with_defaults()))
}

fn council_weights(raw: &[f64]) -> Vec<VoteWeight> {
    let total: f64 = raw.iter().sum();
    let names: Vec<String> = (0..raw.len()).map(|i| format!("e{i}")).collect();
    let pairs: Vec<(&str, f64)> = names.iter().map(String::as_str).zip(raw.iter().map(|w| w / total)).collect();
    weights(&RunId::from("r"), &pairs)
}

proptest! {
    #[test]
    fn numeric_consensus_within_member_hull(
        votes in prop::collection::vec((0.01f64..1.0, 0.0f64..=150.0, 0.0f64..=1.0), 1..10)
    ) {
        let raw: Vec<f64> = votes.iter().map(|v| v.0).collect();
        let w = council_weights(&raw);
        let predictions: Vec<Prediction> = votes
            .iter()
            .enumerate()
            .map(|(i, (_, x, c))| predict(&format!("e{i}"), "g", "total_points", *x, *c))
            .collect();

        let r = &engine().aggregate_contest(&RunId::from("r"), "g", &w, &predictions, &HashMap::new())[0];
        let value = r.consensus_value.as_ref().and_then(PredictionValue::as_number).unwrap();
        let lo = votes.iter().map(|v| v.1).fold(f64::INFINITY, f64::min);
        let hi = votes.iter().map(|v| v.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(value >= lo && value <= hi);
        prop_assert!((0.0..=1.0).contains(&r.agreement));
        prop_assert!((0.0..=1.0).contains(&r.confidence));
    }

    #[test]
    fn categorical_winner_independent_of_vote_order(
        votes in prop::collection::vec((0.01f64..1.0, prop::bool::ANY), 1..10),
        rotate in 0usize..10,
    ) {
        let raw: Vec<f64> = votes.iter().map(|v| v.0).collect();
        let w = council_weights(&raw);
        let mut predictions: Vec<Prediction> = votes
            .iter()
            .enumerate()
            .map(|(i, (_, home))| predict(&format!("e{i}"), "g", "winner", if *home { "home" } else { "away" }, 0.5))
            .collect();

        let run = RunId::from("r");
        let first = engine().aggregate_contest(&run, "g", &w, &predictions, &HashMap::new());
        let shift = rotate % predictions.len();
        predictions.rotate_left(shift);
        let mut shuffled_weights = w.clone();
        shuffled_weights.reverse();
        let second = engine().aggregate_contest(&run, "g", &shuffled_weights, &predictions, &HashMap::new());

        prop_assert_eq!(&first[0].consensus_value, &second[0].consensus_value);
        prop_assert!((0.0..=1.0).contains(&first[0].agreement));

        // The winner holds a maximal weight share.
        let home: f64 = votes.iter().zip(&w).filter(|(v, _)| v.1).map(|(_, w)| w.normalized_weight).sum();
        let away = 1.0 - home;
        let winner_is_home = first[0].consensus_value == Some(PredictionValue::from("home"));
        let (win, lose) = if winner_is_home { (home, away) } else { (away, home) };
        prop_assert!(win + 1e-9 >= lose);
    }
}
