use conclave_core::config::VotingConfig;
use conclave_core::models::RunId;
use conclave_selection::VoteWeightCalculator;
use test_fixtures::{council, voting};

fn run() -> RunId {
    RunId::from("run-1")
}

#[test]
fn weights_follow_formula_and_sum_to_one() {
    let calc = VoteWeightCalculator::new(&VotingConfig::default());
    let seats = council(&run(), &["a", "b", "c"]);
    let metrics = vec![
        voting("a", 0.8, 0.7, 0.9, 8),
        voting("b", 0.6, 0.5, 0.4, 2),
        voting("c", 0.5, 0.9, 0.6, 0),
    ];
    let weights = calc.compute(&run(), &seats, &metrics);

    let raw_a = 0.40 * 0.8 + 0.30 * 0.7 + 0.20 * 0.9 + 0.10 * 1.0;
    let raw_b = 0.40 * 0.6 + 0.30 * 0.5 + 0.20 * 0.4 + 0.10 * 0.25;
    let raw_c = 0.40 * 0.5 + 0.30 * 0.9 + 0.20 * 0.6;
    let total = raw_a + raw_b + raw_c;

    assert!((weights[0].normalized_weight - raw_a / total).abs() < 1e-12);
    assert!((weights[1].normalized_weight - raw_b / total).abs() < 1e-12);
    assert!((weights[2].normalized_weight - raw_c / total).abs() < 1e-12);
    let sum: f64 = weights.iter().map(|w| w.normalized_weight).sum();
    assert!((sum - 1.0).abs() < 1e-9);
}

#[test]
fn single_member_gets_full_weight() {
    let calc = VoteWeightCalculator::new(&VotingConfig::default());
    let weights = calc.compute(&run(), &council(&run(), &["solo"]), &[voting("solo", 0.3, 0.2, 0.1, 0)]);
    assert_eq!(weights.len(), 1);
    assert_eq!(weights[0].normalized_weight, 1.0);
}

#[test]
fn zero_metrics_still_strictly_positive() {
    let calc = VoteWeightCalculator::new(&VotingConfig::default());
    let seats = council(&run(), &["a", "b"]);
    let weights = calc.compute(&run(), &seats, &[voting("a", 0.0, 0.0, 0.0, 0), voting("b", 0.9, 0.9, 0.9, 9)]);
    assert!(weights.iter().all(|w| w.normalized_weight > 0.0));
}

#[test]
fn all_zero_metrics_split_evenly() {
    let calc = VoteWeightCalculator::new(&VotingConfig::default());
    let seats = council(&run(), &["a", "b", "c", "d"]);
    let metrics: Vec<_> = ["a", "b", "c", "d"].iter().map(|e| voting(e, 0.0, 0.0, 0.0, 0)).collect();
    let weights = calc.compute(&run(), &seats, &metrics);
    for w in weights {
        assert!((w.normalized_weight - 0.25).abs() < 1e-12);
    }
}

#[test]
fn missing_metrics_get_floor_weight() {
    let calc = VoteWeightCalculator::new(&VotingConfig::default());
    let seats = council(&run(), &["a", "b"]);
    let weights = calc.compute(&run(), &seats, &[voting("a", 0.5, 0.5, 0.5, 4)]);
    assert_eq!(weights.len(), 2);
    assert!(weights[1].normalized_weight > 0.0);
    assert!(weights[1].normalized_weight < 1e-4);
}

#[test]
fn tenure_saturates() {
    let calc = VoteWeightCalculator::new(&VotingConfig::default());
    assert_eq!(calc.tenure_component(0), 0.0);
    assert!((calc.tenure_component(4) - 0.5).abs() < f64::EPSILON);
    assert_eq!(calc.tenure_component(8), 1.0);
    assert_eq!(calc.tenure_component(80), 1.0);
}

#[test]
fn weights_are_in_rank_order_and_run_tagged() {
    let calc = VoteWeightCalculator::new(&VotingConfig::default());
    let seats = council(&run(), &["z", "y"]);
    let weights = calc.compute(&run(), &seats, &[voting("y", 0.5, 0.5, 0.5, 1), voting("z", 0.5, 0.5, 0.5, 1)]);
    assert_eq!(weights[0].expert_id.as_str(), "z");
    assert!(weights.iter().all(|w| w.run_id == run()));
}
