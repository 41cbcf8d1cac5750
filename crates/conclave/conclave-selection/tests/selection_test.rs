use conclave_core::config::SelectionConfig;
use conclave_core::models::{EligibilityFailure, EligibilityStats, ExpertId, RunId, SelectionScore};
use conclave_selection::{CouncilSelector, EligibilityGate, SelectionScorer};
use test_fixtures::{healthy, performance, uniform_performance};

fn run() -> RunId {
    RunId::from("run-2026-w42")
}

// ── Eligibility gate ────────────────────────────────────────────────────

#[test]
fn healthy_expert_passes_gate() {
    let gate = EligibilityGate::new(&SelectionConfig::default());
    let verdict = gate.evaluate(&run(), &healthy("a"));
    assert!(verdict.eligible);
    assert!(verdict.failures.is_empty());
}

#[test]
fn schema_validity_below_slo_fails() {
    let gate = EligibilityGate::new(&SelectionConfig::default());
    let stats = EligibilityStats {
        schema_validity_rate: 0.98,
        ..healthy("a")
    };
    let verdict = gate.evaluate(&run(), &stats);
    assert!(!verdict.eligible);
    assert!(matches!(verdict.failures[0], EligibilityFailure::SchemaValidity { .. }));
}

#[test]
fn validity_exactly_at_slo_passes() {
    let gate = EligibilityGate::new(&SelectionConfig::default());
    let stats = EligibilityStats {
        schema_validity_rate: 0.985,
        ..healthy("a")
    };
    assert!(gate.evaluate(&run(), &stats).eligible);
}

#[test]
fn all_failures_are_reported() {
    let gate = EligibilityGate::new(&SelectionConfig::default());
    let stats = EligibilityStats {
        expert_id: ExpertId::from("slow"),
        sample_size: 3,
        schema_validity_rate: 0.5,
        avg_latency_ms: 60_000.0,
    };
    let verdict = gate.evaluate(&run(), &stats);
    assert_eq!(verdict.failures.len(), 3);
}

#[test]
fn nan_latency_fails_gate() {
    let gate = EligibilityGate::new(&SelectionConfig::default());
    let stats = EligibilityStats {
        avg_latency_ms: f64::NAN,
        ..healthy("a")
    };
    assert!(!gate.evaluate(&run(), &stats).eligible);
}

// ── Selection scorer ────────────────────────────────────────────────────

#[test]
fn score_matches_weighted_formula() {
    let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
    let stats = performance("a", 0.8, 0.6, 0.5, 0.9, 0.4);
    let score = scorer.score(&run(), &stats).unwrap();
    let expected = 0.35 * 0.8 + 0.25 * 0.6 + 0.20 * 0.5 + 0.10 * 0.9 + 0.10 * 0.4;
    assert!((score.score - expected).abs() < 1e-12);
    assert!((score.components.recent_performance - 0.6).abs() < f64::EPSILON);
}

#[test]
fn scoring_is_deterministic() {
    let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
    let stats = performance("a", 0.71, 0.33, 0.94, 0.12, 0.58);
    let first = scorer.score(&run(), &stats).unwrap();
    for _ in 0..10 {
        assert_eq!(scorer.score(&run(), &stats).unwrap(), first);
    }
}

#[test]
fn ineligible_experts_receive_no_score() {
    let config = SelectionConfig::default();
    let gate = EligibilityGate::new(&config);
    let scorer = SelectionScorer::new(&config.weights);

    let eligibility = vec![
        healthy("steady"),
        EligibilityStats {
            schema_validity_rate: 0.90,
            ..healthy("star")
        },
    ];
    let verdicts = gate.evaluate_all(&run(), &eligibility);
    // "star" has perfect history but fails the gate.
    let stats = vec![uniform_performance("steady", 0.5), uniform_performance("star", 1.0)];
    let scores = scorer.score_eligible(&run(), &stats, &verdicts);

    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].expert_id, ExpertId::from("steady"));
}

#[test]
fn experts_without_a_verdict_are_not_scored() {
    let config = SelectionConfig::default();
    let scorer = SelectionScorer::new(&config.weights);
    let scores = scorer.score_eligible(&run(), &[uniform_performance("unknown", 0.9)], &[]);
    assert!(scores.is_empty());
}

#[test]
fn invalid_stats_are_skipped_not_fatal() {
    let config = SelectionConfig::default();
    let gate = EligibilityGate::new(&config);
    let scorer = SelectionScorer::new(&config.weights);
    let verdicts = gate.evaluate_all(&run(), &[healthy("a"), healthy("b")]);
    let stats = vec![uniform_performance("a", 0.5), performance("b", 1.4, 0.5, 0.5, 0.5, 0.5)];
    let scores = scorer.score_eligible(&run(), &stats, &verdicts);
    assert_eq!(scores.len(), 1);
}

// ── Council selector ────────────────────────────────────────────────────

#[test]
fn top_k_by_score_descending() {
    let config = SelectionConfig::default();
    let scorer = SelectionScorer::new(&config.weights);
    let scores: Vec<_> = [0.2, 0.9, 0.5, 0.7, 0.4, 0.8, 0.1]
        .iter()
        .enumerate()
        .map(|(i, level)| scorer.score(&run(), &uniform_performance(&format!("e{i}"), *level)).unwrap())
        .collect();

    let council = CouncilSelector::new(5).select(&run(), &scores);
    let ids: Vec<&str> = council.members.iter().map(|m| m.expert_id.as_str()).collect();
    assert_eq!(ids, vec!["e1", "e5", "e3", "e2", "e4"]);
    let ranks: Vec<u32> = council.members.iter().map(|m| m.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    assert!(!council.is_short());
    assert_eq!(council.eligible_pool, 7);
}

#[test]
fn small_pool_gives_small_council_without_padding() {
    let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
    let scores: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|e| scorer.score(&run(), &uniform_performance(e, 0.6)).unwrap())
        .collect();
    let council = CouncilSelector::new(5).select(&run(), &scores);
    assert_eq!(council.members.len(), 3);
    assert!(council.is_short());
    assert_eq!(council.requested_size, 5);
}

fn tied(expert: &str, recent: f64) -> SelectionScore {
    let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
    let mut score = scorer.score(&run(), &performance(expert, 0.5, recent, 0.5, 0.5, 0.5)).unwrap();
    score.score = 0.6;
    score
}

#[test]
fn ties_break_on_recent_performance_then_expert_id() {
    let scores = vec![tied("bravo", 0.5), tied("alpha", 0.5), tied("zulu", 0.9)];
    let council = CouncilSelector::new(3).select(&run(), &scores);
    let ids: Vec<&str> = council.members.iter().map(|m| m.expert_id.as_str()).collect();
    assert_eq!(ids, vec!["zulu", "alpha", "bravo"]);
}

#[test]
fn duplicate_scores_seat_an_expert_once() {
    let scores = vec![tied("alpha", 0.5), tied("alpha", 0.5), tied("bravo", 0.4)];
    let council = CouncilSelector::new(3).select(&run(), &scores);
    assert_eq!(council.members.len(), 2);
    assert_eq!(council.eligible_pool, 2);
}

#[test]
fn reselection_is_identical() {
    let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
    let scores: Vec<_> = (0..12)
        .map(|i| scorer.score(&run(), &uniform_performance(&format!("x{i:02}"), (i % 4) as f64 / 4.0)).unwrap())
        .collect();
    let mut shuffled = scores.clone();
    shuffled.reverse();

    let selector = CouncilSelector::new(5);
    let first = selector.select(&run(), &scores);
    let second = selector.select(&run(), &shuffled);
    assert_eq!(first, second);
    assert_eq!(first.fingerprint, second.fingerprint);
}

#[test]
fn scores_from_other_runs_are_ignored() {
    let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
    let mine = scorer.score(&run(), &uniform_performance("a", 0.4)).unwrap();
    let theirs = scorer.score(&RunId::from("cohort-b"), &uniform_performance("b", 0.9)).unwrap();
    let council = CouncilSelector::new(5).select(&run(), &[mine, theirs]);
    assert_eq!(council.expert_ids(), vec![ExpertId::from("a")]);
}
