use conclave_core::config::{SelectionConfig, VotingConfig};
use conclave_core::models::RunId;
use conclave_selection::{CouncilSelector, SelectionScorer, VoteWeightCalculator};
use proptest::prelude::*;
use test_fixtures::{council, performance, voting};

fn unit() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

proptest! {
    #[test]
    fn selection_score_in_unit_interval(a in unit(), r in unit(), c in unit(), q in unit(), s in unit()) {
        let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
        let score = scorer.score(&RunId::from("r"), &performance("e", a, r, c, q, s)).unwrap();
        prop_assert!((0.0..=1.0).contains(&score.score));
    }

    #[test]
    fn vote_weights_sum_to_one(metrics in prop::collection::vec((unit(), unit(), unit(), 0u32..20), 1..12)) {
        let run = RunId::from("r");
        let names: Vec<String> = (0..metrics.len()).map(|i| format!("e{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let seats = council(&run, &refs);
        let vm: Vec<_> = metrics
            .iter()
            .zip(&refs)
            .map(|((a, r, c, t), e)| voting(e, *a, *r, *c, *t))
            .collect();

        let weights = VoteWeightCalculator::new(&VotingConfig::default()).compute(&run, &seats, &vm);
        let sum: f64 = weights.iter().map(|w| w.normalized_weight).sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        prop_assert!(weights.iter().all(|w| w.normalized_weight > 0.0));
    }

    #[test]
    fn council_selection_is_order_independent(levels in prop::collection::vec(unit(), 0..15), k in 1usize..8) {
        let run = RunId::from("r");
        let scorer = SelectionScorer::new(&SelectionConfig::default().weights);
        let scores: Vec<_> = levels
            .iter()
            .enumerate()
            .map(|(i, l)| scorer.score(&run, &performance(&format!("e{i}"), *l, *l, *l, *l, *l)).unwrap())
            .collect();
        let mut reversed = scores.clone();
        reversed.reverse();

        let selector = CouncilSelector::new(k);
        let a = selector.select(&run, &scores);
        let b = selector.select(&run, &reversed);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.members.len(), k.min(levels.len()));
    }
}
