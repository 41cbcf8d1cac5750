//! Weighted plurality vote.
//!
//! Each distinct value collects the sum of its voters' weights; the largest
//! sum wins. Sums within `tie_tolerance` of the maximum are tied, and the tie
//! goes to the value backed by the single heaviest voter (equal weights fall
//! to the lower expert id). Entries arrive sorted by expert id, so the result
//! does not depend on input order.

use std::collections::BTreeMap;

use conclave_core::models::{ExpertId, PredictionValue};

use crate::ballot::Ballot;
use crate::Aggregate;

#[derive(Debug)]
struct Tally<'a> {
    sum: f64,
    top_weight: f64,
    top_expert: &'a ExpertId,
}

/// Aggregate a non-empty categorical ballot. `None` for an empty ballot.
pub fn aggregate(ballot: &Ballot, tie_tolerance: f64) -> Option<Aggregate> {
    let mut tallies: BTreeMap<String, Tally<'_>> = BTreeMap::new();
    for entry in &ballot.entries {
        let Some(choice) = entry.value.as_choice() else {
            continue;
        };
        tallies
            .entry(choice.into_owned())
            .and_modify(|t| {
                t.sum += entry.weight;
                if entry.weight > t.top_weight {
                    t.top_weight = entry.weight;
                    t.top_expert = &entry.expert_id;
                }
            })
            .or_insert(Tally {
                sum: entry.weight,
                top_weight: entry.weight,
                top_expert: &entry.expert_id,
            });
    }

    let total: f64 = tallies.values().map(|t| t.sum).sum();
    let max_sum = tallies.values().map(|t| t.sum).fold(f64::NEG_INFINITY, f64::max);

    let (winner, tally) = tallies
        .iter()
        .filter(|(_, t)| max_sum - t.sum <= tie_tolerance)
        .min_by(|(_, a), (_, b)| {
            b.top_weight
                .total_cmp(&a.top_weight)
                .then_with(|| a.top_expert.cmp(b.top_expert))
        })?;

    let agreement = if total > 0.0 {
        (tally.sum / total).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(Aggregate {
        value: PredictionValue::Choice(winner.clone()),
        agreement,
        confidence: agreement * ballot.mean_confidence(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::BallotEntry;

    fn ballot(votes: &[(&str, &str, f64)]) -> Ballot {
        let mut entries: Vec<BallotEntry> = votes
            .iter()
            .map(|(e, v, w)| BallotEntry {
                expert_id: ExpertId::from(*e),
                value: PredictionValue::from(*v),
                confidence: 1.0,
                weight: *w,
            })
            .collect();
        entries.sort_by(|a, b| a.expert_id.cmp(&b.expert_id));
        Ballot {
            entries,
            dropped: Vec::new(),
        }
    }

    #[test]
    fn plurality_by_weight_not_headcount() {
        let b = ballot(&[("a", "home", 0.6), ("b", "away", 0.2), ("c", "away", 0.2)]);
        let agg = aggregate(&b, 1e-9).unwrap();
        assert_eq!(agg.value, PredictionValue::from("home"));
        assert!((agg.agreement - 0.6).abs() < 1e-12);
    }

    #[test]
    fn tie_goes_to_heaviest_single_voter() {
        let b = ballot(&[("a", "home", 0.2), ("b", "home", 0.2), ("c", "away", 0.4), ("d", "over", 0.2)]);
        let agg = aggregate(&b, 1e-9).unwrap();
        assert_eq!(agg.value, PredictionValue::from("away"));
    }

    #[test]
    fn exact_tie_with_equal_voters_falls_to_lower_expert_id() {
        let b = ballot(&[("m", "home", 0.5), ("k", "away", 0.5)]);
        let agg = aggregate(&b, 1e-9).unwrap();
        assert_eq!(agg.value, PredictionValue::from("away"));
        assert!((agg.agreement - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_ballot_has_no_winner() {
        assert!(aggregate(&Ballot::default(), 1e-9).is_none());
    }
}
