use conclave_calibration::posterior::{apply, Observation};
use conclave_calibration::BetaSummary;
use conclave_core::models::Posterior;
use proptest::prelude::*;

proptest! {
    #[test]
    fn correct_outcome_raises_alpha_keeps_beta(alpha in 0.5f64..500.0, beta in 0.5f64..500.0, rate in 1e-6f64..=1.0) {
        let next = apply(&Posterior::Beta { alpha, beta }, Observation::Correct(true), rate, 0.1).unwrap();
        match next {
            Posterior::Beta { alpha: a, beta: b } => {
                prop_assert!(a > alpha);
                prop_assert_eq!(b, beta);
            }
            Posterior::Ema { .. } => prop_assert!(false, "kind changed"),
        }
    }

    #[test]
    fn wrong_outcome_raises_beta_keeps_alpha(alpha in 0.5f64..500.0, beta in 0.5f64..500.0, rate in 1e-6f64..=1.0) {
        let next = apply(&Posterior::Beta { alpha, beta }, Observation::Correct(false), rate, 0.1).unwrap();
        match next {
            Posterior::Beta { alpha: a, beta: b } => {
                prop_assert_eq!(a, alpha);
                prop_assert!(b > beta);
            }
            Posterior::Ema { .. } => prop_assert!(false, "kind changed"),
        }
    }

    #[test]
    fn ema_mean_stays_between_old_mean_and_error(
        mu in 0.0f64..100.0,
        sigma in 0.0f64..50.0,
        error in 0.0f64..100.0,
        rate in 0.0f64..=1.0,
        lambda in 0.01f64..=1.0,
    ) {
        let next = apply(&Posterior::Ema { mu, sigma }, Observation::AbsoluteError(error), rate, lambda).unwrap();
        match next {
            Posterior::Ema { mu: m, sigma: s } => {
                prop_assert!(m >= mu.min(error) - 1e-9 && m <= mu.max(error) + 1e-9);
                prop_assert!(s >= 0.0 && s.is_finite());
            }
            Posterior::Beta { .. } => prop_assert!(false, "kind changed"),
        }
    }

    #[test]
    fn beta_summary_is_ordered(alpha in 0.5f64..200.0, beta in 0.5f64..200.0) {
        let s = BetaSummary::new(alpha, beta);
        prop_assert!(s.lower <= s.mean + 1e-9);
        prop_assert!(s.mean <= s.upper + 1e-9);
        prop_assert!((0.0..=0.25).contains(&s.variance));
    }
}
