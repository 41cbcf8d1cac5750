//! Posterior update rules.
//!
//! Categorical: `alpha += rate` on a correct prediction, else `beta += rate`.
//! Numeric/percentage, with `λ' = λ × rate` clamped to [0, 1]:
//!
//! ```text
//! mu'    = (1 − λ')·mu + λ'·error
//! sigma² = (1 − λ')·sigma² + λ'·(error − mu)²
//! ```
//!
//! `rate` is the decayed learning rate, `base_rate × 0.5^(days / half_life)`.

use statrs::distribution::{Beta, ContinuousCDF};

use conclave_core::models::Posterior;

/// What one settled prediction says about an expert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// Categorical outcome: did the predicted choice match?
    Correct(bool),
    /// Numeric outcome: absolute error `|predicted − actual|`.
    AbsoluteError(f64),
}

impl Observation {
    pub fn fits(&self, posterior: &Posterior) -> bool {
        matches!(
            (self, posterior),
            (Self::Correct(_), Posterior::Beta { .. }) | (Self::AbsoluteError(_), Posterior::Ema { .. })
        )
    }
}

/// Fold one observation into `posterior` at learning rate `rate`.
/// Returns `None` when the observation kind does not match the posterior.
pub fn apply(posterior: &Posterior, observation: Observation, rate: f64, ema_lambda: f64) -> Option<Posterior> {
    match (*posterior, observation) {
        (Posterior::Beta { alpha, beta }, Observation::Correct(true)) => Some(Posterior::Beta {
            alpha: alpha + rate,
            beta,
        }),
        (Posterior::Beta { alpha, beta }, Observation::Correct(false)) => Some(Posterior::Beta {
            alpha,
            beta: beta + rate,
        }),
        (Posterior::Ema { mu, sigma }, Observation::AbsoluteError(error)) => {
            let lambda = (ema_lambda * rate).clamp(0.0, 1.0);
            let next_mu = (1.0 - lambda) * mu + lambda * error;
            let variance = (1.0 - lambda) * sigma * sigma + lambda * (error - mu).powi(2);
            Some(Posterior::Ema {
                mu: next_mu,
                sigma: variance.max(0.0).sqrt(),
            })
        }
        _ => None,
    }
}

/// Mean, variance, and 95% credible interval of a Beta posterior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaSummary {
    pub mean: f64,
    pub variance: f64,
    pub lower: f64,
    pub upper: f64,
}

impl BetaSummary {
    pub fn new(alpha: f64, beta: f64) -> Self {
        let sum = alpha + beta;
        let (mean, variance) = if sum > 0.0 && sum.is_finite() {
            (
                (alpha / sum).clamp(0.0, 1.0),
                ((alpha * beta) / (sum * sum * (sum + 1.0))).max(0.0),
            )
        } else {
            (0.5, 0.25)
        };
        let (lower, upper) = credible_interval(alpha, beta, 0.95);
        Self {
            mean,
            variance,
            lower,
            upper,
        }
    }

    /// Summary of a Beta posterior; `None` for EMA.
    pub fn of(posterior: &Posterior) -> Option<Self> {
        match *posterior {
            Posterior::Beta { alpha, beta } => Some(Self::new(alpha, beta)),
            Posterior::Ema { .. } => None,
        }
    }
}

/// Central credible interval holding `level` of the Beta(alpha, beta) mass.
/// Invalid parameters give the whole unit interval.
pub fn credible_interval(alpha: f64, beta: f64, level: f64) -> (f64, f64) {
    if !(alpha > 0.0 && beta > 0.0 && alpha.is_finite() && beta.is_finite()) {
        return (0.0, 1.0);
    }
    let tail = (1.0 - level) / 2.0;
    match Beta::new(alpha, beta) {
        Ok(dist) => {
            let low = dist.inverse_cdf(tail);
            let high = dist.inverse_cdf(1.0 - tail);
            let low = if low.is_finite() { low.clamp(0.0, 1.0) } else { 0.0 };
            let high = if high.is_finite() { high.clamp(0.0, 1.0) } else { 1.0 };
            (low, high)
        }
        Err(_) => (0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_prediction_moves_alpha_only() {
        let next = apply(&Posterior::uniform_beta(), Observation::Correct(true), 1.0, 0.1).unwrap();
        assert_eq!(next, Posterior::Beta { alpha: 2.0, beta: 1.0 });
    }

    #[test]
    fn stale_outcome_moves_beta_a_little() {
        let next = apply(&Posterior::uniform_beta(), Observation::Correct(false), 0.125, 0.1).unwrap();
        assert_eq!(next, Posterior::Beta { alpha: 1.0, beta: 1.125 });
    }

    #[test]
    fn ema_tracks_error() {
        let start = Posterior::Ema { mu: 0.0, sigma: 1.0 };
        let next = apply(&start, Observation::AbsoluteError(10.0), 1.0, 0.1).unwrap();
        match next {
            Posterior::Ema { mu, sigma } => {
                assert!((mu - 1.0).abs() < 1e-12);
                assert!((sigma - (0.9f64 + 10.0).sqrt()).abs() < 1e-12);
            }
            other => panic!("unexpected posterior {other:?}"),
        }
    }

    #[test]
    fn mismatched_observation_is_rejected() {
        assert!(apply(&Posterior::uniform_beta(), Observation::AbsoluteError(1.0), 1.0, 0.1).is_none());
    }

    #[test]
    fn uniform_summary() {
        let s = BetaSummary::new(1.0, 1.0);
        assert!((s.mean - 0.5).abs() < 1e-12);
        assert!((s.variance - 1.0 / 12.0).abs() < 1e-12);
        assert!(s.lower < 0.05 && s.upper > 0.95);
    }

    #[test]
    fn interval_narrows_with_evidence() {
        let (l1, h1) = credible_interval(3.0, 3.0, 0.95);
        let (l2, h2) = credible_interval(30.0, 30.0, 0.95);
        assert!(h2 - l2 < h1 - l1);
    }
}
