//! Weighted mean for numeric and percentage categories.
//!
//! ```text
//! w_i       = normalized_weight_i × confidence_i × calibration_i
//! consensus = Σ w_i·x_i / Σ w_i
//! agreement = 1 − weighted CV, clamped to [0, 1]
//! ```
//!
//! `calibration_i` is the member's EMA precision factor when calibration
//! weighting is on, else 1. If every
//! member reports zero confidence the plain vote weights are used. The
//! coefficient of variation falls back to `std / domain_span` when the mean
//! is near zero.

use conclave_core::models::PredictionValue;
use conclave_core::{Category, DataType};

use crate::ballot::Ballot;
use crate::Aggregate;

const NEAR_ZERO_MEAN: f64 = 1e-9;

/// Aggregate a numeric or percentage ballot. `calibration` is the per-entry
/// precision multiplier, aligned with `ballot.entries`.
pub fn aggregate(ballot: &Ballot, category: &Category, calibration: &[f64]) -> Option<Aggregate> {
    let values: Vec<f64> = ballot.entries.iter().filter_map(|e| e.value.as_number()).collect();
    if values.is_empty() || values.len() != ballot.entries.len() {
        return None;
    }

    let mut weights: Vec<f64> = ballot
        .entries
        .iter()
        .zip(calibration.iter().chain(std::iter::repeat(&1.0)))
        .map(|(e, c)| e.weight * e.confidence * c)
        .collect();
    let mut total: f64 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        weights = ballot.entries.iter().map(|e| e.weight).collect();
        total = weights.iter().sum();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = (values.iter().zip(&weights).map(|(x, w)| x * w).sum::<f64>() / total).clamp(lo, hi);

    let variance = values
        .iter()
        .zip(&weights)
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum::<f64>()
        / total;
    let std_dev = variance.max(0.0).sqrt();
    let cv = if mean.abs() > NEAR_ZERO_MEAN {
        std_dev / mean.abs()
    } else {
        std_dev / category.domain_span()
    };
    let agreement = (1.0 - cv).clamp(0.0, 1.0);

    let value = match category.data_type {
        DataType::Percentage => mean.clamp(0.0, 1.0),
        _ => mean,
    };

    Some(Aggregate {
        value: PredictionValue::Number(value),
        agreement,
        confidence: agreement * ballot.mean_confidence(),
    })
}
