use chrono::{DateTime, Utc};

use conclave_core::constants::SECONDS_PER_DAY;

/// Half-life decay: `0.5^(age_days / half_life_days)`.
///
/// Range: (0.0, 1.0]. Equals 1.0 at age 0 and halves every `half_life_days`.
/// Negative ages are treated as 0. A non-positive or non-finite half-life
/// means no decay; config validation keeps those out of normal runs.
///
/// # Examples
///
/// ```
/// use conclave_decay::half_life_decay;
///
/// assert_eq!(half_life_decay(0.0, 90.0), 1.0);
/// assert!((half_life_decay(90.0, 90.0) - 0.5).abs() < 1e-12);
/// assert!((half_life_decay(180.0, 90.0) - 0.25).abs() < 1e-12);
/// ```
pub fn half_life_decay(age_days: f64, half_life_days: f64) -> f64 {
    if !(half_life_days > 0.0 && half_life_days.is_finite()) {
        return 1.0;
    }
    if age_days.is_nan() {
        return 1.0;
    }
    let age = age_days.max(0.0);
    0.5_f64.powf(age / half_life_days)
}

/// Learning rate scaled by the age of the evidence:
/// `base_rate × 0.5^(age_days / half_life_days)`.
pub fn decayed_rate(base_rate: f64, age_days: f64, half_life_days: f64) -> f64 {
    base_rate * half_life_decay(age_days, half_life_days)
}

/// Fractional days from `from` to `to`, floored at 0.
pub fn age_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds().max(0) as f64;
    millis / 1000.0 / SECONDS_PER_DAY
}
