// Single source of truth for the scoring formulas' fixed coefficients.

/// Tolerance used when checking that a weight vector sums to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Tolerance when checking that normalized weights sum to 1.0.
pub const NORMALIZED_SUM_TOLERANCE: f64 = 1e-9;

/// Allowed range for an expert's memory half-life, in days.
pub const MIN_EXPERT_HALF_LIFE_DAYS: f64 = 30.0;
pub const MAX_EXPERT_HALF_LIFE_DAYS: f64 = 900.0;

/// Seconds in one day, for converting `chrono` durations to fractional days.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Default cohort tag for production runs.
pub const PRODUCTION_COHORT: &str = "production";
