// Single source of truth for all default values.

// --- Selection ---
pub const DEFAULT_COUNCIL_SIZE: usize = 5;
pub const DEFAULT_W_ACCURACY: f64 = 0.35;
pub const DEFAULT_W_RECENT: f64 = 0.25;
pub const DEFAULT_W_CONSISTENCY: f64 = 0.20;
pub const DEFAULT_W_CALIBRATION: f64 = 0.10;
pub const DEFAULT_W_SPECIALIZATION: f64 = 0.10;
pub const DEFAULT_MIN_SAMPLE_SIZE: u32 = 20;
pub const DEFAULT_MIN_SCHEMA_VALIDITY: f64 = 0.985;
pub const DEFAULT_MAX_LATENCY_MS: f64 = 6_000.0;

// --- Voting ---
pub const DEFAULT_VW_ACCURACY: f64 = 0.40;
pub const DEFAULT_VW_RECENT: f64 = 0.30;
pub const DEFAULT_VW_CONFIDENCE: f64 = 0.20;
pub const DEFAULT_VW_TENURE: f64 = 0.10;
pub const DEFAULT_TENURE_SATURATION_RUNS: u32 = 8;
pub const DEFAULT_MIN_RAW_WEIGHT: f64 = 1e-6;

// --- Consensus ---
pub const DEFAULT_TIE_TOLERANCE: f64 = 1e-9;
pub const DEFAULT_CALIBRATION_WEIGHTING: bool = true;
pub const DEFAULT_PARALLEL_CONTESTS: bool = true;

// --- Calibration ---
pub const DEFAULT_EMA_LAMBDA: f64 = 0.1;
pub const DEFAULT_BASE_RATE: f64 = 1.0;
pub const DEFAULT_SEED_MEAN: f64 = 0.0;
pub const DEFAULT_SEED_STDDEV: f64 = 1.0;
pub const DEFAULT_MAX_CAS_RETRIES: u32 = 3;

// --- Decay ---
pub const DEFAULT_SIMILARITY_WEIGHT: f64 = 0.70;
pub const DEFAULT_DECAY_WEIGHT: f64 = 0.30;
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 90.0;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
