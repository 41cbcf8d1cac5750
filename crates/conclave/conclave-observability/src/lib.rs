//! # conclave-observability
//!
//! Tracing subscriber setup, one named structured event per pipeline
//! milestone, and a serializable per-run metrics summary.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::RunMetrics;
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
