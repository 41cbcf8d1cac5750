//! Tracing setup: JSON or human-readable output filtered by `CONCLAVE_LOG`.

pub mod events;

use tracing_subscriber::EnvFilter;

use conclave_core::config::ObservabilityConfig;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "CONCLAVE_LOG";

/// Install a JSON subscriber filtered by `CONCLAVE_LOG`, defaulting to `info`.
///
/// Returns `false` if a global subscriber was already installed, which makes
/// repeated calls harmless.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .try_init()
        .is_ok()
}

/// Install a JSON subscriber with an explicit filter (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init()
        .is_ok()
}

/// Install a subscriber from config. `CONCLAVE_LOG` still wins over
/// `log_level` when set.
pub fn init_from_config(config: &ObservabilityConfig) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
