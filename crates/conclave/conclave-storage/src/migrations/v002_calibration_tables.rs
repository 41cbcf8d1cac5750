//! v002: cross-run calibration state with an optimistic-concurrency version.
//!
//! `param_a`/`param_b` hold (alpha, beta) for `beta` rows and (mu, sigma)
//! for `ema` rows.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS calibration_states (
    expert_id      TEXT NOT NULL,
    category_id    TEXT NOT NULL,
    posterior_kind TEXT NOT NULL CHECK (posterior_kind IN ('beta', 'ema')),
    param_a        REAL NOT NULL,
    param_b        REAL NOT NULL,
    run_id         TEXT NOT NULL,
    observations   INTEGER NOT NULL DEFAULT 0,
    version        INTEGER NOT NULL,
    updated_at     TEXT NOT NULL,
    PRIMARY KEY (expert_id, category_id)
);
";
