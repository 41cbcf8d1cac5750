//! v003: ledger of settled contests folded into each calibration key.
//!
//! A row is written in the same transaction as the versioned state update,
//! so the primary key is what makes a settlement apply at most once.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS calibration_applications (
    expert_id   TEXT NOT NULL,
    category_id TEXT NOT NULL,
    game_id     TEXT NOT NULL,
    run_id      TEXT NOT NULL,
    version     INTEGER NOT NULL,
    applied_at  TEXT NOT NULL,
    PRIMARY KEY (expert_id, category_id, game_id),
    FOREIGN KEY (expert_id, category_id) REFERENCES calibration_states(expert_id, category_id)
);
";
