//! v001: run registry and run-scoped pipeline rows.
//!
//! Every pipeline table is keyed by `run_id` and references `runs`, so rows
//! can only be written for a registered run.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS runs (
    run_id       TEXT PRIMARY KEY,
    cohort       TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'open',
    started_at   TEXT NOT NULL,
    completed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_runs_cohort ON runs(cohort, status);

CREATE TABLE IF NOT EXISTS eligibility (
    run_id               TEXT NOT NULL,
    expert_id            TEXT NOT NULL,
    eligible             INTEGER NOT NULL,
    schema_validity_rate REAL NOT NULL,
    avg_latency_ms       REAL NOT NULL,
    failures             TEXT NOT NULL,
    PRIMARY KEY (run_id, expert_id),
    FOREIGN KEY (run_id) REFERENCES runs(run_id)
);

CREATE TABLE IF NOT EXISTS selection_scores (
    run_id     TEXT NOT NULL,
    expert_id  TEXT NOT NULL,
    score      REAL NOT NULL,
    components TEXT NOT NULL,
    PRIMARY KEY (run_id, expert_id),
    FOREIGN KEY (run_id) REFERENCES runs(run_id)
);

CREATE TABLE IF NOT EXISTS council_snapshots (
    run_id         TEXT PRIMARY KEY,
    requested_size INTEGER NOT NULL,
    eligible_pool  INTEGER NOT NULL,
    fingerprint    TEXT NOT NULL,
    FOREIGN KEY (run_id) REFERENCES runs(run_id)
);

CREATE TABLE IF NOT EXISTS council_members (
    run_id    TEXT NOT NULL,
    expert_id TEXT NOT NULL,
    rank      INTEGER NOT NULL,
    score     REAL NOT NULL,
    PRIMARY KEY (run_id, expert_id),
    UNIQUE (run_id, rank),
    FOREIGN KEY (run_id) REFERENCES runs(run_id)
);

CREATE TABLE IF NOT EXISTS vote_weights (
    run_id            TEXT NOT NULL,
    expert_id         TEXT NOT NULL,
    raw_weight        REAL NOT NULL,
    normalized_weight REAL NOT NULL,
    PRIMARY KEY (run_id, expert_id),
    FOREIGN KEY (run_id) REFERENCES runs(run_id)
);

CREATE TABLE IF NOT EXISTS consensus_results (
    run_id               TEXT NOT NULL,
    game_id              TEXT NOT NULL,
    category_id          TEXT NOT NULL,
    status               TEXT NOT NULL,
    consensus_value      TEXT,
    agreement            REAL NOT NULL,
    confidence           REAL NOT NULL,
    contributing_experts TEXT NOT NULL,
    dropped              TEXT NOT NULL,
    PRIMARY KEY (run_id, game_id, category_id),
    FOREIGN KEY (run_id) REFERENCES runs(run_id)
);

CREATE TABLE IF NOT EXISTS belief_revisions (
    revision_id        TEXT PRIMARY KEY,
    expert_id          TEXT NOT NULL,
    game_id            TEXT NOT NULL,
    category_id        TEXT NOT NULL,
    from_prediction_id TEXT NOT NULL,
    to_prediction_id   TEXT NOT NULL,
    impact_score       REAL NOT NULL,
    trigger_type       TEXT NOT NULL,
    revised_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_revisions_expert ON belief_revisions(expert_id, revised_at);
";
