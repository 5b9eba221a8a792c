//! Database Migrations
//!
//! Schema migration definitions for the item store.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial vocabulary schema with SM-2 learning state",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Scheduling indexes for the ranker's tier queries",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
///
/// All scheduling timestamps are epoch milliseconds; 0 means "never".
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS vocabulary_items (
    id INTEGER PRIMARY KEY,
    word TEXT NOT NULL UNIQUE,
    definition TEXT NOT NULL,

    -- Three interchangeable answer slots
    synonym1_text TEXT NOT NULL DEFAULT '',
    synonym1_definition TEXT NOT NULL DEFAULT '',
    synonym1_example TEXT NOT NULL DEFAULT '',
    synonym2_text TEXT NOT NULL DEFAULT '',
    synonym2_definition TEXT NOT NULL DEFAULT '',
    synonym2_example TEXT NOT NULL DEFAULT '',
    synonym3_text TEXT NOT NULL DEFAULT '',
    synonym3_definition TEXT NOT NULL DEFAULT '',
    synonym3_example TEXT NOT NULL DEFAULT '',

    is_bookmarked INTEGER NOT NULL DEFAULT 0,

    -- SM-2 learning state, mutated only by the review-outcome write path
    times_reviewed INTEGER NOT NULL DEFAULT 0,
    times_correct INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    interval INTEGER NOT NULL DEFAULT 0,
    repetition_count INTEGER NOT NULL DEFAULT 0,
    last_reviewed INTEGER NOT NULL DEFAULT 0,
    next_review_date INTEGER NOT NULL DEFAULT 0,
    quality INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL
);

INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: indexes backing the overdue/unseen/bookmark queries
const MIGRATION_V2_UP: &str = r#"
CREATE INDEX IF NOT EXISTS idx_items_next_review ON vocabulary_items(next_review_date);
CREATE INDEX IF NOT EXISTS idx_items_times_reviewed ON vocabulary_items(times_reviewed);
CREATE INDEX IF NOT EXISTS idx_items_bookmarked ON vocabulary_items(is_bookmarked);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );
            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
