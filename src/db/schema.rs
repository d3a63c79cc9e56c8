//! SQL DDL for all Chronos tables.
//!
//! Defines `reminders` (the per-user document store), `preferences` and
//! `preference_sets` (the local key-value store), `alarms` (pending one-shot
//! alarms), and `schema_meta`. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- Reminder documents: users/{user_id}/reminders/{id}
CREATE TABLE IF NOT EXISTS reminders (
    user_id TEXT NOT NULL,
    id TEXT NOT NULL,
    title TEXT NOT NULL,
    notes TEXT,
    date_time INTEGER NOT NULL,
    image_url TEXT,
    PRIMARY KEY (user_id, id)
);

-- Scalar string preferences
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- String-set preferences, one row per member
CREATE TABLE IF NOT EXISTS preference_sets (
    key TEXT NOT NULL,
    member TEXT NOT NULL,
    PRIMARY KEY (key, member)
);

-- Pending one-shot alarms, one per key
CREATE TABLE IF NOT EXISTS alarms (
    key INTEGER PRIMARY KEY,
    fire_at INTEGER NOT NULL,
    reminder_id TEXT,
    title TEXT,
    notes TEXT,
    image_url TEXT
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
