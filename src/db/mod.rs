pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A connection shared between the store, the preferences, and the alarm service.
pub type Db = Arc<Mutex<Connection>>;

/// Open (or create) the Chronos database at the given path with schema initialized
/// and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL lets `chronos run` poll alarms while other commands write
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.busy_timeout(Duration::from_millis(5000))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open an in-memory database with schema and migrations applied.
pub fn open_memory_database() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;
    Ok(conn)
}

pub fn shared(conn: Connection) -> Db {
    Arc::new(Mutex::new(conn))
}

/// Lock the shared connection, turning a poisoned lock into an error.
pub fn lock(db: &Db) -> Result<MutexGuard<'_, Connection>> {
    db.lock()
        .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))
}

/// Result of [`check_database_health`].
#[derive(Debug)]
pub struct HealthReport {
    pub schema_version: u32,
    pub integrity_ok: bool,
    pub integrity_details: String,
    pub reminder_count: u64,
    pub user_count: u64,
    pub alarm_count: u64,
    pub preference_count: u64,
}

/// Run `PRAGMA integrity_check` and collect row counts.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    let integrity_ok = integrity_details == "ok";

    let count = |sql: &str| -> Result<u64> {
        let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n as u64)
    };

    Ok(HealthReport {
        schema_version,
        integrity_ok,
        integrity_details,
        reminder_count: count("SELECT COUNT(*) FROM reminders")?,
        user_count: count("SELECT COUNT(DISTINCT user_id) FROM reminders")?,
        alarm_count: count("SELECT COUNT(*) FROM alarms")?,
        preference_count: count(
            "SELECT (SELECT COUNT(*) FROM preferences) + (SELECT COUNT(DISTINCT key) FROM preference_sets)",
        )?,
    })
}
