//! The alarm service capability.
//!
//! An alarm is exact and one-shot. At most one alarm exists per key;
//! registering an existing key replaces it. The SQLite implementation keeps
//! pending alarms in the `alarms` table, where [`crate::runner`] picks them up.

use anyhow::Result;
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

use crate::db::{self, Db};

/// Stable 32-bit hash of a reminder ID.
///
/// Folds UTF-16 code units with a multiplier of 31 and wrapping arithmetic, so
/// the same ID maps to the same key across runs and machines.
pub fn alarm_key(id: &str) -> i32 {
    id.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// The extras delivered with a fired alarm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmPayload {
    pub id: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    pub key: i32,
    /// Epoch milliseconds.
    pub fire_at: i64,
    pub payload: AlarmPayload,
}

pub trait AlarmService: Send + Sync {
    /// Register an exact one-shot alarm, replacing any alarm with the same key.
    fn register(&self, key: i32, fire_at: i64, payload: AlarmPayload) -> Result<()>;

    /// Remove the alarm with this key. No-op when absent.
    fn cancel(&self, key: i32) -> Result<()>;

    /// Remove and return every alarm due at `now`, oldest first.
    fn take_due(&self, now: i64) -> Result<Vec<Alarm>>;

    /// All pending alarms ordered by fire time.
    fn pending(&self) -> Result<Vec<Alarm>>;
}

pub struct SqliteAlarmService {
    db: Db,
}

impl SqliteAlarmService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

const ALARM_COLUMNS: &str = "key, fire_at, reminder_id, title, notes, image_url";

fn row_to_alarm(row: &Row<'_>) -> rusqlite::Result<Alarm> {
    Ok(Alarm {
        key: row.get(0)?,
        fire_at: row.get(1)?,
        payload: AlarmPayload {
            id: row.get(2)?,
            title: row.get(3)?,
            notes: row.get(4)?,
            image_url: row.get(5)?,
        },
    })
}

impl AlarmService for SqliteAlarmService {
    fn register(&self, key: i32, fire_at: i64, payload: AlarmPayload) -> Result<()> {
        let conn = db::lock(&self.db)?;
        conn.execute(
            "INSERT OR REPLACE INTO alarms (key, fire_at, reminder_id, title, notes, image_url) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                key,
                fire_at,
                payload.id,
                payload.title,
                payload.notes,
                payload.image_url,
            ],
        )?;
        tracing::debug!(key, fire_at, "alarm registered");
        Ok(())
    }

    fn cancel(&self, key: i32) -> Result<()> {
        let conn = db::lock(&self.db)?;
        let removed = conn.execute("DELETE FROM alarms WHERE key = ?1", params![key])?;
        tracing::debug!(key, removed, "alarm cancelled");
        Ok(())
    }

    fn take_due(&self, now: i64) -> Result<Vec<Alarm>> {
        let mut conn = db::lock(&self.db)?;
        let tx = conn.transaction()?;

        let due = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {ALARM_COLUMNS} FROM alarms WHERE fire_at <= ?1 ORDER BY fire_at, key"
            ))?;
            let rows = stmt
                .query_map(params![now], row_to_alarm)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        tx.execute("DELETE FROM alarms WHERE fire_at <= ?1", params![now])?;
        tx.commit()?;

        Ok(due)
    }

    fn pending(&self) -> Result<Vec<Alarm>> {
        let conn = db::lock(&self.db)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ALARM_COLUMNS} FROM alarms ORDER BY fire_at, key"
        ))?;
        let alarms = stmt
            .query_map([], row_to_alarm)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(alarms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SqliteAlarmService {
        SqliteAlarmService::new(db::shared(db::open_memory_database().unwrap()))
    }

    fn payload(id: &str) -> AlarmPayload {
        AlarmPayload {
            id: Some(id.into()),
            title: Some("Pay rent".into()),
            notes: None,
            image_url: None,
        }
    }

    #[test]
    fn alarm_key_is_stable() {
        assert_eq!(alarm_key(""), 0);
        assert_eq!(alarm_key("a"), 97);
        assert_eq!(alarm_key("abc"), 96354);
        assert_eq!(alarm_key("reminder-1"), alarm_key("reminder-1"));
        assert_ne!(alarm_key("reminder-1"), alarm_key("reminder-2"));
    }

    #[test]
    fn alarm_key_wraps_instead_of_overflowing() {
        assert_eq!(alarm_key("Hello World"), -862_545_276);
        assert_eq!(alarm_key(&"x".repeat(64)), 922_607_616);
    }

    #[test]
    fn register_replaces_same_key() {
        let svc = service();
        svc.register(7, 1_000, payload("r1")).unwrap();
        svc.register(7, 2_000, payload("r1")).unwrap();

        let pending = svc.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at, 2_000);
    }

    #[test]
    fn cancel_absent_is_noop() {
        let svc = service();
        svc.cancel(12345).unwrap();
        assert!(svc.pending().unwrap().is_empty());
    }

    #[test]
    fn take_due_is_one_shot() {
        let svc = service();
        svc.register(1, 1_000, payload("early")).unwrap();
        svc.register(2, 5_000, payload("late")).unwrap();

        let due = svc.take_due(1_000).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].payload.id.as_deref(), Some("early"));

        assert!(svc.take_due(1_000).unwrap().is_empty());
        assert_eq!(svc.pending().unwrap().len(), 1);
    }
}
