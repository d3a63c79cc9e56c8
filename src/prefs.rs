//! Local key-value preferences.
//!
//! Holds string entries and string-set entries. The scheduled-ID ledger lives
//! here under [`SCHEDULED_REMINDER_IDS`]: the set of reminder IDs believed to
//! have an active alarm. Ledger writes are not transactional with alarm
//! registration; see [`crate::reminder::sync`].

use anyhow::Result;
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeSet;

use crate::db::{self, Db};

pub const SCHEDULED_REMINDER_IDS: &str = "scheduled_reminder_ids";
pub const REMINDER_INFO_WITH_ID: &str = "reminder_info_with_id";
pub const SIGNED_IN_USER: &str = "signed_in_user";

#[derive(Clone)]
pub struct AppPreferences {
    db: Db,
}

impl AppPreferences {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>> {
        let conn = db::lock(&self.db)?;
        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let conn = db::lock(&self.db)?;
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove_string(&self, key: &str) -> Result<()> {
        let conn = db::lock(&self.db)?;
        conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Members of a string-set entry; empty when the entry was never written.
    pub fn get_string_set(&self, key: &str) -> Result<BTreeSet<String>> {
        let conn = db::lock(&self.db)?;
        let mut stmt = conn.prepare("SELECT member FROM preference_sets WHERE key = ?1")?;
        let members = stmt
            .query_map(params![key], |row| row.get(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;
        Ok(members)
    }

    pub fn add_to_set(&self, key: &str, member: &str) -> Result<()> {
        let conn = db::lock(&self.db)?;
        conn.execute(
            "INSERT OR IGNORE INTO preference_sets (key, member) VALUES (?1, ?2)",
            params![key, member],
        )?;
        Ok(())
    }

    pub fn remove_from_set(&self, key: &str, member: &str) -> Result<()> {
        let conn = db::lock(&self.db)?;
        conn.execute(
            "DELETE FROM preference_sets WHERE key = ?1 AND member = ?2",
            params![key, member],
        )?;
        Ok(())
    }

    pub fn get_reminder_info_with_id(&self) -> Result<Option<String>> {
        self.get_string(REMINDER_INFO_WITH_ID)
    }

    pub fn set_reminder_info_with_id(&self, id: &str) -> Result<()> {
        self.set_string(REMINDER_INFO_WITH_ID, id)
    }

    pub fn scheduled_reminder_ids(&self) -> Result<BTreeSet<String>> {
        self.get_string_set(SCHEDULED_REMINDER_IDS)
    }

    pub fn add_scheduled_reminder_id(&self, id: &str) -> Result<()> {
        self.add_to_set(SCHEDULED_REMINDER_IDS, id)
    }

    pub fn remove_scheduled_reminder_id(&self, id: &str) -> Result<()> {
        self.remove_from_set(SCHEDULED_REMINDER_IDS, id)
    }

    /// Drop every entry, strings and sets alike.
    pub fn clear(&self) -> Result<()> {
        let conn = db::lock(&self.db)?;
        conn.execute_batch("DELETE FROM preferences; DELETE FROM preference_sets;")?;
        Ok(())
    }
}
