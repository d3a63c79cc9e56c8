//! The reminder store: per-user reminder documents with a push subscription.
//!
//! Every mutation re-reads the affected user's reminders and pushes the full
//! list to that user's subscription channel, if one was opened.

use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;

use crate::db::{self, Db};
use crate::reminder::types::Reminder;

pub trait ReminderStore: Send + Sync {
    /// All reminders of a user, ordered by trigger time.
    fn reminders(&self, user_id: &str) -> Result<Vec<Reminder>>;

    fn find(&self, user_id: &str, reminder_id: &str) -> Result<Option<Reminder>>;

    /// Store a new reminder under a freshly assigned ID and return the stored copy.
    fn add(&self, reminder: &Reminder) -> Result<Reminder>;

    /// Full replace of the document at the reminder's path. A blank ID is ignored.
    fn update(&self, reminder: &Reminder) -> Result<()>;

    /// Remove one document. Blank user or reminder IDs are ignored.
    fn delete(&self, user_id: &str, reminder_id: &str) -> Result<()>;

    /// Receive the user's full reminder list now and after every change.
    fn subscribe(&self, user_id: &str) -> Result<watch::Receiver<Vec<Reminder>>>;
}

pub struct SqliteReminderStore {
    db: Db,
    watchers: Mutex<HashMap<String, watch::Sender<Vec<Reminder>>>>,
}

const REMINDER_COLUMNS: &str = "id, user_id, title, notes, date_time, image_url";

fn row_to_reminder(row: &Row<'_>) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        notes: row.get(3)?,
        date_time: row.get(4)?,
        image_url: row.get(5)?,
    })
}

impl SqliteReminderStore {
    pub fn new(db: Db) -> Self {
        Self {
            db,
            watchers: Mutex::new(HashMap::new()),
        }
    }

    fn put(&self, reminder: &Reminder) -> Result<()> {
        let conn = db::lock(&self.db)?;
        conn.execute(
            "INSERT OR REPLACE INTO reminders (id, user_id, title, notes, date_time, image_url) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                reminder.id,
                reminder.user_id,
                reminder.title,
                reminder.notes,
                reminder.date_time,
                reminder.image_url,
            ],
        )?;
        Ok(())
    }

    /// Push the current list to the user's subscriber, if any.
    fn notify(&self, user_id: &str) -> Result<()> {
        let watchers = self
            .watchers
            .lock()
            .map_err(|e| anyhow::anyhow!("watcher lock poisoned: {e}"))?;
        if let Some(sender) = watchers.get(user_id) {
            let list = self.reminders(user_id)?;
            sender.send_replace(list);
        }
        Ok(())
    }
}

impl ReminderStore for SqliteReminderStore {
    fn reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        let conn = db::lock(&self.db)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = ?1 ORDER BY date_time, id"
        ))?;
        let reminders = stmt
            .query_map(params![user_id], row_to_reminder)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    fn find(&self, user_id: &str, reminder_id: &str) -> Result<Option<Reminder>> {
        let conn = db::lock(&self.db)?;
        let reminder = conn
            .query_row(
                &format!(
                    "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = ?1 AND id = ?2"
                ),
                params![user_id, reminder_id],
                row_to_reminder,
            )
            .optional()?;
        Ok(reminder)
    }

    fn add(&self, reminder: &Reminder) -> Result<Reminder> {
        let stored = Reminder {
            id: uuid::Uuid::now_v7().to_string(),
            ..reminder.clone()
        };
        self.put(&stored)?;
        tracing::debug!(path = %stored.document_path(), "reminder created");
        self.notify(&stored.user_id)?;
        Ok(stored)
    }

    fn update(&self, reminder: &Reminder) -> Result<()> {
        if reminder.id.trim().is_empty() {
            tracing::debug!("ignoring update of reminder without id");
            return Ok(());
        }
        self.put(reminder)?;
        tracing::debug!(path = %reminder.document_path(), "reminder replaced");
        self.notify(&reminder.user_id)
    }

    fn delete(&self, user_id: &str, reminder_id: &str) -> Result<()> {
        if user_id.trim().is_empty() || reminder_id.trim().is_empty() {
            return Ok(());
        }
        {
            let conn = db::lock(&self.db)?;
            conn.execute(
                "DELETE FROM reminders WHERE user_id = ?1 AND id = ?2",
                params![user_id, reminder_id],
            )?;
        }
        tracing::debug!(user_id, reminder_id, "reminder deleted");
        self.notify(user_id)
    }

    fn subscribe(&self, user_id: &str) -> Result<watch::Receiver<Vec<Reminder>>> {
        let mut watchers = self
            .watchers
            .lock()
            .map_err(|e| anyhow::anyhow!("watcher lock poisoned: {e}"))?;
        if let Some(sender) = watchers.get(user_id) {
            return Ok(sender.subscribe());
        }
        let (sender, receiver) = watch::channel(self.reminders(user_id)?);
        watchers.insert(user_id.to_string(), sender);
        Ok(receiver)
    }
}
