//! Scheduler adapter: one alarm per reminder.
//!
//! [`ReminderScheduler`] is the boundary the sync routine talks to.
//! [`AlarmScheduler`] implements it over an injected [`AlarmService`], keying
//! every alarm by [`alarm_key`] of the reminder ID.

pub mod alarm;

use anyhow::Result;
use std::sync::Arc;

pub use alarm::{alarm_key, Alarm, AlarmPayload, AlarmService, SqliteAlarmService};

use crate::reminder::types::Reminder;

pub trait ReminderScheduler: Send + Sync {
    /// Register the reminder's alarm at its trigger time, replacing any prior one.
    fn schedule(&self, reminder: &Reminder) -> Result<()>;

    /// Remove the reminder's alarm. No-op when none is registered.
    fn cancel(&self, reminder: &Reminder) -> Result<()>;
}

pub struct AlarmScheduler {
    alarms: Arc<dyn AlarmService>,
}

impl AlarmScheduler {
    pub fn new(alarms: Arc<dyn AlarmService>) -> Self {
        Self { alarms }
    }
}

impl From<&Reminder> for AlarmPayload {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: Some(reminder.id.clone()),
            title: Some(reminder.title.clone()),
            notes: reminder.notes.clone(),
            image_url: reminder.image_url.clone(),
        }
    }
}

impl ReminderScheduler for AlarmScheduler {
    fn schedule(&self, reminder: &Reminder) -> Result<()> {
        let key = alarm_key(&reminder.id);
        self.alarms
            .register(key, reminder.date_time, AlarmPayload::from(reminder))?;
        tracing::info!(id = %reminder.id, key, fire_at = reminder.date_time, "reminder scheduled");
        Ok(())
    }

    fn cancel(&self, reminder: &Reminder) -> Result<()> {
        let key = alarm_key(&reminder.id);
        self.alarms.cancel(key)?;
        tracing::info!(id = %reminder.id, key, "reminder alarm cancelled");
        Ok(())
    }
}
