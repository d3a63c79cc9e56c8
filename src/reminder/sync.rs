//! The sync routine: keep the alarm and the ledger in step with each reminder mutation.
//!
//! After create or update, a reminder whose trigger time is ahead of the clock
//! gets its alarm (re)registered and its ID added to the ledger; otherwise its
//! alarm is cancelled and the ID removed. Delete always cancels and removes.
//!
//! The store write, the alarm call, and the ledger write are separate steps.
//! A failing alarm call aborts the routine before the ledger is touched, and
//! nothing compensates for a store write that already happened. A process
//! killed between the alarm call and the ledger write leaves the two out of
//! step until the next mutation of that reminder.

use anyhow::{ensure, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::clock::Clock;
use crate::prefs::AppPreferences;
use crate::reminder::store::ReminderStore;
use crate::reminder::types::Reminder;
use crate::scheduler::ReminderScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

/// Alarm state of a reminder after a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmState {
    Scheduled,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    /// The reminder as stored, with its assigned ID after a create.
    pub reminder: Reminder,
    pub alarm: AlarmState,
}

pub struct ReminderSync {
    store: Arc<dyn ReminderStore>,
    scheduler: Arc<dyn ReminderScheduler>,
    prefs: AppPreferences,
    clock: Arc<dyn Clock>,
}

impl ReminderSync {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        scheduler: Arc<dyn ReminderScheduler>,
        prefs: AppPreferences,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            scheduler,
            prefs,
            clock,
        }
    }

    /// Apply one mutation for `user_id` and re-evaluate the reminder's alarm.
    ///
    /// The reminder is stamped with `user_id` before it is written. An update
    /// of a reminder with a blank ID is rejected before anything is touched.
    /// For [`SyncOperation::Delete`] only the reminder's ID is used.
    pub fn apply(
        &self,
        user_id: &str,
        op: SyncOperation,
        reminder: Reminder,
    ) -> Result<SyncOutcome> {
        let reminder = Reminder {
            user_id: user_id.to_string(),
            ..reminder
        };

        match op {
            SyncOperation::Create => {
                let stored = self.store.add(&reminder)?;
                let alarm = self.sync_alarm(&stored)?;
                Ok(SyncOutcome {
                    reminder: stored,
                    alarm,
                })
            }
            SyncOperation::Update => {
                ensure!(
                    !reminder.id.trim().is_empty(),
                    "cannot update a reminder without an id"
                );
                self.store.update(&reminder)?;
                let alarm = self.sync_alarm(&reminder)?;
                Ok(SyncOutcome { reminder, alarm })
            }
            SyncOperation::Delete => {
                self.store.delete(user_id, &reminder.id)?;
                self.scheduler.cancel(&reminder)?;
                self.prefs.remove_scheduled_reminder_id(&reminder.id)?;
                tracing::info!(id = %reminder.id, "reminder deleted");
                Ok(SyncOutcome {
                    reminder,
                    alarm: AlarmState::Cancelled,
                })
            }
        }
    }

    pub fn add_reminder(&self, user_id: &str, reminder: Reminder) -> Result<SyncOutcome> {
        self.apply(user_id, SyncOperation::Create, reminder)
    }

    pub fn update_reminder(&self, user_id: &str, reminder: Reminder) -> Result<SyncOutcome> {
        self.apply(user_id, SyncOperation::Update, reminder)
    }

    pub fn delete_reminder(&self, user_id: &str, reminder_id: &str) -> Result<SyncOutcome> {
        let tombstone = Reminder {
            id: reminder_id.to_string(),
            ..Reminder::new("", 0)
        };
        self.apply(user_id, SyncOperation::Delete, tombstone)
    }

    pub fn reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        self.store.reminders(user_id)
    }

    pub fn scheduled_reminder_ids(&self) -> Result<BTreeSet<String>> {
        self.prefs.scheduled_reminder_ids()
    }

    fn sync_alarm(&self, reminder: &Reminder) -> Result<AlarmState> {
        let now = self.clock.now_millis();
        if reminder.is_upcoming(now) {
            self.scheduler.schedule(reminder)?;
            self.prefs.add_scheduled_reminder_id(&reminder.id)?;
            Ok(AlarmState::Scheduled)
        } else {
            tracing::debug!(id = %reminder.id, date_time = reminder.date_time, now, "trigger time passed");
            self.scheduler.cancel(reminder)?;
            self.prefs.remove_scheduled_reminder_id(&reminder.id)?;
            Ok(AlarmState::Cancelled)
        }
    }
}
