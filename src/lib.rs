//! Time-based reminders with local alarms and notifications.
//!
//! Chronos keeps per-user reminders in SQLite, registers one exact, one-shot
//! alarm for every reminder whose trigger time is still ahead, and shows a
//! notification when the alarm fires. A locally persisted ledger records which
//! reminder IDs are believed to have a live alarm.
//!
//! # Architecture
//!
//! - **Store**: reminders keyed by `users/{userId}/reminders/{reminderId}`, with a
//!   push subscription per user
//! - **Ledger**: the `scheduled_reminder_ids` string set in the preferences store
//! - **Scheduler**: one alarm per reminder, keyed by a hash of the reminder ID
//! - **Sync**: on create/update/delete, register or cancel the alarm and update the ledger
//! - **Runner**: drains due alarms and hands them to the notification receiver
//!
//! # Modules
//!
//! - [`app`]: Wiring of the database, store, ledger, scheduler, and session
//! - [`clock`]: Injectable wall clock in epoch milliseconds
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite initialization, schema, migrations, and health checks
//! - [`greeting`]: AI-written greeting text from a remote text-generation endpoint
//! - [`notify`]: Notification model and the fired-alarm receiver
//! - [`prefs`]: Local key-value preferences, including the scheduled-ID ledger
//! - [`reminder`]: Reminder records, the reminder store, and the sync routine
//! - [`runner`]: The alarm loop that fires due alarms
//! - [`scheduler`]: Alarm service capability and the reminder scheduler adapter
//! - [`session`]: Sign in, sign out, and current-user resolution

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod greeting;
pub mod notify;
pub mod prefs;
pub mod reminder;
pub mod runner;
pub mod scheduler;
pub mod session;
