#![allow(dead_code)]

use std::sync::Arc;

use chronos::app::App;
use chronos::clock::FixedClock;
use chronos::config::ChronosConfig;
use chronos::db;
use chronos::reminder::Reminder;
use chronos::scheduler::Alarm;

pub const USER: &str = "user-1";

/// 2026-03-01T09:00:00Z
pub const NOW: i64 = 1_772_355_600_000;

/// An app over a fresh in-memory database, with the clock pinned at [`NOW`].
pub fn test_app() -> (App, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(NOW));
    let conn = db::open_memory_database().unwrap();
    let app = App::with_connection(ChronosConfig::default(), conn, clock.clone());
    (app, clock)
}

/// Save a reminder through the sync routine and return it with its assigned ID.
pub fn save(app: &App, title: &str, date_time: i64) -> Reminder {
    app.sync
        .add_reminder(USER, Reminder::new(title, date_time))
        .unwrap()
        .reminder
}

pub fn ledger(app: &App) -> Vec<String> {
    app.sync
        .scheduled_reminder_ids()
        .unwrap()
        .into_iter()
        .collect()
}

pub fn pending_alarms(app: &App) -> Vec<Alarm> {
    app.alarms.pending().unwrap()
}
