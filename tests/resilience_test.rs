use std::sync::Arc;

use chronos::app::App;
use chronos::clock::FixedClock;
use chronos::config::ChronosConfig;
use chronos::db;
use chronos::reminder::Reminder;
use tempfile::TempDir;

const NOW: i64 = 1_772_355_600_000;

fn file_app(path: &std::path::Path) -> App {
    let conn = db::open_database(path).unwrap();
    App::with_connection(ChronosConfig::default(), conn, Arc::new(FixedClock::new(NOW)))
}

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("chronos.db");
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();

    assert!(db_path.exists());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn busy_timeout_is_set() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("chronos.db")).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn reopening_keeps_reminders_ledger_and_alarms() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("chronos.db");

    let id = {
        let app = file_app(&db_path);
        app.sync
            .add_reminder("user-1", Reminder::new("Pay rent", NOW + 3_600_000))
            .unwrap()
            .reminder
            .id
    };

    let app = file_app(&db_path);
    let reminders = app.sync.reminders("user-1").unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].id, id);
    assert!(app.sync.scheduled_reminder_ids().unwrap().contains(&id));
    assert_eq!(app.alarms.pending().unwrap().len(), 1);
    assert!(app.ledger_drift().unwrap().is_clean());
}

#[test]
fn health_report_counts_rows() {
    let tmp = TempDir::new().unwrap();
    let app = file_app(&tmp.path().join("chronos.db"));
    app.sync
        .add_reminder("user-1", Reminder::new("Future", NOW + 60_000))
        .unwrap();
    app.sync
        .add_reminder("user-2", Reminder::new("Past", NOW - 60_000))
        .unwrap();

    let conn = db::lock(&app.db).unwrap();
    let report = db::check_database_health(&conn).unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, db::migrations::CURRENT_SCHEMA_VERSION);
    assert_eq!(report.reminder_count, 2);
    assert_eq!(report.user_count, 2);
    assert_eq!(report.alarm_count, 1);
    // The scheduled-ID ledger is one preference.
    assert_eq!(report.preference_count, 1);
}
