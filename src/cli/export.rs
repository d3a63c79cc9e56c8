//! CLI `export` and `import` commands.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use chronos::app::App;
use chronos::reminder::{AlarmState, Reminder, ReminderStore};

/// Export format: the signed-in user's reminders and the ledger.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    user_id: String,
    reminders: Vec<Reminder>,
    #[serde(default)]
    scheduled_reminder_ids: BTreeSet<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: u64,
    pub skipped: u64,
    pub scheduled: u64,
}

/// Export the current user's reminders as JSON to stdout.
pub fn export(app: &App) -> Result<()> {
    let user_id = app.session.current_user()?;
    let data = ExportData {
        reminders: app.sync.reminders(&user_id)?,
        scheduled_reminder_ids: app.sync.scheduled_reminder_ids()?,
        user_id,
    };

    println!("{}", serde_json::to_string_pretty(&data)?);
    eprintln!("Exported {} reminders.", data.reminders.len());
    Ok(())
}

/// Import reminders for the current user from an export file.
pub fn import(app: &App, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;
    let data: ExportData = serde_json::from_str(&json).context("failed to parse import JSON")?;

    println!("Importing {} reminders...", data.reminders.len());
    let report = import_data(app, data)?;

    println!("Import complete:");
    println!("  Reminders imported: {}", report.imported);
    println!("  Reminders skipped:  {} (already exist)", report.skipped);
    println!("  Alarms scheduled:   {}", report.scheduled);
    Ok(())
}

/// Reminders keep their IDs; IDs that already exist are skipped and blank IDs
/// get a fresh one. Every imported reminder goes through the sync routine, so
/// alarms are registered for the ones still ahead. The exported ledger is not
/// restored.
pub fn import_data(app: &App, data: ExportData) -> Result<ImportReport> {
    let user_id = app.session.current_user()?;
    let mut report = ImportReport::default();

    for reminder in data.reminders {
        let has_id = !reminder.id.trim().is_empty();
        if has_id && app.store.find(&user_id, &reminder.id)?.is_some() {
            report.skipped += 1;
            continue;
        }

        let outcome = if has_id {
            app.sync.update_reminder(&user_id, reminder)?
        } else {
            app.sync.add_reminder(&user_id, reminder)?
        };
        if outcome.alarm == AlarmState::Scheduled {
            report.scheduled += 1;
        }
        report.imported += 1;
    }

    tracing::info!(
        imported = report.imported,
        skipped = report.skipped,
        scheduled = report.scheduled,
        "import finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::{test_app, NOW, USER};

    fn export_of(reminders: Vec<Reminder>, ledger: &[&str]) -> ExportData {
        ExportData {
            user_id: "someone-else".into(),
            reminders,
            scheduled_reminder_ids: ledger.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn with_id(id: &str, title: &str, at: i64) -> Reminder {
        Reminder {
            id: id.into(),
            ..Reminder::new(title, at)
        }
    }

    #[test]
    fn import_keeps_ids_and_schedules_future_reminders() {
        let app = test_app();
        let data = export_of(
            vec![
                with_id("r-future", "Pay rent", NOW + 60_000),
                with_id("r-past", "Old", NOW - 60_000),
            ],
            &[],
        );

        let report = import_data(&app, data).unwrap();

        assert_eq!(
            report,
            ImportReport {
                imported: 2,
                skipped: 0,
                scheduled: 1
            }
        );
        let stored = app.store.find(USER, "r-future").unwrap().unwrap();
        assert_eq!(stored.user_id, USER);
        assert!(app.store.find(USER, "r-past").unwrap().is_some());
        let ledger = app.sync.scheduled_reminder_ids().unwrap();
        assert_eq!(ledger.into_iter().collect::<Vec<_>>(), vec!["r-future"]);
        assert_eq!(app.alarms.pending().unwrap().len(), 1);
    }

    #[test]
    fn import_skips_existing_ids() {
        let app = test_app();
        app.sync
            .update_reminder(USER, with_id("r1", "Original", NOW + 60_000))
            .unwrap();

        let report =
            import_data(&app, export_of(vec![with_id("r1", "Imported", NOW + 120_000)], &[]))
                .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.imported, 0);
        let stored = app.store.find(USER, "r1").unwrap().unwrap();
        assert_eq!(stored.title, "Original");
        assert_eq!(app.alarms.pending().unwrap()[0].fire_at, NOW + 60_000);
    }

    #[test]
    fn blank_ids_get_fresh_ones() {
        let app = test_app();
        let report = import_data(
            &app,
            export_of(
                vec![
                    with_id("", "No id", NOW + 60_000),
                    with_id("   ", "Blank id", NOW + 60_000),
                ],
                &[],
            ),
        )
        .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.scheduled, 2);
        let stored = app.sync.reminders(USER).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|r| !r.id.trim().is_empty()));
        let ledger = app.sync.scheduled_reminder_ids().unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(stored.iter().all(|r| ledger.contains(&r.id)));
        assert!(app.ledger_drift().unwrap().is_clean());
    }

    #[test]
    fn exported_ledger_is_not_restored() {
        let app = test_app();
        import_data(
            &app,
            export_of(vec![with_id("r-past", "Old", NOW - 1)], &["r-past", "r-gone"]),
        )
        .unwrap();

        assert!(app.sync.scheduled_reminder_ids().unwrap().is_empty());
        assert!(app.alarms.pending().unwrap().is_empty());
    }

    #[test]
    fn export_json_parses_back_for_import() {
        let json = r#"{
            "userId": "alice",
            "reminders": [{"id": "r1", "title": "Pay rent", "dateTime": 1000}]
        }"#;
        let data: ExportData = serde_json::from_str(json).unwrap();
        assert_eq!(data.reminders.len(), 1);
        assert!(data.scheduled_reminder_ids.is_empty());
    }
}
