//! CLI `doctor` command: database diagnostics and ledger drift.

use anyhow::{Context, Result};

use chronos::app::App;
use chronos::config::ChronosConfig;
use chronos::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: ChronosConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `chronos add` to create it.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
    let app = App::open(config).context("failed to open database (may be corrupt)")?;

    let report = {
        let conn = db::lock(&app.db)?;
        db::check_database_health(&conn).context("failed to run health check")?
    };

    println!("Chronos Health Report");
    println!("=====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Reminders:       {} ({} users)", report.reminder_count, report.user_count);
    println!("  Pending alarms:  {}", report.alarm_count);
    println!("  Preferences:     {}", report.preference_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    let drift = app.ledger_drift()?;
    println!();
    if drift.is_clean() {
        println!("Ledger:            in step with pending alarms");
    } else {
        println!("Ledger drift:");
        for id in &drift.stale_ids {
            println!("  no pending alarm:   {id}");
        }
        for id in &drift.unledgered_ids {
            println!("  alarm not ledgered: {id}");
        }
        println!("Saving a reminder again re-evaluates its alarm and ledger entry.");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
