//! CLI reminder commands: add, edit, delete, list, ledger.

use anyhow::{ensure, Context, Result};

use chronos::app::App;
use chronos::reminder::types::{format_millis, DEFAULT_TIME_FORMAT};
use chronos::reminder::{AlarmState, Reminder, ReminderStore, SyncOutcome};

use super::resolve_when;

/// Fields supplied on the command line for add/edit.
#[derive(Debug, Default)]
pub struct ReminderFields {
    pub title: Option<String>,
    pub at: Option<String>,
    pub r#in: Option<String>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub clear_notes: bool,
    pub clear_image: bool,
}

fn ensure_title(title: &str) -> Result<()> {
    ensure!(!title.trim().is_empty(), "title must not be empty");
    Ok(())
}

fn print_outcome(verb: &str, outcome: &SyncOutcome) {
    let r = &outcome.reminder;
    println!("{verb} {} \"{}\" for {}", r.id, r.title, r.formatted_date_time());
    match outcome.alarm {
        AlarmState::Scheduled => println!("Alarm scheduled."),
        AlarmState::Cancelled => println!("Trigger time has passed; no alarm scheduled."),
    }
}

pub fn add(app: &App, fields: ReminderFields) -> Result<()> {
    let user = app.session.current_user()?;
    let title = fields.title.unwrap_or_default();
    ensure_title(&title)?;
    let date_time = resolve_when(
        fields.at.as_deref(),
        fields.r#in.as_deref(),
        app.clock.now_millis(),
    )?
    .context("a trigger time is required: pass --at or --in")?;

    let reminder = Reminder {
        notes: fields.notes,
        image_url: fields.image_url,
        ..Reminder::new(title, date_time)
    };
    let outcome = app.sync.add_reminder(&user, reminder)?;
    print_outcome("Created", &outcome);
    Ok(())
}

/// Replace a stored reminder; unspecified fields keep their current values.
pub fn edit(app: &App, id: &str, fields: ReminderFields) -> Result<()> {
    let user = app.session.current_user()?;
    let current = app
        .store
        .find(&user, id)?
        .with_context(|| format!("reminder not found: {id}"))?;

    let date_time = resolve_when(
        fields.at.as_deref(),
        fields.r#in.as_deref(),
        app.clock.now_millis(),
    )?
    .unwrap_or(current.date_time);
    let title = fields.title.unwrap_or(current.title);
    ensure_title(&title)?;

    let notes = if fields.clear_notes {
        None
    } else {
        fields.notes.or(current.notes)
    };
    let image_url = if fields.clear_image {
        None
    } else {
        fields.image_url.or(current.image_url)
    };

    let replaced = Reminder {
        id: current.id,
        user_id: current.user_id,
        title,
        notes,
        date_time,
        image_url,
    };
    let outcome = app.sync.update_reminder(&user, replaced)?;
    print_outcome("Updated", &outcome);
    Ok(())
}

pub fn delete(app: &App, id: &str) -> Result<()> {
    let user = app.session.current_user()?;
    app.sync.delete_reminder(&user, id)?;
    println!("Deleted {id}.");
    Ok(())
}

pub fn list(app: &App, json: bool) -> Result<()> {
    let user = app.session.current_user()?;
    let reminders = app.sync.reminders(&user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reminders)?);
        return Ok(());
    }

    if reminders.is_empty() {
        println!("No reminders.");
        return Ok(());
    }

    let scheduled = app.sync.scheduled_reminder_ids()?;
    for r in &reminders {
        let mark = if scheduled.contains(&r.id) { "*" } else { " " };
        println!("{mark} {}  {:<28} {}", r.id, r.formatted_date_time(), r.title);
        if let Some(ref notes) = r.notes {
            println!("    {notes}");
        }
        if let Some(ref url) = r.image_url {
            println!("    image: {url}");
        }
    }
    println!();
    println!("* alarm scheduled");
    Ok(())
}

/// Print the scheduled-ID ledger next to the pending alarms.
pub fn ledger(app: &App) -> Result<()> {
    let ids = app.sync.scheduled_reminder_ids()?;
    println!("Scheduled reminder IDs ({}):", ids.len());
    for id in &ids {
        println!("  {id}");
    }

    let pending = app.alarms.pending()?;
    println!();
    println!("Pending alarms ({}):", pending.len());
    for alarm in &pending {
        let when = format_millis(alarm.fire_at, DEFAULT_TIME_FORMAT);
        println!(
            "  {:>11}  {:<28} {}",
            alarm.key,
            when,
            alarm.payload.id.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
