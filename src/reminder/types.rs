//! The reminder record.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display pattern for trigger times, e.g. `Mon, 3 Jun 2024 9:05 AM`.
pub const DEFAULT_TIME_FORMAT: &str = "%a, %-d %b %Y %-I:%M %p";

/// A user-created reminder, matching the `reminders` table.
///
/// Serialized with the document field names (`title`, `dateTime`, `notes`,
/// `imageUrl`, `userId`) plus the document `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Assigned by the store on creation; empty before that.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Trigger time in epoch milliseconds.
    pub date_time: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Reminder {
    /// A reminder that has not been stored yet.
    pub fn new(title: impl Into<String>, date_time: i64) -> Self {
        Self {
            id: String::new(),
            user_id: String::new(),
            title: title.into(),
            notes: None,
            date_time,
            image_url: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// `users/{userId}/reminders/{reminderId}`
    pub fn document_path(&self) -> String {
        format!("{}/{}", reminders_collection(&self.user_id), self.id)
    }

    /// Whether the trigger time is strictly after `now_millis`.
    pub fn is_upcoming(&self, now_millis: i64) -> bool {
        self.date_time > now_millis
    }

    /// Trigger time in local time using [`DEFAULT_TIME_FORMAT`].
    pub fn formatted_date_time(&self) -> String {
        self.formatted_date_time_with(DEFAULT_TIME_FORMAT)
    }

    pub fn formatted_date_time_with(&self, pattern: &str) -> String {
        format_millis(self.date_time, pattern)
    }
}

/// Format epoch milliseconds in local time; out-of-range values print as raw millis.
pub fn format_millis(millis: i64, pattern: &str) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(&Local).format(pattern).to_string(),
        None => millis.to_string(),
    }
}

/// `users/{userId}/reminders`
pub fn reminders_collection(user_id: &str) -> String {
    format!("users/{user_id}/reminders")
}
