//! Notifications shown when an alarm fires.
//!
//! A [`Notification`] is keyed by the hash of its reminder ID; showing a second
//! notification with the same key replaces the first. [`receiver::AlarmReceiver`]
//! turns a fired alarm payload into exactly one notification.

pub mod receiver;

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub use receiver::AlarmReceiver;

pub const CHANNEL_ID: &str = "reminder_channel";
pub const CHANNEL_NAME: &str = "Reminders";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picture {
    /// The reminder's own image.
    Fetched(Vec<u8>),
    /// The application icon, used when the reminder's image is missing or unreachable.
    AppIcon(Vec<u8>),
}

impl Picture {
    pub fn len(&self) -> usize {
        match self {
            Self::Fetched(bytes) | Self::AppIcon(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub key: i32,
    pub channel_id: &'static str,
    pub title: String,
    pub text: Option<String>,
    pub picture: Option<Picture>,
}

pub trait Notifier: Send + Sync {
    /// Show a notification, replacing any shown notification with the same key.
    fn notify(&self, notification: Notification) -> Result<()>;
}

/// The set of currently shown notifications, one per key.
#[derive(Debug, Default)]
pub struct NotificationTray {
    shown: Mutex<BTreeMap<i32, Notification>>,
}

impl NotificationTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Vec<Notification> {
        self.shown
            .lock()
            .map(|shown| shown.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get(&self, key: i32) -> Option<Notification> {
        self.shown.lock().ok()?.get(&key).cloned()
    }

    /// Store the notification and report whether it replaced an earlier one.
    fn post(&self, notification: Notification) -> Result<bool> {
        let mut shown = self
            .shown
            .lock()
            .map_err(|e| anyhow::anyhow!("notification tray lock poisoned: {e}"))?;
        Ok(shown.insert(notification.key, notification).is_some())
    }
}

impl Notifier for NotificationTray {
    fn notify(&self, notification: Notification) -> Result<()> {
        self.post(notification).map(|_| ())
    }
}

/// Prints each notification to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    tray: NotificationTray,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) -> Result<()> {
        println!("[{CHANNEL_NAME}] {}", notification.title);
        if let Some(ref text) = notification.text {
            println!("  {text}");
        }
        match notification.picture {
            Some(Picture::Fetched(ref bytes)) => println!("  (picture, {} bytes)", bytes.len()),
            Some(Picture::AppIcon(_)) => println!("  (app icon)"),
            None => {}
        }

        let key = notification.key;
        let replaced = self.tray.post(notification)?;
        tracing::info!(key, replaced, channel = CHANNEL_ID, "notification shown");
        Ok(())
    }
}
