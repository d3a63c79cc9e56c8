//! Fired-alarm handling.
//!
//! The receiver waits for the reminder's picture while the alarm is firing,
//! bounded only by the delivery deadline, and falls back to the app icon on
//! any failure.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{Notification, Notifier, Picture, CHANNEL_ID};
use crate::clock::Clock;
use crate::scheduler::{alarm_key, AlarmPayload};

pub const DEFAULT_DELIVERY_DEADLINE: Duration = Duration::from_secs(10);

pub struct AlarmReceiver {
    http: reqwest::Client,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    app_icon: Option<PathBuf>,
    deadline: Duration,
}

impl AlarmReceiver {
    pub fn new(notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            http: reqwest::Client::new(),
            notifier,
            clock,
            app_icon: None,
            deadline: DEFAULT_DELIVERY_DEADLINE,
        }
    }

    pub fn with_app_icon(mut self, path: Option<PathBuf>) -> Self {
        self.app_icon = path;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Show the notification for a fired alarm.
    ///
    /// Returns `None` when the payload has no title and nothing was shown.
    pub async fn on_receive(&self, payload: AlarmPayload) -> Result<Option<Notification>> {
        let Some(title) = payload.title else {
            tracing::debug!(id = ?payload.id, "dropping alarm without title");
            return Ok(None);
        };
        let id = payload
            .id
            .unwrap_or_else(|| self.clock.now_millis().to_string());

        let fetched = match payload.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => self.fetch_picture(url).await,
            _ => None,
        };
        let picture = match fetched {
            Some(bytes) => Some(Picture::Fetched(bytes)),
            None => self.read_app_icon().map(Picture::AppIcon),
        };

        let notification = Notification {
            key: alarm_key(&id),
            channel_id: CHANNEL_ID,
            title,
            text: payload.notes,
            picture,
        };
        self.notifier.notify(notification.clone())?;
        Ok(Some(notification))
    }

    async fn fetch_picture(&self, url: &str) -> Option<Vec<u8>> {
        match tokio::time::timeout(self.deadline, self.download(url)).await {
            Ok(Ok(bytes)) if !bytes.is_empty() => Some(bytes),
            Ok(Ok(_)) => {
                tracing::warn!(url, "picture response was empty");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(url, error = %e, "picture fetch failed");
                None
            }
            Err(_) => {
                tracing::warn!(url, deadline_ms = self.deadline.as_millis() as u64, "picture fetch missed delivery deadline");
                None
            }
        }
    }

    async fn download(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    fn read_app_icon(&self) -> Option<Vec<u8>> {
        let path = self.app_icon.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "app icon unreadable");
                None
            }
        }
    }
}
