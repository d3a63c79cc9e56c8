//! Wiring of the database, store, ledger, scheduler, and session.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::ChronosConfig;
use crate::db::{self, Db};
use crate::notify::{AlarmReceiver, Notifier};
use crate::prefs::AppPreferences;
use crate::reminder::{ReminderStore, ReminderSync, SqliteReminderStore};
use crate::scheduler::{AlarmScheduler, AlarmService, SqliteAlarmService};
use crate::session::Session;

/// Disagreement between the ledger and the pending alarms.
///
/// Nothing reconciles the two on startup; this is a read-only report.
#[derive(Debug, Default, Serialize)]
pub struct LedgerDrift {
    /// In the ledger, but no alarm is pending (fired, or lost before registration).
    pub stale_ids: Vec<String>,
    /// An alarm is pending, but the ledger does not list its reminder.
    pub unledgered_ids: Vec<String>,
}

impl LedgerDrift {
    pub fn is_clean(&self) -> bool {
        self.stale_ids.is_empty() && self.unledgered_ids.is_empty()
    }
}

pub struct App {
    pub config: ChronosConfig,
    pub db: Db,
    pub clock: Arc<dyn Clock>,
    pub prefs: AppPreferences,
    pub store: Arc<SqliteReminderStore>,
    pub alarms: Arc<dyn AlarmService>,
    pub sync: ReminderSync,
    pub session: Session,
}

impl App {
    /// Open the configured database and wire everything against the system clock.
    pub fn open(config: ChronosConfig) -> Result<Self> {
        let db_path = config.resolved_db_path();
        let conn = db::open_database(&db_path)?;
        tracing::info!(db = %db_path.display(), "database ready");
        Ok(Self::with_connection(config, conn, Arc::new(SystemClock)))
    }

    pub fn with_connection(config: ChronosConfig, conn: Connection, clock: Arc<dyn Clock>) -> Self {
        let db = db::shared(conn);
        let prefs = AppPreferences::new(db.clone());
        let store = Arc::new(SqliteReminderStore::new(db.clone()));
        let alarms: Arc<dyn AlarmService> = Arc::new(SqliteAlarmService::new(db.clone()));
        let scheduler = Arc::new(AlarmScheduler::new(alarms.clone()));
        let store_dyn: Arc<dyn ReminderStore> = store.clone();
        let sync = ReminderSync::new(store_dyn, scheduler, prefs.clone(), clock.clone());
        let session = Session::new(prefs.clone(), config.session.user_id.clone());

        Self {
            config,
            db,
            clock,
            prefs,
            store,
            alarms,
            sync,
            session,
        }
    }

    /// A receiver configured with the app icon and delivery deadline.
    pub fn alarm_receiver(&self, notifier: Arc<dyn Notifier>) -> AlarmReceiver {
        AlarmReceiver::new(notifier, self.clock.clone())
            .with_app_icon(self.config.resolved_app_icon())
            .with_deadline(Duration::from_secs(
                self.config.notifications.delivery_deadline_secs,
            ))
    }

    pub fn ledger_drift(&self) -> Result<LedgerDrift> {
        let ledger = self.prefs.scheduled_reminder_ids()?;
        let alarmed: BTreeSet<String> = self
            .alarms
            .pending()?
            .into_iter()
            .filter_map(|alarm| alarm.payload.id)
            .collect();

        Ok(LedgerDrift {
            stale_ids: ledger.difference(&alarmed).cloned().collect(),
            unledgered_ids: alarmed.difference(&ledger).cloned().collect(),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.notifications.poll_interval_ms.max(1))
    }
}
