pub mod store;
pub mod sync;
pub mod types;

pub use store::{ReminderStore, SqliteReminderStore};
pub use sync::{AlarmState, ReminderSync, SyncOperation, SyncOutcome};
pub use types::Reminder;
