//! The alarm loop.
//!
//! Polls the alarm service on a fixed interval, removes every alarm whose fire
//! time has come, and hands its payload to the [`AlarmReceiver`]. A failing
//! pass is logged and the loop keeps going. Firing does not touch the ledger.

use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::notify::AlarmReceiver;
use crate::scheduler::AlarmService;

/// Fire every alarm due at `now`. Returns the number of notifications shown.
pub async fn fire_due(
    alarms: &Arc<dyn AlarmService>,
    receiver: &AlarmReceiver,
    now: i64,
) -> Result<usize> {
    let service = Arc::clone(alarms);
    let due = tokio::task::spawn_blocking(move || service.take_due(now)).await??;

    let mut shown = 0;
    for alarm in due {
        tracing::info!(key = alarm.key, fire_at = alarm.fire_at, "alarm fired");
        match receiver.on_receive(alarm.payload).await {
            Ok(Some(_)) => shown += 1,
            Ok(None) => {}
            Err(e) => tracing::warn!(key = alarm.key, error = %e, "notification failed"),
        }
    }
    Ok(shown)
}

/// Run until `shutdown` resolves.
pub async fn run_alarm_loop(
    alarms: Arc<dyn AlarmService>,
    receiver: Arc<AlarmReceiver>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    tracing::info!(poll_ms = poll_interval.as_millis() as u64, "alarm loop started");
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("alarm loop stopping");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = fire_due(&alarms, &receiver, clock.now_millis()).await {
                    tracing::warn!(error = %e, "alarm pass failed");
                }
            }
        }
    }

    Ok(())
}
