//! CLI `run` command: fire alarms as they come due until Ctrl-C.

use anyhow::Result;
use std::sync::Arc;

use chronos::app::App;
use chronos::notify::ConsoleNotifier;
use chronos::runner;

pub async fn run(app: &App) -> Result<()> {
    let receiver = Arc::new(app.alarm_receiver(Arc::new(ConsoleNotifier::new())));

    println!("Waiting for alarms. Press Ctrl-C to stop.");
    runner::run_alarm_loop(
        app.alarms.clone(),
        receiver,
        app.clock.clone(),
        app.poll_interval(),
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
        },
    )
    .await
}
