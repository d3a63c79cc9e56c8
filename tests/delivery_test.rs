mod helpers;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chronos::config::GreetingConfig;
use chronos::greeting::{Greeter, GreetingClient, GreetingState};
use chronos::notify::{AlarmReceiver, NotificationTray, Picture, CHANNEL_ID};
use chronos::reminder::Reminder;
use chronos::runner;
use chronos::scheduler::alarm_key;
use helpers::{test_app, NOW, USER};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

/// Serve `router` on an ephemeral local port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn image_server() -> Router {
    Router::new()
        .route("/rent.png", get(|| async { PNG_BYTES.to_vec() }))
        .route("/missing.png", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow.png",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                PNG_BYTES.to_vec()
            }),
        )
}

fn app_icon() -> tempfile::NamedTempFile {
    let mut icon = tempfile::NamedTempFile::new().unwrap();
    icon.write_all(b"app-icon").unwrap();
    icon
}

fn greeter(base_url: String) -> Greeter {
    let config = GreetingConfig {
        base_url,
        timeout_secs: 5,
    };
    Greeter::new(GreetingClient::new(&config).unwrap())
}

#[tokio::test]
async fn due_alarm_shows_notification_with_fetched_picture() {
    let base = serve(image_server()).await;
    let (app, _clock) = test_app();
    let rent = app
        .sync
        .add_reminder(
            USER,
            Reminder::new("Pay rent", NOW + 1000)
                .with_notes("landlord wants cash")
                .with_image_url(format!("{base}/rent.png")),
        )
        .unwrap()
        .reminder;

    let tray = Arc::new(NotificationTray::new());
    let receiver = AlarmReceiver::new(tray.clone(), app.clock.clone());

    // Not due yet.
    assert_eq!(runner::fire_due(&app.alarms, &receiver, NOW).await.unwrap(), 0);
    assert!(tray.active().is_empty());

    assert_eq!(runner::fire_due(&app.alarms, &receiver, NOW + 1000).await.unwrap(), 1);
    let shown = tray.get(alarm_key(&rent.id)).unwrap();
    assert_eq!(shown.channel_id, CHANNEL_ID);
    assert_eq!(shown.title, "Pay rent");
    assert_eq!(shown.text.as_deref(), Some("landlord wants cash"));
    assert_eq!(shown.picture, Some(Picture::Fetched(PNG_BYTES.to_vec())));

    // The alarm is consumed; the ledger still lists the reminder.
    assert!(app.alarms.pending().unwrap().is_empty());
    assert!(app.sync.scheduled_reminder_ids().unwrap().contains(&rent.id));
}

#[tokio::test]
async fn unreachable_picture_falls_back_to_app_icon() {
    let base = serve(image_server()).await;
    let (app, _clock) = test_app();
    let icon = app_icon();
    app.sync
        .add_reminder(
            USER,
            Reminder::new("Gone", NOW + 1000).with_image_url(format!("{base}/missing.png")),
        )
        .unwrap();

    let tray = Arc::new(NotificationTray::new());
    let receiver = AlarmReceiver::new(tray.clone(), app.clock.clone())
        .with_app_icon(Some(icon.path().to_path_buf()));

    runner::fire_due(&app.alarms, &receiver, NOW + 1000).await.unwrap();

    let shown = tray.active();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].picture, Some(Picture::AppIcon(b"app-icon".to_vec())));
}

#[tokio::test]
async fn slow_picture_misses_deadline_and_falls_back() {
    let base = serve(image_server()).await;
    let (app, _clock) = test_app();
    let icon = app_icon();
    app.sync
        .add_reminder(
            USER,
            Reminder::new("Slow", NOW + 1000).with_image_url(format!("{base}/slow.png")),
        )
        .unwrap();

    let tray = Arc::new(NotificationTray::new());
    let receiver = AlarmReceiver::new(tray.clone(), app.clock.clone())
        .with_app_icon(Some(icon.path().to_path_buf()))
        .with_deadline(Duration::from_millis(100));

    runner::fire_due(&app.alarms, &receiver, NOW + 1000).await.unwrap();

    let shown = tray.active();
    assert_eq!(shown.len(), 1);
    assert!(matches!(shown[0].picture, Some(Picture::AppIcon(_))));
}

#[tokio::test]
async fn alarm_loop_fires_until_shutdown() {
    let (app, clock) = test_app();
    app.sync
        .add_reminder(USER, Reminder::new("Stretch", NOW + 500))
        .unwrap();
    clock.advance(500);

    let tray = Arc::new(NotificationTray::new());
    let receiver = Arc::new(AlarmReceiver::new(tray.clone(), app.clock.clone()));

    runner::run_alarm_loop(
        app.alarms.clone(),
        receiver,
        app.clock.clone(),
        Duration::from_millis(10),
        tokio::time::sleep(Duration::from_millis(200)),
    )
    .await
    .unwrap();

    let shown = tray.active();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Stretch");
    assert_eq!(shown[0].picture, None);
}

#[tokio::test]
async fn greeting_success_returns_body() {
    let router = Router::new().route(
        "/prompt/{prompt}",
        get(|Path(prompt): Path<String>| async move { format!("Hello! You asked: {prompt}") }),
    );
    let greeter = greeter(serve(router).await);

    let state = greeter.fetch("greet me, it is Monday").await;

    assert_eq!(
        state,
        GreetingState::Success("Hello! You asked: greet me, it is Monday".to_string())
    );
    assert_eq!(greeter.state(), state);
}

#[tokio::test]
async fn empty_greeting_is_an_error() {
    let router = Router::new().route("/prompt/{prompt}", get(|| async { "   " }));
    let greeter = greeter(serve(router).await);

    assert_eq!(
        greeter.fetch("hi").await,
        GreetingState::Error("No response".to_string())
    );
}

#[tokio::test]
async fn failed_greeting_can_be_retried() {
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = calls.clone();
    let router = Router::new().route(
        "/prompt/{prompt}",
        get(move || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                    Err(StatusCode::SERVICE_UNAVAILABLE)
                } else {
                    Ok("Good morning")
                }
            }
        }),
    );
    let greeter = greeter(serve(router).await);

    assert!(matches!(greeter.fetch("hi").await, GreetingState::Error(_)));
    assert_eq!(
        greeter.fetch("hi").await,
        GreetingState::Success("Good morning".to_string())
    );
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}
