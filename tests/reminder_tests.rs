mod common;

use chrono::Duration;
use common::{event, offset_from, test_now, FailingStore, RecordingNotifier};
use event_scheduler::components::events::Event;
use event_scheduler::components::reminders::{ReminderScanner, ReminderSettings, Reminders};
use event_scheduler::components::{ComponentManager, EventStore, InMemoryStore};
use event_scheduler::config::Config;
use event_scheduler::utils::time::FixedClock;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::sync::RwLock;

fn scanner(
    store: Arc<dyn EventStore>,
    clock: Arc<FixedClock>,
    notifier: RecordingNotifier,
) -> ReminderScanner {
    ReminderScanner::new(store, clock, Arc::new(notifier), ReminderSettings::default())
}

#[tokio::test]
async fn test_tick_flags_only_events_inside_window() {
    let now = test_now();
    let store = Arc::new(InMemoryStore::with_events(vec![
        event("soon", "Soon", &offset_from(now, Duration::minutes(30)), None),
        event("later", "Later", &offset_from(now, Duration::hours(2)), None),
        event("past", "Past", &offset_from(now, Duration::minutes(-1)), None),
        event("broken", "Broken", "half past ten", None),
    ]));
    let notifier = RecordingNotifier::new();
    let scanner = scanner(store, Arc::new(FixedClock::new(now)), notifier.clone());

    let reminders = scanner.tick().await;

    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].event_id, "soon");
    assert_eq!(reminders[0].title, "Soon");
    assert_eq!(notifier.received(), reminders);
}

#[tokio::test]
async fn test_reminders_repeat_every_tick_until_event_leaves_window() {
    let now = test_now();
    let store = Arc::new(InMemoryStore::with_events(vec![event(
        "soon",
        "Soon",
        &offset_from(now, Duration::minutes(30)),
        None,
    )]));
    let clock = Arc::new(FixedClock::new(now));
    let notifier = RecordingNotifier::new();
    let scanner = scanner(store, Arc::clone(&clock), notifier.clone());

    assert_eq!(scanner.tick().await.len(), 1);
    clock.advance(Duration::minutes(1));
    assert_eq!(scanner.tick().await.len(), 1);
    assert_eq!(notifier.count(), 2);

    // The event has started and is no longer upcoming
    clock.advance(Duration::minutes(30));
    assert!(scanner.tick().await.is_empty());
    assert_eq!(notifier.count(), 2);
}

#[tokio::test]
async fn test_tick_skips_unparseable_start_with_valid_end() {
    let now = test_now();
    let broken = Event {
        id: "broken".to_string(),
        title: "Broken".to_string(),
        description: String::new(),
        start_time: "garbage".to_string(),
        end_time: offset_from(now, Duration::minutes(45)),
        recurring: Some("none".to_string()),
    };
    let store = Arc::new(InMemoryStore::with_events(vec![
        broken,
        event("due", "Due", &offset_from(now, Duration::minutes(15)), Some("none")),
    ]));
    let notifier = RecordingNotifier::new();
    let scanner = scanner(store, Arc::new(FixedClock::new(now)), notifier.clone());

    let reminders = scanner.tick().await;

    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].event_id, "due");
    assert_eq!(notifier.count(), 1);
}

#[tokio::test]
async fn test_tick_with_unbounded_window_does_not_panic() {
    let now = test_now();
    let store = Arc::new(InMemoryStore::with_events(vec![event(
        "soon",
        "Soon",
        &offset_from(now, Duration::minutes(30)),
        None,
    )]));
    let settings = ReminderSettings {
        interval: StdDuration::from_secs(60),
        window: Duration::MAX,
    };
    let scanner = ReminderScanner::new(
        store,
        Arc::new(FixedClock::new(now)),
        Arc::new(RecordingNotifier::new()),
        settings,
    );

    assert!(scanner.tick().await.is_empty());
}

#[test]
fn test_settings_fall_back_on_out_of_range_window() {
    let mut config = Config::default();

    config.reminder_window_minutes = 30;
    assert_eq!(ReminderSettings::from_config(&config).window, Duration::minutes(30));

    for minutes in [0, -10, i64::MAX] {
        config.reminder_window_minutes = minutes;
        assert_eq!(
            ReminderSettings::from_config(&config).window,
            ReminderSettings::default().window
        );
    }
}

#[tokio::test]
async fn test_tick_ignores_recurring_occurrences() {
    let now = test_now();
    // Its next daily occurrence would be 30 minutes from now
    let yesterday = offset_from(now, Duration::minutes(30) - Duration::days(1));
    let store = Arc::new(InMemoryStore::with_events(vec![event(
        "daily",
        "Daily",
        &yesterday,
        Some("daily"),
    )]));
    let scanner = scanner(store, Arc::new(FixedClock::new(now)), RecordingNotifier::new());

    assert!(scanner.tick().await.is_empty());
}

#[tokio::test]
async fn test_tick_reads_store_fresh_each_time() {
    let now = test_now();
    let store = Arc::new(InMemoryStore::new());
    let scanner = scanner(
        Arc::clone(&store) as Arc<dyn EventStore>,
        Arc::new(FixedClock::new(now)),
        RecordingNotifier::new(),
    );

    assert!(scanner.tick().await.is_empty());

    store
        .save(&[event("new", "New", &offset_from(now, Duration::minutes(5)), None)])
        .await
        .unwrap();

    let reminders = scanner.tick().await;
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].event_id, "new");
}

#[tokio::test]
async fn test_tick_survives_store_failure() {
    let notifier = RecordingNotifier::new();
    let scanner = scanner(
        Arc::new(FailingStore),
        Arc::new(FixedClock::new(test_now())),
        notifier.clone(),
    );

    assert!(scanner.tick().await.is_empty());
    assert_eq!(notifier.count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_scanner_ticks_on_interval_until_stopped() {
    let now = test_now();
    let store = Arc::new(InMemoryStore::with_events(vec![event(
        "soon",
        "Soon",
        &offset_from(now, Duration::minutes(30)),
        None,
    )]));
    let notifier = RecordingNotifier::new();
    let handle = scanner(store, Arc::new(FixedClock::new(now)), notifier.clone()).spawn();

    // Ticks at 0s, 60s and 120s
    tokio::time::sleep(StdDuration::from_secs(150)).await;
    assert!(handle.is_running());
    assert_eq!(notifier.count(), 3);

    handle.stop().await.unwrap();

    tokio::time::sleep(StdDuration::from_secs(600)).await;
    assert_eq!(notifier.count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_component_manager_owns_scanner_lifecycle() {
    let now = test_now();
    let store: Arc<dyn EventStore> = Arc::new(InMemoryStore::with_events(vec![event(
        "soon",
        "Soon",
        &offset_from(now, Duration::minutes(10)),
        None,
    )]));
    let notifier = RecordingNotifier::new();

    let config = Arc::new(RwLock::new(Config::default()));
    let mut manager = ComponentManager::new(Arc::clone(&config));
    manager.register(Reminders::with_parts(
        Arc::new(FixedClock::new(now)),
        Arc::new(notifier.clone()),
    ));
    assert!(manager.get_component_by_name("reminders").is_some());

    manager.init_all(Arc::clone(&store)).await.unwrap();
    tokio::time::sleep(StdDuration::from_secs(1)).await;
    assert_eq!(notifier.count(), 1);

    manager.shutdown_all().await.unwrap();
    tokio::time::sleep(StdDuration::from_secs(600)).await;
    assert_eq!(notifier.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_reminders_never_start() {
    let now = test_now();
    let store: Arc<dyn EventStore> = Arc::new(InMemoryStore::with_events(vec![event(
        "soon",
        "Soon",
        &offset_from(now, Duration::minutes(10)),
        None,
    )]));
    let notifier = RecordingNotifier::new();

    let mut config = Config::default();
    config.components.insert("reminders".to_string(), false);
    let mut manager = ComponentManager::new(Arc::new(RwLock::new(config)));
    manager.register(Reminders::with_parts(
        Arc::new(FixedClock::new(now)),
        Arc::new(notifier.clone()),
    ));

    manager.init_all(store).await.unwrap();
    tokio::time::sleep(StdDuration::from_secs(120)).await;

    assert_eq!(notifier.count(), 0);
}
