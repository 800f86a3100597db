#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use event_scheduler::components::events::Event;
use event_scheduler::components::reminders::{Reminder, ReminderNotifier};
use event_scheduler::components::EventStore;
use event_scheduler::error::{store_error, SchedulerResult};
use event_scheduler::utils::time::{format_timestamp, parse_timestamp};
use std::sync::{Arc, Mutex};

/// Fixed "now" shared by the reminder tests
pub fn test_now() -> NaiveDateTime {
    parse_timestamp("2025-07-01T10:00:00").unwrap()
}

/// Timestamp string `offset` away from `now`
pub fn offset_from(now: NaiveDateTime, offset: Duration) -> String {
    format_timestamp(&(now + offset))
}

/// Build a base event with a one hour duration
pub fn event(id: &str, title: &str, start_time: &str, recurring: Option<&str>) -> Event {
    let end_time = parse_timestamp(start_time)
        .map(|start| format_timestamp(&(start + Duration::hours(1))))
        .unwrap_or_else(|| start_time.to_string());

    Event {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{} description", title),
        start_time: start_time.to_string(),
        end_time,
        recurring: recurring.map(str::to_string),
    }
}

/// Notifier that keeps every reminder it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Reminder>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Reminder> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl ReminderNotifier for RecordingNotifier {
    async fn notify(&self, reminder: &Reminder) -> SchedulerResult<()> {
        self.received.lock().unwrap().push(reminder.clone());
        Ok(())
    }
}

/// Store whose every operation fails
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl EventStore for FailingStore {
    async fn load(&self) -> SchedulerResult<Vec<Event>> {
        Err(store_error("storage offline"))
    }

    async fn save(&self, _events: &[Event]) -> SchedulerResult<()> {
        Err(store_error("storage offline"))
    }
}
