use crate::components::events::Event;
use crate::error::SchedulerResult;
use async_trait::async_trait;
use tracing::info;

/// An event flagged as starting inside the due window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub event_id: String,
    pub title: String,
    pub start_time: String,
}

impl From<&Event> for Reminder {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            start_time: event.start_time.clone(),
        }
    }
}

/// Destination for reminder notifications
#[async_trait]
pub trait ReminderNotifier: Send + Sync + 'static {
    async fn notify(&self, reminder: &Reminder) -> SchedulerResult<()>;
}

/// Emits reminders to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn notify(&self, reminder: &Reminder) -> SchedulerResult<()> {
        info!(
            event_id = %reminder.event_id,
            title = %reminder.title,
            start_time = %reminder.start_time,
            "🔔 Reminder: '{}' starts at {}",
            reminder.title,
            reminder.start_time
        );
        Ok(())
    }
}
