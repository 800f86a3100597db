mod notifications;
mod scanner;

pub use notifications::{LogNotifier, Reminder, ReminderNotifier};
pub use scanner::{ReminderHandle, ReminderScanner, ReminderSettings};

use crate::components::event_store::EventStore;
use crate::config::Config;
use crate::error::SchedulerResult;
use crate::utils::time::{Clock, SystemClock};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// Background reminder component, owning the scanner task
pub struct Reminders {
    handle: RwLock<Option<ReminderHandle>>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ReminderNotifier>,
}

impl Default for Reminders {
    fn default() -> Self {
        Self::new()
    }
}

impl Reminders {
    /// Create a reminder component using the wall clock and the log
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SystemClock), Arc::new(LogNotifier))
    }

    /// Create a reminder component with an explicit clock and notifier
    pub fn with_parts(clock: Arc<dyn Clock>, notifier: Arc<dyn ReminderNotifier>) -> Self {
        Self {
            handle: RwLock::new(None),
            clock,
            notifier,
        }
    }
}

#[async_trait]
impl super::Component for Reminders {
    fn name(&self) -> &'static str {
        "reminders"
    }

    async fn init(
        &self,
        config: Arc<RwLock<Config>>,
        store: Arc<dyn EventStore>,
    ) -> SchedulerResult<()> {
        let settings = {
            let config_read = config.read().await;
            ReminderSettings::from_config(&config_read)
        };

        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_some() {
            warn!("Reminder scanner is already running, skipping initialization");
            return Ok(());
        }

        let scanner = ReminderScanner::new(
            store,
            Arc::clone(&self.clock),
            Arc::clone(&self.notifier),
            settings,
        );
        *handle_lock = Some(scanner.spawn());

        Ok(())
    }

    async fn shutdown(&self) -> SchedulerResult<()> {
        let handle = self.handle.write().await.take();
        if let Some(handle) = handle {
            handle.stop().await?;
        }
        Ok(())
    }
}
