use super::notifications::{Reminder, ReminderNotifier};
use crate::components::event_store::EventStore;
use crate::config::Config;
use crate::error::{component_error, SchedulerResult};
use crate::utils::time::{starts_within, Clock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Polling interval and due window of the scanner
#[derive(Debug, Clone, Copy)]
pub struct ReminderSettings {
    pub interval: Duration,
    pub window: chrono::Duration,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            window: chrono::Duration::hours(1),
        }
    }
}

impl ReminderSettings {
    /// Build settings from config; an out-of-range window falls back to the default
    pub fn from_config(config: &Config) -> Self {
        let window = chrono::Duration::try_minutes(config.reminder_window_minutes)
            .filter(|window| *window > chrono::Duration::zero())
            .unwrap_or_else(|| {
                warn!(
                    "Reminder window of {} minutes is out of range, using the default",
                    config.reminder_window_minutes
                );
                Self::default().window
            });

        Self {
            interval: Duration::from_secs(config.reminder_interval_secs),
            window,
        }
    }
}

/// Periodically flags stored events that start within the due window
pub struct ReminderScanner {
    store: Arc<dyn EventStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn ReminderNotifier>,
    settings: ReminderSettings,
}

impl ReminderScanner {
    pub fn new(
        store: Arc<dyn EventStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn ReminderNotifier>,
        settings: ReminderSettings,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
            settings,
        }
    }

    /// Run a single scan over the stored (unexpanded) events.
    ///
    /// Returns the reminders that were emitted. A store failure skips the
    /// whole tick and events with unparseable start times are never due.
    pub async fn tick(&self) -> Vec<Reminder> {
        let events = match self.store.load().await {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to load events for reminder scan: {}", e);
                return Vec::new();
            }
        };

        let now = self.clock.now();
        let reminders: Vec<Reminder> = events
            .iter()
            .filter(|event| starts_within(&event.start_time, &now, self.settings.window))
            .map(Reminder::from)
            .collect();

        for reminder in &reminders {
            if let Err(e) = self.notifier.notify(reminder).await {
                warn!("Failed to send reminder for event {}: {}", reminder.event_id, e);
            }
        }

        debug!("Reminder scan at {} flagged {} event(s)", now, reminders.len());
        reminders
    }

    /// Scan immediately, then once per interval until `shutdown` is cancelled
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            "Reminder scanner started (interval {:?}, window {} min)",
            self.settings.interval,
            self.settings.window.num_minutes()
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = self.tick() => {}
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(self.settings.interval) => {}
            }
        }

        info!("Reminder scanner stopped");
    }

    /// Start the scan loop on the current runtime
    pub fn spawn(self) -> ReminderHandle {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let task = tokio::spawn(async move {
            self.run(token).await;
        });

        ReminderHandle { shutdown, task }
    }
}

/// Owner of a running scanner task
#[derive(Debug)]
pub struct ReminderHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl ReminderHandle {
    /// Whether the scan loop is still running
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the scan loop and wait for it to exit
    pub async fn stop(self) -> SchedulerResult<()> {
        self.shutdown.cancel();
        self.task
            .await
            .map_err(|e| component_error(&format!("Reminder scanner task failed: {}", e)))
    }
}
