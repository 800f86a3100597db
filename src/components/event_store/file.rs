use super::EventStore;
use crate::components::events::Event;
use crate::error::{store_error, SchedulerResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

/// Stores all events as one pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn initialise(&self) -> SchedulerResult<()> {
        let exists = fs::try_exists(&self.path).await.map_err(|e| {
            store_error(&format!("Failed to inspect {}: {}", self.path.display(), e))
        })?;

        if !exists {
            info!("Creating empty event file at {}", self.path.display());
            self.save(&[]).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn load(&self) -> SchedulerResult<Vec<Event>> {
        self.initialise().await?;

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            store_error(&format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let events: Vec<Event> = serde_json::from_str(&content).map_err(|e| {
            store_error(&format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        Ok(events)
    }

    async fn save(&self, events: &[Event]) -> SchedulerResult<()> {
        let content = serde_json::to_string_pretty(events)?;

        fs::write(&self.path, content).await.map_err(|e| {
            store_error(&format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}
