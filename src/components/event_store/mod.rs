//! Whole-set persistence for event records.
//!
//! Every backend reads and writes the complete list. There is no locking
//! between a `load` and the following `save`, so concurrent writers race
//! and the last one wins.

mod file;
#[cfg(feature = "redis-store")]
mod redis_store;

pub use file::JsonFileStore;
#[cfg(feature = "redis-store")]
pub use redis_store::{RedisStore, RedisStoreActor, EVENTS_KEY};

use crate::components::events::Event;
use crate::error::SchedulerResult;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Storage for the full set of base events
#[async_trait]
pub trait EventStore: Send + Sync + 'static {
    /// Load every stored event; an uninitialised store yields an empty set
    async fn load(&self) -> SchedulerResult<Vec<Event>>;

    /// Replace the stored set with `events`
    async fn save(&self, events: &[Event]) -> SchedulerResult<()>;

    /// Release any background resources held by the store
    async fn shutdown(&self) -> SchedulerResult<()> {
        Ok(())
    }
}

/// In-memory implementation of the store (for testing)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    events: RwLock<Vec<Event>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `events`
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn load(&self) -> SchedulerResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events.clone())
    }

    async fn save(&self, events: &[Event]) -> SchedulerResult<()> {
        let mut stored = self.events.write().await;
        *stored = events.to_vec();
        Ok(())
    }
}
