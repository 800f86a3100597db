use super::models::{Event, EventUpdate, NewEvent};
use super::recurrence::{expand, sort_by_start_time};
use crate::components::event_store::EventStore;
use crate::error::{not_found_error, validation_error, SchedulerResult};
use crate::utils::time::parse_timestamp;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const INVALID_DATETIME_MESSAGE: &str =
    "Invalid datetime format (use ISO e.g. 2025-06-28T19:00:00)";
pub const EMPTY_TITLE_MESSAGE: &str = "Title must not be empty";
pub const NOT_FOUND_MESSAGE: &str = "Event not found";

/// CRUD and search over the event store.
///
/// Each call loads the whole store and writes operations save it back in
/// full, so there is no state here beyond the store handle.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new event
    pub async fn create(&self, new_event: NewEvent) -> SchedulerResult<Event> {
        let (Some(title), Some(description), Some(start_time), Some(end_time)) = (
            new_event.title,
            new_event.description,
            new_event.start_time,
            new_event.end_time,
        ) else {
            return Err(validation_error(MISSING_FIELDS_MESSAGE));
        };

        if title.trim().is_empty() {
            return Err(validation_error(EMPTY_TITLE_MESSAGE));
        }

        if parse_timestamp(&start_time).is_none() || parse_timestamp(&end_time).is_none() {
            return Err(validation_error(INVALID_DATETIME_MESSAGE));
        }

        let event = Event {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            start_time,
            end_time,
            recurring: new_event.recurring,
        };

        let mut events = self.store.load().await?;
        events.push(event.clone());
        self.store.save(&events).await?;

        info!("Created event {} ({})", event.id, event.title);
        Ok(event)
    }

    /// Fetch a single base event
    pub async fn get(&self, id: &str) -> SchedulerResult<Event> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|event| event.id == id)
            .ok_or_else(|| not_found_error(NOT_FOUND_MESSAGE))
    }

    /// All base events plus their recurring occurrences, sorted by start time
    pub async fn list(&self) -> SchedulerResult<Vec<Event>> {
        let events = self.store.load().await?;
        let mut expanded = expand(events);
        sort_by_start_time(&mut expanded);
        Ok(expanded)
    }

    /// Replace the supplied fields of an event; timestamps are not re-validated
    pub async fn update(&self, id: &str, update: EventUpdate) -> SchedulerResult<Event> {
        let mut events = self.store.load().await?;

        let event = events
            .iter_mut()
            .find(|event| event.id == id)
            .ok_or_else(|| not_found_error(NOT_FOUND_MESSAGE))?;
        update.apply_to(event);
        let updated = event.clone();

        self.store.save(&events).await?;

        info!("Updated event {}", id);
        Ok(updated)
    }

    /// Remove an event
    pub async fn delete(&self, id: &str) -> SchedulerResult<()> {
        let events = self.store.load().await?;
        let before = events.len();

        let remaining: Vec<Event> = events.into_iter().filter(|event| event.id != id).collect();
        if remaining.len() == before {
            return Err(not_found_error(NOT_FOUND_MESSAGE));
        }

        self.store.save(&remaining).await?;

        info!("Deleted event {}", id);
        Ok(())
    }

    /// Case-insensitive substring search over base event titles and descriptions
    pub async fn search(&self, query: &str) -> SchedulerResult<Vec<Event>> {
        let needle = query.to_lowercase();

        Ok(self
            .store
            .load()
            .await?
            .into_iter()
            .filter(|event| {
                event.title.to_lowercase().contains(&needle)
                    || event.description.to_lowercase().contains(&needle)
            })
            .collect())
    }
}
