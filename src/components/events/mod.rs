pub mod models;
pub mod recurrence;
mod service;

pub use models::{Event, EventUpdate, NewEvent};
pub use recurrence::{expand, OCCURRENCE_COUNT};
pub use service::{
    EventService, EMPTY_TITLE_MESSAGE, INVALID_DATETIME_MESSAGE, MISSING_FIELDS_MESSAGE,
    NOT_FOUND_MESSAGE,
};
