use serde::{Deserialize, Deserializer, Serialize};

/// A stored calendar event.
///
/// Timestamps are kept as the strings the client sent so that records
/// written by an update without validation still load and list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub recurring: Option<String>,
}

impl Event {
    /// The recurrence rule to expand; any non-empty tag repeats
    pub fn recurrence_rule(&self) -> Option<&str> {
        self.recurring.as_deref().filter(|rule| !rule.is_empty())
    }
}

/// Payload for creating an event; presence is checked by the service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub recurring: Option<String>,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// `Some(None)` clears the rule, `None` leaves it untouched
    #[serde(default, deserialize_with = "deserialize_present")]
    pub recurring: Option<Option<String>>,
}

impl EventUpdate {
    /// Apply the supplied fields to `event`
    pub fn apply_to(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = end_time;
        }
        if let Some(recurring) = self.recurring {
            event.recurring = recurring;
        }
    }
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
