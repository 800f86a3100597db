use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::AppState;
use crate::components::events::{Event, EventUpdate, NewEvent};
use crate::error::{validation_error, SchedulerResult};

/// Handler for the liveness message
pub async fn home_handler() -> Json<Value> {
    Json(json!({ "message": "Event Scheduler API is running!" }))
}

/// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Unwrap a JSON body, reporting malformed payloads as validation errors
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> SchedulerResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        let reason = rejection.body_text();
        warn!("Rejected request body: {}", reason);
        validation_error(&format!("Invalid request body: {}", reason))
    })
}

/// GET /events - all events with recurring occurrences, sorted by start time
pub async fn list_events_handler(
    State(state): State<AppState>,
) -> SchedulerResult<Json<Vec<Event>>> {
    Ok(Json(state.service.list().await?))
}

/// POST /events - create a new event
pub async fn create_event_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> SchedulerResult<(StatusCode, Json<Event>)> {
    let new_event = json_body(payload)?;
    let event = state.service.create(new_event).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events/{id} - fetch a stored event
pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> SchedulerResult<Json<Event>> {
    Ok(Json(state.service.get(&id).await?))
}

/// PUT /events/{id} - replace the supplied fields
pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EventUpdate>, JsonRejection>,
) -> SchedulerResult<Json<Event>> {
    let update = json_body(payload)?;
    Ok(Json(state.service.update(&id, update).await?))
}

/// DELETE /events/{id} - remove a stored event
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> SchedulerResult<Json<Value>> {
    state.service.delete(&id).await?;
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /events/search?q= - substring search over stored events
pub async fn search_events_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> SchedulerResult<Json<Vec<Event>>> {
    Ok(Json(state.service.search(&params.q).await?))
}
