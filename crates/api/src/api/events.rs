// Event HTTP routes
//
// Scheduling, listing, activation and creator-authorized deletion of runs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use hoops_core::Event;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::{ApiJson, ApiResult, ErrorResponse, ListResponse};
use crate::services::EventService;
use crate::storage::HoopsStore;

/// Request to schedule a single event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// When the run starts (UTC).
    #[schema(example = "2030-06-04T18:30:00Z")]
    pub event_date: DateTime<Utc>,
    /// Where the run takes place.
    #[serde(default)]
    #[schema(example = "Lincoln Park, court 2")]
    pub location: String,
    /// Capacity of the run. Reported on the roster, not enforced.
    #[schema(example = 10)]
    pub max_participants: i32,
    /// Phone number of the organizer. Required later to delete the event.
    #[serde(default)]
    #[schema(example = "(555) 999-0000")]
    pub creator_phone_number: String,
}

/// Request to schedule a weekly series of events
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWeeklyEventsRequest {
    /// Date and time of the first run (UTC). Later runs follow every 7 days.
    #[schema(example = "2030-06-04T18:30:00Z")]
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    #[schema(example = "Lincoln Park, court 2")]
    pub location: String,
    #[schema(example = 10)]
    pub max_participants: i32,
    /// Number of weekly runs to create, between 1 and 52.
    #[schema(example = 4)]
    pub weeks_to_generate: u32,
    #[serde(default)]
    #[schema(example = "(555) 999-0000")]
    pub creator_phone_number: String,
}

/// Request to change whether an event is shown as active
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Request to delete an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteEventRequest {
    /// Must match the phone number the event was created with.
    #[serde(default)]
    #[schema(example = "555-999-0000")]
    pub phone_number: String,
}

/// Query parameters for the upcoming events list
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct UpcomingQuery {
    /// Maximum number of events to return (1-100). Defaults to the server setting.
    pub limit: Option<i64>,
}

// ============================================
// App State and Routes
// ============================================

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(store: Arc<dyn HoopsStore>, upcoming_limit: i64) -> Self {
        Self {
            service: Arc::new(EventService::new(store, upcoming_limit)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/active", get(get_active_event))
        .route("/v1/events/upcoming", get(list_upcoming_events))
        .route("/v1/events/weekly", post(create_weekly_events))
        .route("/v1/events/:event_id", get(get_event))
        .route("/v1/events/:event_id/active", put(set_event_active))
        .route("/v1/events/:event_id/delete", post(delete_event))
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// POST /v1/events - Schedule a single event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let event = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// POST /v1/events/weekly - Schedule one event per week
#[utoipa::path(
    post,
    path = "/v1/events/weekly",
    request_body = CreateWeeklyEventsRequest,
    responses(
        (status = 201, description = "Events created", body = ListResponse<Event>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_weekly_events(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateWeeklyEventsRequest>,
) -> ApiResult<(StatusCode, Json<ListResponse<Event>>)> {
    let events = state.service.create_weekly(req).await?;
    Ok((StatusCode::CREATED, Json(ListResponse::new(events))))
}

/// GET /v1/events - List all events, soonest first
#[utoipa::path(
    get,
    path = "/v1/events",
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Event>>> {
    let events = state.service.list().await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/active - Get the earliest active event
///
/// Returns `null` when no event is active.
#[utoipa::path(
    get,
    path = "/v1/events/active",
    responses(
        (status = 200, description = "Active event or null", body = Event),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_active_event(State(state): State<AppState>) -> ApiResult<Json<Option<Event>>> {
    let event = state.service.active().await?;
    Ok(Json(event))
}

/// GET /v1/events/upcoming - List events from the last day onwards
#[utoipa::path(
    get,
    path = "/v1/events/upcoming",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Upcoming events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_upcoming_events(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<Json<ListResponse<Event>>> {
    let events = state.service.upcoming(query.limit).await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<Event>> {
    let event = state.service.get(event_id).await?;
    Ok(Json(event))
}

/// PUT /v1/events/{event_id}/active - Show or hide an event
#[utoipa::path(
    put,
    path = "/v1/events/{event_id}/active",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn set_event_active(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    ApiJson(req): ApiJson<SetActiveRequest>,
) -> ApiResult<Json<Event>> {
    let event = state.service.set_active(event_id, req.is_active).await?;
    Ok(Json(event))
}

/// POST /v1/events/{event_id}/delete - Delete an event as its creator
///
/// The phone number travels in the body so it stays out of access logs.
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/delete",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    request_body = DeleteEventRequest,
    responses(
        (status = 204, description = "Event deleted"),
        (status = 400, description = "Missing phone number", body = ErrorResponse),
        (status = 403, description = "Phone number does not match the creator", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    ApiJson(req): ApiJson<DeleteEventRequest>,
) -> ApiResult<StatusCode> {
    state.service.delete(event_id, &req.phone_number).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_request_deserialize() {
        let json = r#"{
            "start_date": "2030-06-04T18:30:00Z",
            "location": "Lincoln Park",
            "max_participants": 12,
            "weeks_to_generate": 4,
            "creator_phone_number": "5559990000"
        }"#;
        let req: CreateWeeklyEventsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.weeks_to_generate, 4);
        assert_eq!(req.max_participants, 12);
    }

    #[test]
    fn test_missing_strings_default_to_empty() {
        let json = r#"{"event_date": "2030-06-04T18:30:00Z", "max_participants": 10}"#;
        let req: CreateEventRequest = serde_json::from_str(json).unwrap();
        assert!(req.location.is_empty());
        assert!(req.creator_phone_number.is_empty());

        let req: DeleteEventRequest = serde_json::from_str("{}").unwrap();
        assert!(req.phone_number.is_empty());
    }

    #[test]
    fn test_upcoming_query_limit_is_optional() {
        let query: UpcomingQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert!(query.limit.is_none());
    }
}
