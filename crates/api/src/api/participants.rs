// Signup HTTP routes
//
// Players sign up as `in` or `out` for an event and back out by phone number.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use hoops_core::{EventParticipant, ParticipantStatus, RosterSummary};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::{ApiJson, ApiResult, ErrorResponse, ListResponse};
use crate::services::ParticipantService;
use crate::storage::HoopsStore;

/// Request to sign up for an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Player name. Required for `in`, defaults to "Anonymous" for `out`.
    #[serde(default)]
    #[schema(example = "Alex")]
    pub name: Option<String>,
    /// Phone number, at most 10 digits. Required for `in`.
    #[serde(default)]
    #[schema(example = "(555) 010-2020")]
    pub phone_number: Option<String>,
    /// Whether the player is coming.
    pub status: ParticipantStatus,
    /// Amount paid toward the run. Defaults to 0.
    #[serde(default)]
    #[schema(example = 5.0)]
    pub payment_amount: Option<f64>,
}

/// Request to back out of an event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BackOutRequest {
    /// Phone number used to sign up.
    #[serde(default)]
    #[schema(example = "555-010-2020")]
    pub phone_number: String,
}

/// Query parameters for the participant list
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ParticipantsQuery {
    /// Only return participants with this status.
    pub status: Option<ParticipantStatus>,
}

// ============================================
// App State and Routes
// ============================================

/// App state for signup routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ParticipantService>,
}

impl AppState {
    pub fn new(store: Arc<dyn HoopsStore>) -> Self {
        Self {
            service: Arc::new(ParticipantService::new(store)),
        }
    }
}

/// Create signup routes (nested under events)
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events/:event_id/participants",
            post(add_participant).get(list_participants),
        )
        .route("/v1/events/:event_id/roster", get(get_roster))
        .route("/v1/events/:event_id/back-out", post(back_out))
        .with_state(state)
}

// ============================================
// HTTP Handlers
// ============================================

/// POST /v1/events/{event_id}/participants - Sign up for an event
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/participants",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Signup recorded", body = EventParticipant),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn add_participant(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<EventParticipant>)> {
    let entry = state.service.add(event_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /v1/events/{event_id}/participants - List signups, newest first
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/participants",
    params(
        ("event_id" = i64, Path, description = "Event ID"),
        ParticipantsQuery
    ),
    responses(
        (status = 200, description = "Signups for the event", body = ListResponse<EventParticipant>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<ParticipantsQuery>,
) -> ApiResult<Json<ListResponse<EventParticipant>>> {
    let participants = state.service.list(event_id, query.status).await?;
    Ok(Json(ListResponse::new(participants)))
}

/// GET /v1/events/{event_id}/roster - Confirmed players and open spots
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}/roster",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Roster summary", body = RosterSummary),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn get_roster(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<Json<RosterSummary>> {
    let roster = state.service.roster(event_id).await?;
    Ok(Json(roster))
}

/// POST /v1/events/{event_id}/back-out - Switch a signup from `in` to `out`
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/back-out",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    request_body = BackOutRequest,
    responses(
        (status = 200, description = "Backed out", body = EventParticipant),
        (status = 400, description = "Invalid phone number", body = ErrorResponse),
        (status = 404, description = "Phone number not signed up for this event", body = ErrorResponse),
        (status = 409, description = "Already backed out", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "participants"
)]
pub async fn back_out(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    ApiJson(req): ApiJson<BackOutRequest>,
) -> ApiResult<Json<EventParticipant>> {
    let entry = state.service.back_out(event_id, &req.phone_number).await?;
    Ok(Json(entry))
}
