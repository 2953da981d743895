// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the Pickup Hoops API.
// It can be used by both the main API server (for Swagger UI)
// and the export-openapi binary (for static spec generation).

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use hoops_core::{Event, EventParticipant, ParticipantStatus, RosterSummary};
use utoipa::OpenApi;

/// OpenAPI documentation for the Pickup Hoops API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::create_event,
        api::events::create_weekly_events,
        api::events::list_events,
        api::events::get_active_event,
        api::events::list_upcoming_events,
        api::events::get_event,
        api::events::set_event_active,
        api::events::delete_event,
        api::participants::add_participant,
        api::participants::list_participants,
        api::participants::get_roster,
        api::participants::back_out,
    ),
    components(
        schemas(
            Event, EventParticipant, ParticipantStatus, RosterSummary,
            ErrorResponse,
            api::events::CreateEventRequest,
            api::events::CreateWeeklyEventsRequest,
            api::events::SetActiveRequest,
            api::events::DeleteEventRequest,
            api::events::UpcomingQuery,
            api::participants::SignupRequest,
            api::participants::BackOutRequest,
            api::participants::ParticipantsQuery,
            ListResponse<Event>,
            ListResponse<EventParticipant>,
        )
    ),
    tags(
        (name = "events", description = "Event scheduling endpoints"),
        (name = "participants", description = "Signup and back-out endpoints")
    ),
    info(
        title = "Pickup Hoops API",
        version = "0.1.0",
        description = "API for scheduling pickup basketball runs and managing signups",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_routes() {
        let json: serde_json::Value = serde_json::from_str(&ApiDoc::to_json().unwrap()).unwrap();
        let paths = json["paths"].as_object().unwrap();
        assert!(paths.contains_key("/v1/events"));
        assert!(paths.contains_key("/v1/events/{event_id}/back-out"));
        assert!(paths.contains_key("/v1/events/{event_id}/delete"));
    }
}
