// Event service for business logic

use chrono::Utc;
use hoops_core::{event::upcoming_cutoff, weekly_dates, ActionError, Event};
use std::sync::Arc;

use super::store_failure;
use crate::api::events::{CreateEventRequest, CreateWeeklyEventsRequest};
use crate::api::validation::{
    require_phone_digits, validate_event_fields, validate_weeks, DELETE_PHONE_MESSAGE,
};
use crate::storage::{DeleteOutcome, HoopsStore, NewEvent};

/// Largest page a caller can ask for on the upcoming list.
pub const MAX_UPCOMING_LIMIT: i64 = 100;

pub const UNAUTHORIZED_DELETE_MESSAGE: &str =
    "You are not authorized to delete this event. The phone number does not match the event creator.";

pub struct EventService {
    store: Arc<dyn HoopsStore>,
    upcoming_limit: i64,
}

impl EventService {
    pub fn new(store: Arc<dyn HoopsStore>, upcoming_limit: i64) -> Self {
        Self {
            store,
            upcoming_limit,
        }
    }

    pub async fn get(&self, event_id: i64) -> Result<Event, ActionError> {
        self.store
            .get_event(event_id)
            .await
            .map_err(|e| store_failure("Failed to load event", e))?
            .ok_or_else(ActionError::event_not_found)
    }

    /// The event shown on the home page: the earliest active one
    pub async fn active(&self) -> Result<Option<Event>, ActionError> {
        self.store
            .get_active_event()
            .await
            .map_err(|e| store_failure("Failed to load active event", e))
    }

    /// Events from the last 24 hours onwards, soonest first
    pub async fn upcoming(&self, limit: Option<i64>) -> Result<Vec<Event>, ActionError> {
        let limit = limit
            .unwrap_or(self.upcoming_limit)
            .clamp(1, MAX_UPCOMING_LIMIT);
        self.store
            .list_upcoming_events(upcoming_cutoff(Utc::now()), limit)
            .await
            .map_err(|e| store_failure("Failed to load events", e))
    }

    pub async fn list(&self) -> Result<Vec<Event>, ActionError> {
        self.store
            .list_events()
            .await
            .map_err(|e| store_failure("Failed to load events", e))
    }

    pub async fn create(&self, req: CreateEventRequest) -> Result<Event, ActionError> {
        let (location, creator) =
            validate_event_fields(&req.location, req.max_participants, &req.creator_phone_number)?;

        let input = NewEvent {
            event_date: req.event_date,
            location,
            max_participants: req.max_participants,
            creator_phone_number: Some(creator),
        };

        let event = self
            .store
            .create_events(vec![input])
            .await
            .map_err(|e| store_failure("Failed to create event", e))?
            .into_iter()
            .next()
            .ok_or_else(|| ActionError::failed("Failed to create event"))?;

        tracing::info!(event_id = event.id, event_date = %event.event_date, "Event created");
        Ok(event)
    }

    /// Create one event per week starting at `start_date`; all or nothing
    pub async fn create_weekly(
        &self,
        req: CreateWeeklyEventsRequest,
    ) -> Result<Vec<Event>, ActionError> {
        let (location, creator) =
            validate_event_fields(&req.location, req.max_participants, &req.creator_phone_number)?;
        validate_weeks(req.weeks_to_generate)?;

        let inputs: Vec<NewEvent> = weekly_dates(req.start_date, req.weeks_to_generate)
            .into_iter()
            .map(|event_date| NewEvent {
                event_date,
                location: location.clone(),
                max_participants: req.max_participants,
                creator_phone_number: Some(creator.clone()),
            })
            .collect();

        let events = self
            .store
            .create_events(inputs)
            .await
            .map_err(|e| store_failure("Failed to create weekly events", e))?;

        tracing::info!(
            weeks = events.len(),
            first_event_id = events.first().map(|e| e.id),
            "Weekly events created"
        );
        Ok(events)
    }

    pub async fn set_active(&self, event_id: i64, is_active: bool) -> Result<Event, ActionError> {
        let event = self
            .store
            .set_event_active(event_id, is_active)
            .await
            .map_err(|e| store_failure("Failed to update event", e))?
            .ok_or_else(ActionError::event_not_found)?;

        tracing::info!(event_id, is_active, "Event active flag updated");
        Ok(event)
    }

    /// Delete an event if `phone_number` matches its creator phone
    pub async fn delete(&self, event_id: i64, phone_number: &str) -> Result<(), ActionError> {
        let digits = require_phone_digits(phone_number, DELETE_PHONE_MESSAGE)?;

        let outcome = self
            .store
            .delete_event(event_id, &digits)
            .await
            .map_err(|e| store_failure("Failed to delete event", e))?;

        match outcome {
            DeleteOutcome::Deleted {
                removed_registrations,
            } => {
                tracing::info!(event_id, removed_registrations, "Event deleted");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(ActionError::event_not_found()),
            DeleteOutcome::Unauthorized => {
                tracing::warn!(event_id, "Event deletion rejected: creator phone mismatch");
                Err(ActionError::unauthorized(UNAUTHORIZED_DELETE_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use chrono::{DateTime, Duration, TimeZone};

    fn service() -> EventService {
        EventService::new(Arc::new(InMemoryStore::new()), 5)
    }

    fn create_request(date: DateTime<Utc>) -> CreateEventRequest {
        CreateEventRequest {
            event_date: date,
            location: "Lincoln Park".to_string(),
            max_participants: 10,
            creator_phone_number: "(555) 999-0000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_event_is_active() {
        let svc = service();
        let date = Utc::now() + Duration::days(2);

        let event = svc.create(create_request(date)).await.unwrap();

        assert!(event.is_active);
        assert_eq!(event.event_date, date);
        assert_eq!(svc.get(event.id).await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_create_requires_creator_phone() {
        let svc = service();
        let mut req = create_request(Utc::now());
        req.creator_phone_number = "  ".to_string();

        let err = svc.create(req).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_weekly_creates_one_event_per_week() {
        let svc = service();
        let start = Utc.with_ymd_and_hms(2030, 6, 4, 18, 30, 0).unwrap();

        let events = svc
            .create_weekly(CreateWeeklyEventsRequest {
                start_date: start,
                location: "Lincoln Park".to_string(),
                max_participants: 12,
                weeks_to_generate: 4,
                creator_phone_number: "5559990000".to_string(),
            })
            .await
            .unwrap();

        let dates: Vec<_> = events.iter().map(|e| e.event_date).collect();
        assert_eq!(
            dates,
            vec![
                start,
                start + Duration::days(7),
                start + Duration::days(14),
                start + Duration::days(21),
            ]
        );
        assert!(events.iter().all(|e| e.is_active));
    }

    #[tokio::test]
    async fn test_weekly_invalid_weeks_writes_nothing() {
        let svc = service();

        let err = svc
            .create_weekly(CreateWeeklyEventsRequest {
                start_date: Utc::now(),
                location: "Lincoln Park".to_string(),
                max_participants: 12,
                weeks_to_generate: 0,
                creator_phone_number: "5559990000".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::Validation(_)));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_matching_phone() {
        let svc = service();
        let event = svc.create(create_request(Utc::now())).await.unwrap();

        let err = svc.delete(event.id, "555-999-0001").await.unwrap_err();
        assert_eq!(err, ActionError::unauthorized(UNAUTHORIZED_DELETE_MESSAGE));
        assert!(svc.get(event.id).await.is_ok());

        svc.delete(event.id, "555.999.0000").await.unwrap();
        assert_eq!(svc.get(event.id).await.unwrap_err(), ActionError::event_not_found());
    }

    #[tokio::test]
    async fn test_delete_long_number_is_unauthorized() {
        let svc = service();
        let event = svc.create(create_request(Utc::now())).await.unwrap();

        let err = svc.delete(event.id, "1 (555) 999-0000").await.unwrap_err();
        assert_eq!(err, ActionError::unauthorized(UNAUTHORIZED_DELETE_MESSAGE));
        assert!(svc.get(event.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_rejects_empty_phone() {
        let svc = service();
        let event = svc.create(create_request(Utc::now())).await.unwrap();

        let err = svc.delete(event.id, "").await.unwrap_err();
        assert_eq!(err, ActionError::validation(DELETE_PHONE_MESSAGE));
    }

    #[tokio::test]
    async fn test_delete_unknown_event() {
        let svc = service();
        let err = svc.delete(404, "5559990000").await.unwrap_err();
        assert_eq!(err, ActionError::event_not_found());
    }

    #[tokio::test]
    async fn test_upcoming_skips_old_events_and_honors_limit() {
        let svc = service();
        let now = Utc::now();
        svc.create(create_request(now - Duration::days(3))).await.unwrap();
        for day in 1..=7 {
            svc.create(create_request(now + Duration::days(day)))
                .await
                .unwrap();
        }

        let upcoming = svc.upcoming(None).await.unwrap();
        assert_eq!(upcoming.len(), 5);
        assert!(upcoming.iter().all(|e| e.is_upcoming(now)));
        assert!(upcoming.windows(2).all(|w| w[0].event_date <= w[1].event_date));

        let two = svc.upcoming(Some(2)).await.unwrap();
        assert_eq!(two.len(), 2);
    }

    #[tokio::test]
    async fn test_set_active() {
        let svc = service();
        let event = svc.create(create_request(Utc::now())).await.unwrap();

        let updated = svc.set_active(event.id, false).await.unwrap();
        assert!(!updated.is_active);
        assert!(svc.active().await.unwrap().is_none());

        let err = svc.set_active(999, true).await.unwrap_err();
        assert_eq!(err, ActionError::event_not_found());
    }
}
