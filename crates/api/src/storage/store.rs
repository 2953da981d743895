//! HoopsStore trait definition
//!
//! The data-access interface behind every service. Each method is one unit
//! of work: implementations run multi-statement methods inside a single
//! transaction (Postgres) or a single write-lock section (memory).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hoops_core::{phone, Event, EventParticipant, ParticipantStatus};

use super::models::{parse_status, NewEvent, NewParticipant, RegistrationRow};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Stored value could not be mapped to a domain type
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Result of a back-out attempt
#[derive(Debug, Clone, PartialEq)]
pub enum BackOutOutcome {
    /// The registration moved from `in` to `out`
    BackedOut(EventParticipant),
    /// Every matching registration is already `out`
    AlreadyOut,
    /// The number never signed up for the event
    NotSignedUp,
    /// Registrations exist but none is active and they are not cleanly `out`
    NoActiveRegistration,
}

/// Result of a delete attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Event and its registrations were removed
    Deleted { removed_registrations: u64 },
    /// No event with that id
    NotFound,
    /// Requester phone does not match the creator phone
    Unauthorized,
}

/// What back-out should do given the registrations matching a phone number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutDecision {
    /// Move this registration to `out`
    BackOut { participant_id: i64, join_id: i64 },
    AlreadyOut,
    NotSignedUp,
    NoActiveRegistration,
}

/// Decide the back-out result for the registrations of one phone number on
/// one event. The most recent active registration wins. A status value that
/// is neither `in` nor `out` is reported as corrupt.
pub fn resolve_back_out(registrations: &[RegistrationRow]) -> Result<BackOutDecision, StoreError> {
    let mut active: Option<&RegistrationRow> = None;
    let mut cleanly_out = false;

    for r in registrations {
        let participant = parse_status(&r.participant_status)?;
        let join = parse_status(&r.join_status)?;

        match participant {
            ParticipantStatus::In => {
                if active.map_or(true, |a| (r.created_at, r.join_id) > (a.created_at, a.join_id)) {
                    active = Some(r);
                }
            }
            ParticipantStatus::Out => cleanly_out |= join == ParticipantStatus::Out,
        }
    }

    let decision = match active {
        Some(r) => BackOutDecision::BackOut {
            participant_id: r.participant_id,
            join_id: r.join_id,
        },
        None if registrations.is_empty() => BackOutDecision::NotSignedUp,
        None if cleanly_out => BackOutDecision::AlreadyOut,
        None => BackOutDecision::NoActiveRegistration,
    };
    Ok(decision)
}

/// Whether `requester` may act as the creator of an event whose stored
/// creator phone is `creator`. Events without a creator phone have no owner.
pub fn creator_authorizes(creator: Option<&str>, requester: &str) -> bool {
    creator.is_some_and(|stored| phone::matches(requester, stored))
}

/// Data-access interface for events and signups
#[async_trait]
pub trait HoopsStore: Send + Sync + 'static {
    // =========================================================================
    // Event reads
    // =========================================================================

    /// Get one event by id
    async fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError>;

    /// Earliest active event
    async fn get_active_event(&self) -> Result<Option<Event>, StoreError>;

    /// Events at or after `since`, soonest first, at most `limit`
    async fn list_upcoming_events(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Event>, StoreError>;

    /// All events, soonest first
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    // =========================================================================
    // Event mutations
    // =========================================================================

    /// Insert all events or none
    async fn create_events(&self, events: Vec<NewEvent>) -> Result<Vec<Event>, StoreError>;

    /// Set the active flag, None if the event does not exist
    async fn set_event_active(
        &self,
        event_id: i64,
        is_active: bool,
    ) -> Result<Option<Event>, StoreError>;

    /// Delete an event and its registrations if `requester_phone` matches the
    /// creator phone. Participants left without a registration are removed.
    async fn delete_event(
        &self,
        event_id: i64,
        requester_phone: &str,
    ) -> Result<DeleteOutcome, StoreError>;

    // =========================================================================
    // Signups
    // =========================================================================

    /// Insert a participant and its registration, None if the event does not exist
    async fn add_participant(
        &self,
        input: NewParticipant,
    ) -> Result<Option<EventParticipant>, StoreError>;

    /// Registrations of an event with identity fields, newest first
    async fn list_event_participants(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventParticipant>, StoreError>;

    /// Back out the registration of `normalized_phone` (digits only) for an event
    async fn back_out(
        &self,
        event_id: i64,
        normalized_phone: &str,
    ) -> Result<BackOutOutcome, StoreError>;
}
