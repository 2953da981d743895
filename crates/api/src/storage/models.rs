// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use hoops_core::{Event, EventParticipant, ParticipantStatus};
use sqlx::FromRow;

use super::store::StoreError;

// ============================================
// Events
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub creator_phone_number: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            event_date: row.event_date,
            location: row.location,
            max_participants: row.max_participants,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_participants: i32,
    pub creator_phone_number: Option<String>,
}

// ============================================
// Participants
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub payment_amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventParticipantRow {
    pub id: i64,
    pub event_id: i64,
    pub participant_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub event_id: i64,
    pub name: String,
    pub phone_number: String,
    pub payment_amount: f64,
    pub status: ParticipantStatus,
}

/// Join row with participant identity fields
#[derive(Debug, Clone, FromRow)]
pub struct RosterRow {
    pub id: i64,
    pub event_id: i64,
    pub participant_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub phone_number: String,
    pub payment_amount: f64,
}

impl RosterRow {
    pub fn from_parts(join: &EventParticipantRow, participant: &ParticipantRow) -> Self {
        Self {
            id: join.id,
            event_id: join.event_id,
            participant_id: join.participant_id,
            status: join.status.clone(),
            created_at: join.created_at,
            name: participant.name.clone(),
            phone_number: participant.phone_number.clone(),
            payment_amount: participant.payment_amount,
        }
    }
}

impl TryFrom<RosterRow> for EventParticipant {
    type Error = StoreError;

    fn try_from(row: RosterRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        Ok(EventParticipant {
            id: row.id,
            event_id: row.event_id,
            participant_id: row.participant_id,
            status,
            created_at: row.created_at,
            name: row.name,
            phone_number: row.phone_number,
            payment_amount: row.payment_amount,
        })
    }
}

/// Registration of a phone number for one event, as seen by back-out
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub participant_id: i64,
    pub join_id: i64,
    pub participant_status: String,
    pub join_status: String,
    pub created_at: DateTime<Utc>,
}

/// Parse a stored status column, rejecting anything but `in`/`out`
pub(crate) fn parse_status(value: &str) -> Result<ParticipantStatus, StoreError> {
    ParticipantStatus::parse(value)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown participant status: {value}")))
}
