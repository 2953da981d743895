// Event domain types
//
// An Event is one scheduled pickup run. The creator phone number that
// authorizes deletion stays in the storage layer and is never serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A scheduled pickup basketball session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    /// Unique identifier for the event.
    pub id: i64,
    /// When the run starts.
    pub event_date: DateTime<Utc>,
    /// Where the run takes place.
    #[cfg_attr(feature = "openapi", schema(example = "Lincoln Park, Court 2"))]
    pub location: String,
    /// Number of players the court can take. Shown to players, not enforced.
    pub max_participants: i32,
    /// Whether the event is open for signups.
    pub is_active: bool,
    /// Timestamp when the event was created.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Whether the event still shows in the upcoming list at `now`.
    /// Runs from the last 24 hours stay listed so a game in progress is visible.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.event_date >= upcoming_cutoff(now)
    }
}

/// Earliest `event_date` still considered upcoming at `now`.
pub fn upcoming_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - chrono::Duration::hours(24)
}
