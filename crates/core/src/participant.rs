// Participant domain types
//
// A participant row is one signup submission. It is linked to exactly one
// event through an event_participants row whose status mirrors its own.
// EventParticipant is the read model: the join row plus identity fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Signup status.
/// - `in`: the player is coming
/// - `out`: the player is not coming (or backed out)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    /// The player is coming.
    In,
    /// The player is not coming.
    Out,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::In => "in",
            ParticipantStatus::Out => "out",
        }
    }

    /// Parse a stored status value. Returns None for anything but `in`/`out`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(ParticipantStatus::In),
            "out" => Some(ParticipantStatus::Out),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A participant as listed for one event: the join row plus identity fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventParticipant {
    /// ID of the event_participants row.
    pub id: i64,
    pub event_id: i64,
    pub participant_id: i64,
    /// Status on the join row.
    pub status: ParticipantStatus,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub phone_number: String,
    pub payment_amount: f64,
}

/// Confirmed players for one event with capacity bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RosterSummary {
    pub event_id: i64,
    /// Participants with status `in`, newest first.
    pub players: Vec<EventParticipant>,
    /// Number of confirmed players.
    pub total_players: usize,
    /// Capacity of the event.
    pub max_participants: i32,
    /// Open spots, zero when the event is full or over capacity.
    pub spots_remaining: usize,
}

impl RosterSummary {
    /// Build a summary from the full participant list of an event.
    pub fn from_participants(
        event_id: i64,
        max_participants: i32,
        participants: Vec<EventParticipant>,
    ) -> Self {
        let players: Vec<EventParticipant> = participants
            .into_iter()
            .filter(|p| p.status == ParticipantStatus::In)
            .collect();
        let total_players = players.len();
        let capacity = usize::try_from(max_participants).unwrap_or(0);

        Self {
            event_id,
            players,
            total_players,
            max_participants,
            spots_remaining: capacity.saturating_sub(total_players),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, status: ParticipantStatus) -> EventParticipant {
        EventParticipant {
            id,
            event_id: 7,
            participant_id: id,
            status,
            created_at: Utc::now(),
            name: format!("Player {id}"),
            phone_number: "5550102020".to_string(),
            payment_amount: 0.0,
        }
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(ParticipantStatus::parse("in"), Some(ParticipantStatus::In));
        assert_eq!(ParticipantStatus::parse("out"), Some(ParticipantStatus::Out));
        assert_eq!(ParticipantStatus::parse("maybe"), None);
        assert_eq!(ParticipantStatus::In.to_string(), "in");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(ParticipantStatus::Out).unwrap();
        assert_eq!(json, "out");
    }

    #[test]
    fn test_roster_counts_only_confirmed() {
        let summary = RosterSummary::from_participants(
            7,
            10,
            vec![
                entry(1, ParticipantStatus::In),
                entry(2, ParticipantStatus::Out),
                entry(3, ParticipantStatus::In),
            ],
        );

        assert_eq!(summary.total_players, 2);
        assert_eq!(summary.spots_remaining, 8);
        assert!(summary.players.iter().all(|p| p.status == ParticipantStatus::In));
    }

    #[test]
    fn test_roster_over_capacity_has_no_spots() {
        let summary = RosterSummary::from_participants(
            7,
            1,
            vec![
                entry(1, ParticipantStatus::In),
                entry(2, ParticipantStatus::In),
            ],
        );

        assert_eq!(summary.total_players, 2);
        assert_eq!(summary.spots_remaining, 0);
    }
}
