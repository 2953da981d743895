// Pickup Hoops domain types
//
// DB-agnostic entity types shared by the storage layer and the HTTP API:
// - Event: a scheduled run with a capacity
// - EventParticipant: one signup as listed for its event
// - phone: normalization used for every identity comparison
// - schedule: weekly recurrence expansion
// - error: user-facing action errors

pub mod error;
pub mod event;
pub mod participant;
pub mod phone;
pub mod schedule;

pub use error::ActionError;
pub use event::Event;
pub use participant::{EventParticipant, ParticipantStatus, RosterSummary};
pub use schedule::{weekly_dates, MAX_WEEKS};
