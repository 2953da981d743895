// Participant service for signups and back-outs

use hoops_core::{phone, ActionError, EventParticipant, ParticipantStatus, RosterSummary};
use std::sync::Arc;

use super::store_failure;
use crate::api::participants::SignupRequest;
use crate::api::validation::{
    require_phone_digits, validate_name, validate_payment_amount, validate_phone_length,
    ANONYMOUS_NAME, INVALID_PHONE_MESSAGE, PHONE_TOO_LONG_MESSAGE, REQUIRED_FIELDS_MESSAGE,
};
use crate::storage::{BackOutOutcome, HoopsStore, NewParticipant};

pub struct ParticipantService {
    store: Arc<dyn HoopsStore>,
}

impl ParticipantService {
    pub fn new(store: Arc<dyn HoopsStore>) -> Self {
        Self { store }
    }

    /// Record a signup for an event.
    ///
    /// `in` needs a name and a phone number. `out` may leave both blank.
    pub async fn add(
        &self,
        event_id: i64,
        req: SignupRequest,
    ) -> Result<EventParticipant, ActionError> {
        let phone_number = req.phone_number.as_deref().unwrap_or("").trim();

        // Digit limit applies to both statuses and runs before anything else
        validate_phone_length(phone_number, PHONE_TOO_LONG_MESSAGE)?;

        let name = validate_name(req.name.as_deref())?;
        let payment_amount = validate_payment_amount(req.payment_amount)?;

        let name = match req.status {
            ParticipantStatus::In => {
                if phone::digit_count(phone_number) == 0 {
                    return Err(ActionError::validation(REQUIRED_FIELDS_MESSAGE));
                }
                name.ok_or_else(|| ActionError::validation(REQUIRED_FIELDS_MESSAGE))?
            }
            ParticipantStatus::Out => name.unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
        };

        let input = NewParticipant {
            event_id,
            name,
            phone_number: phone_number.to_string(),
            payment_amount,
            status: req.status,
        };

        let entry = self
            .store
            .add_participant(input)
            .await
            .map_err(|e| store_failure("Failed to add participant", e))?
            .ok_or_else(ActionError::event_not_found)?;

        tracing::info!(
            event_id,
            participant_id = entry.participant_id,
            status = %entry.status,
            "Participant added"
        );
        Ok(entry)
    }

    /// Registrations of an event, newest first, optionally by status
    pub async fn list(
        &self,
        event_id: i64,
        status: Option<ParticipantStatus>,
    ) -> Result<Vec<EventParticipant>, ActionError> {
        let mut participants = self
            .store
            .list_event_participants(event_id)
            .await
            .map_err(|e| store_failure("Failed to load participants", e))?;

        if let Some(status) = status {
            participants.retain(|p| p.status == status);
        }
        Ok(participants)
    }

    /// Confirmed players with capacity bookkeeping
    pub async fn roster(&self, event_id: i64) -> Result<RosterSummary, ActionError> {
        let event = self
            .store
            .get_event(event_id)
            .await
            .map_err(|e| store_failure("Failed to load event", e))?
            .ok_or_else(ActionError::event_not_found)?;

        let participants = self
            .store
            .list_event_participants(event_id)
            .await
            .map_err(|e| store_failure("Failed to load participants", e))?;

        Ok(RosterSummary::from_participants(
            event.id,
            event.max_participants,
            participants,
        ))
    }

    /// Move the registration of `phone_number` on an event to `out`
    pub async fn back_out(
        &self,
        event_id: i64,
        phone_number: &str,
    ) -> Result<EventParticipant, ActionError> {
        let digits = require_phone_digits(phone_number, INVALID_PHONE_MESSAGE)?;

        let outcome = self
            .store
            .back_out(event_id, &digits)
            .await
            .map_err(|e| store_failure("Failed to back out", e))?;

        match outcome {
            BackOutOutcome::BackedOut(entry) => {
                tracing::info!(
                    event_id,
                    participant_id = entry.participant_id,
                    "Participant backed out"
                );
                Ok(entry)
            }
            BackOutOutcome::AlreadyOut => Err(ActionError::AlreadyBackedOut),
            BackOutOutcome::NotSignedUp => Err(ActionError::NotSignedUp),
            BackOutOutcome::NoActiveRegistration => Err(ActionError::NoActiveRegistration),
        }
    }
}
