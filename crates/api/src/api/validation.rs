// Input validation for event and signup APIs
//
// Messages are shown to the player as-is, so they say what to fix.

use hoops_core::{phone, schedule::MAX_WEEKS, ActionError};

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for a participant name.
pub const MAX_NAME_BYTES: usize = 200;

/// Maximum size for an event location.
pub const MAX_LOCATION_BYTES: usize = 500;

/// Name stored for `out` submissions that leave the name blank.
pub const ANONYMOUS_NAME: &str = "Anonymous";

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill out all required fields";
pub const REQUIRED_EVENT_FIELDS_MESSAGE: &str =
    "Please fill out all required fields, including your phone number.";
pub const PHONE_TOO_LONG_MESSAGE: &str = "Phone number should not exceed 10 digits";
pub const CREATOR_PHONE_TOO_LONG_MESSAGE: &str = "Your phone number should not exceed 10 digits";
pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const DELETE_PHONE_MESSAGE: &str =
    "Please enter a valid phone number to authorize deletion.";

// =============================================================================
// Validation Functions
// =============================================================================

/// Reject phone numbers with more digits than allowed
pub fn validate_phone_length(raw: &str, message: &str) -> Result<(), ActionError> {
    if phone::exceeds_max_digits(raw) {
        tracing::warn!(
            digits = phone::digit_count(raw),
            max = phone::MAX_PHONE_DIGITS,
            "Phone number exceeds digit limit"
        );
        return Err(ActionError::validation(message));
    }
    Ok(())
}

/// Normalize a phone number that identifies the caller; it must have digits.
/// No length limit: an over-long number simply matches nothing stored.
pub fn require_phone_digits(raw: &str, empty_message: &str) -> Result<String, ActionError> {
    let digits = phone::normalize(raw);
    if digits.is_empty() {
        return Err(ActionError::validation(empty_message));
    }
    Ok(digits)
}

/// Validate a participant name, None when blank
pub fn validate_name(name: Option<&str>) -> Result<Option<String>, ActionError> {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    if let Some(n) = name {
        if n.len() > MAX_NAME_BYTES {
            return Err(ActionError::validation("Name is too long"));
        }
    }
    Ok(name.map(str::to_string))
}

/// Validate an optional payment amount, defaulting to zero
pub fn validate_payment_amount(amount: Option<f64>) -> Result<f64, ActionError> {
    match amount {
        None => Ok(0.0),
        Some(a) if a.is_finite() && a >= 0.0 => Ok(a),
        Some(_) => Err(ActionError::validation(
            "Payment amount must be a non-negative number",
        )),
    }
}

/// Validate the fields shared by single and weekly event creation.
/// Returns the trimmed location and creator phone.
pub fn validate_event_fields(
    location: &str,
    max_participants: i32,
    creator_phone_number: &str,
) -> Result<(String, String), ActionError> {
    let location = location.trim();
    let creator = creator_phone_number.trim();

    if location.is_empty() || phone::digit_count(creator) == 0 {
        return Err(ActionError::validation(REQUIRED_EVENT_FIELDS_MESSAGE));
    }
    if location.len() > MAX_LOCATION_BYTES {
        return Err(ActionError::validation("Location is too long"));
    }
    if max_participants < 1 {
        return Err(ActionError::validation(
            "Maximum participants must be at least 1",
        ));
    }
    validate_phone_length(creator, CREATOR_PHONE_TOO_LONG_MESSAGE)?;

    Ok((location.to_string(), creator.to_string()))
}

/// Validate the number of weeks in a series
pub fn validate_weeks(weeks: u32) -> Result<(), ActionError> {
    if weeks == 0 || weeks > MAX_WEEKS {
        return Err(ActionError::validation(format!(
            "Weeks to generate must be between 1 and {MAX_WEEKS}"
        )));
    }
    Ok(())
}
