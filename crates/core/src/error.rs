// Error types for event and signup actions
//
// Display strings are user-facing: the API returns them verbatim. Internal
// causes are logged where they happen and never reach the message.

use thiserror::Error;

/// Result type alias for action operations
pub type Result<T> = std::result::Result<T, ActionError>;

/// Errors that an action can report to the user
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// Input failed validation (missing field, too many digits, ...)
    #[error("{0}")]
    Validation(String),

    /// Phone number does not authorize the action
    #[error("{0}")]
    Unauthorized(String),

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Back-out for a number whose registration is already `out`
    #[error("This phone number is already marked as 'out'. No need to back out again.")]
    AlreadyBackedOut,

    /// Back-out for a number that never signed up for the event
    #[error(
        "This phone number was not used to sign up for this event. Please check the number and try again."
    )]
    NotSignedUp,

    /// Back-out for a number with registrations but none active
    #[error("No active registration found for this phone number. You may have already backed out.")]
    NoActiveRegistration,

    /// Persistence failed; the cause is logged server-side
    #[error("{0}")]
    Failed(String),
}

impl ActionError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ActionError::Validation(msg.into())
    }

    /// Create an authorization error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ActionError::Unauthorized(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ActionError::NotFound(msg.into())
    }

    /// Create an opaque persistence failure
    pub fn failed(msg: impl Into<String>) -> Self {
        ActionError::Failed(msg.into())
    }

    /// Not-found error for an event id
    pub fn event_not_found() -> Self {
        ActionError::NotFound("Event not found".to_string())
    }

    /// Whether the error is caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ActionError::Failed(_))
    }
}
