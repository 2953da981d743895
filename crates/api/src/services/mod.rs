// Services layer for business logic
// Services own validation and error translation, calling storage directly

pub mod event;
pub mod participant;

pub use event::EventService;
pub use participant::ParticipantService;

use crate::storage::StoreError;
use hoops_core::ActionError;

/// Log a storage failure and hide it behind a generic user-facing message
pub(crate) fn store_failure(message: &'static str, e: StoreError) -> ActionError {
    tracing::error!("{}: {}", message, e);
    ActionError::failed(message)
}
