//! Event repository error types.

use thiserror::Error;

use campus_events_core::StatusTransitionError;

use crate::db::RepositoryError;
use crate::models::ValidationError;

/// Errors that can occur during event, approval and registration operations.
#[derive(Debug, Error)]
pub enum EventError {
    /// The event does not exist.
    #[error("event not found")]
    NotFound,

    /// Submitted data failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The requested status change is not allowed.
    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionError),

    /// The actor may not perform this operation.
    #[error("not allowed to modify this event")]
    Forbidden,

    /// The event is not approved, so it takes no registrations.
    #[error("event is not open for registration")]
    NotOpenForRegistration,

    /// The user already holds a registration for this event.
    #[error("already registered for this event")]
    AlreadyRegistered,

    /// The registration could not be stored.
    #[error("registration failed: {0}")]
    RegistrationFailed(RepositoryError),

    /// The approval decision could not be stored.
    #[error("status update failed: {0}")]
    StatusUpdateFailed(RepositoryError),

    /// The event could not be deleted.
    #[error("delete failed: {0}")]
    DeleteFailed(RepositoryError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
