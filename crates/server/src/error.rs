//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::events::EventError;
use crate::services::identity::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Identity operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Event operation failed.
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidProfile(_) => StatusCode::BAD_REQUEST,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Event(err) => match err {
                EventError::NotFound => StatusCode::NOT_FOUND,
                EventError::Validation(_) => StatusCode::BAD_REQUEST,
                EventError::Forbidden => StatusCode::FORBIDDEN,
                EventError::InvalidTransition(_)
                | EventError::NotOpenForRegistration
                | EventError::AlreadyRegistered => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        // Don't expose internal error details to clients
        match self {
            Self::Database(_) | Self::Session(_) => {
                "Internal server error".to_string()
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::InvalidProfile(v) => v.to_string(),
                AuthError::Forbidden => "You cannot edit this profile".to_string(),
                AuthError::ProfileCreationFailed(_) => {
                    "Your account could not be created, please try again".to_string()
                }
                AuthError::ProfileLoad => "Your profile could not be loaded".to_string(),
                _ => "Authentication error".to_string(),
            },
            Self::Event(err) => match err {
                EventError::NotFound => "Event not found".to_string(),
                EventError::Validation(v) => v.to_string(),
                EventError::InvalidTransition(t) => t.to_string(),
                EventError::Forbidden => "You cannot modify this event".to_string(),
                EventError::NotOpenForRegistration => {
                    "This event is not open for registration".to_string()
                }
                EventError::AlreadyRegistered => {
                    "You are already registered for this event".to_string()
                }
                EventError::RegistrationFailed(_) => {
                    "Registration failed, please try again".to_string()
                }
                EventError::StatusUpdateFailed(_) => {
                    "The event status could not be updated".to_string()
                }
                EventError::DeleteFailed(_) => "The event could not be deleted".to_string(),
                EventError::Repository(_) => "Internal server error".to_string(),
            },
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            Self::Auth(AuthError::InvalidProfile(v)) | Self::Event(EventError::Validation(v)) => {
                Some(v.field)
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.public_message(),
            field: self.field(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::ValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(EventError::AlreadyRegistered).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(EventError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(EventError::DeleteFailed(RepositoryError::NotFound)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::from(RepositoryError::DataCorruption("secret table".to_owned()));
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_validation_field_exposed() {
        let err = AppError::from(EventError::Validation(ValidationError::new(
            "roll_number",
            "is required",
        )));
        assert_eq!(err.field(), Some("roll_number"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
