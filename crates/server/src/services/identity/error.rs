//! Identity error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;

/// Errors that can occur during sign-in, sign-up and profile operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] campus_events_core::EmailError),

    /// Invalid credentials (wrong password or unknown email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Sign-up profile data failed validation.
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ValidationError),

    /// The identity and profile could not be stored.
    #[error("profile creation failed: {0}")]
    ProfileCreationFailed(RepositoryError),

    /// The identity exists but its profile could not be found.
    #[error("profile not found for authenticated user")]
    ProfileLoad,

    /// The actor may not change this profile.
    #[error("not allowed to modify this profile")]
    Forbidden,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
