//! Storage layer for campus events.
//!
//! All persistence goes through the [`EventStore`] trait. Two backends
//! implement it:
//!
//! - [`PostgresStore`] - `PostgreSQL` via sqlx
//! - [`MemoryStore`] - in-process tables for offline development and tests
//!
//! The backend is chosen once at startup (see `ServerConfig::storage`) and
//! injected into `AppState` as an `Arc<dyn EventStore>`.
//!
//! ## Tables
//!
//! - `accounts` - Authentication identities (email + Argon2 hash)
//! - `profiles` - Application user records (role, contact)
//! - `events` - Campus events
//! - `event_approvals` - Append-only approval audit trail
//! - `event_registrations` - Student registrations with ticket ids
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/`. The server applies
//! them on startup; they can also be run explicitly via:
//! ```bash
//! cargo run -p campus-events-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;
pub mod seed;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use campus_events_core::{Email, EventId, UserId};

use crate::models::{Event, EventApproval, EventQuery, EventRegistration, Profile};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Credentials stored for an authentication identity.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user_id: UserId,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// Storage interface for every record the service persists.
///
/// Multi-record writes (`create_account`, `insert_event`, `record_decision`,
/// `delete_event`) are atomic in every implementation.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // =========================================================================
    // Accounts & profiles
    // =========================================================================

    /// Create an identity and its profile together.
    ///
    /// Returns `Conflict` if the email is taken.
    async fn create_account(
        &self,
        profile: &Profile,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;

    /// Look up credentials by email.
    async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, RepositoryError>;

    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, RepositoryError>;

    /// Overwrite a profile. Returns `NotFound` if it does not exist.
    async fn update_profile(&self, profile: &Profile) -> Result<(), RepositoryError>;

    // =========================================================================
    // Events
    // =========================================================================

    /// Insert an event together with its initial approval record.
    async fn insert_event(
        &self,
        event: &Event,
        approval: &EventApproval,
    ) -> Result<(), RepositoryError>;

    async fn get_event(&self, id: EventId) -> Result<Option<Event>, RepositoryError>;

    async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>, RepositoryError>;

    /// Overwrite an event's editable fields. Returns `NotFound` if missing.
    async fn update_event(&self, event: &Event) -> Result<(), RepositoryError>;

    /// Delete an event with its approvals and registrations.
    ///
    /// Returns `NotFound` if it does not exist.
    async fn delete_event(&self, id: EventId) -> Result<(), RepositoryError>;

    // =========================================================================
    // Approvals
    // =========================================================================

    /// Append a decision and set the event's status to match, atomically.
    ///
    /// Returns the updated event, or `NotFound`.
    async fn record_decision(&self, approval: &EventApproval) -> Result<Event, RepositoryError>;

    /// Approval trail for an event, oldest first.
    async fn list_approvals(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventApproval>, RepositoryError>;

    // =========================================================================
    // Registrations
    // =========================================================================

    /// Insert a registration.
    ///
    /// Returns `Conflict` when the ticket id is taken or the user is already
    /// registered for the event, and `NotFound` when the event is missing.
    async fn insert_registration(
        &self,
        registration: &EventRegistration,
    ) -> Result<(), RepositoryError>;

    async fn find_registration(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Option<EventRegistration>, RepositoryError>;

    /// Registrations for an event, newest first.
    async fn list_event_registrations(
        &self,
        event_id: EventId,
    ) -> Result<Vec<EventRegistration>, RepositoryError>;

    /// A user's registrations, newest first, each with its event if the
    /// event still exists.
    async fn list_user_registrations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<(EventRegistration, Option<Event>)>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
