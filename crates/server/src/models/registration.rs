//! Event registration (ticket) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_events_core::{Email, EventId, RegistrationId, RegistrationStatus, TicketId, UserId};

use super::{Event, ValidationError, optional, required};

/// A student's registration for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRegistration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub roll_number: String,
    pub department: String,
    pub year: String,
    pub special_requirements: Option<String>,
    /// Unique across the store.
    pub ticket_id: TicketId,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendee details collected by the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub roll_number: String,
    pub department: String,
    pub year: String,
    pub special_requirements: Option<String>,
}

impl RegistrationDetails {
    /// Trim and validate every required field.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first blank field, or `email`
    /// when the address does not parse.
    pub fn validate(&self) -> Result<ValidDetails, ValidationError> {
        let name = required("name", &self.name)?;
        let email = Email::parse(&self.email)
            .map_err(|e| ValidationError::new("email", e.to_string()))?;

        Ok(ValidDetails {
            name,
            email,
            phone: required("phone", &self.phone)?,
            roll_number: required("roll_number", &self.roll_number)?,
            department: required("department", &self.department)?,
            year: required("year", &self.year)?,
            special_requirements: optional(self.special_requirements.as_deref()),
        })
    }
}

/// Registration details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDetails {
    name: String,
    email: Email,
    phone: String,
    roll_number: String,
    department: String,
    year: String,
    special_requirements: Option<String>,
}

impl ValidDetails {
    /// Build a confirmed registration carrying `ticket_id`.
    #[must_use]
    pub fn into_registration(
        self,
        event_id: EventId,
        user_id: UserId,
        ticket_id: TicketId,
        now: DateTime<Utc>,
    ) -> EventRegistration {
        EventRegistration {
            id: RegistrationId::generate(),
            event_id,
            user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            roll_number: self.roll_number,
            department: self.department,
            year: self.year,
            special_requirements: self.special_requirements,
            ticket_id,
            status: RegistrationStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A registration joined with its event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRegistration {
    pub registration: EventRegistration,
    /// The placeholder event when the referenced one no longer exists.
    pub event: Event,
}
