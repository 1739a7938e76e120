//! Registration workflow.
//!
//! The form is prefilled from the signed-in profile; a submission must carry
//! every attendee detail plus an explicit acceptance of the terms. A
//! confirmation names the issued ticket and where the client goes next.

use serde::{Deserialize, Serialize};

use campus_events_core::{EventId, TicketId};

use super::events::{EventError, EventService};
use crate::models::{Event, Profile, RegistrationDetails, ValidationError};

/// Where the client lands after a successful registration.
pub const REGISTERED_PATH: &str = "/events/registered";

/// Seconds the confirmation stays on screen before redirecting.
pub const REDIRECT_DELAY_SECS: u64 = 3;

/// Submitted registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub year: String,
    pub special_requirements: Option<String>,
    /// Checkbox value; browsers send `on` when ticked and nothing otherwise.
    pub accept_terms: Option<String>,
}

impl RegistrationForm {
    fn terms_accepted(&self) -> bool {
        matches!(
            self.accept_terms.as_deref().map(str::trim),
            Some("on" | "true" | "yes" | "1")
        )
    }

    fn into_details(self) -> RegistrationDetails {
        RegistrationDetails {
            name: self.name,
            email: self.email,
            phone: self.phone,
            roll_number: self.roll_number,
            department: self.department,
            year: self.year,
            special_requirements: self.special_requirements,
        }
    }
}

/// Registration page: the event plus a form prefilled from the profile.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationPage {
    pub event: Event,
    pub form: RegistrationDetails,
}

/// Successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationConfirmation {
    pub event_id: EventId,
    pub event_title: String,
    pub ticket_id: TicketId,
    pub redirect_to: &'static str,
    pub redirect_after_secs: u64,
}

/// Form defaults taken from the profile. The roll number is never known.
#[must_use]
pub fn prefill(profile: &Profile) -> RegistrationDetails {
    RegistrationDetails {
        name: profile.name.clone(),
        email: profile.email.to_string(),
        phone: profile.contact.clone(),
        roll_number: String::new(),
        department: profile.department.clone().unwrap_or_default(),
        year: profile.year.clone().unwrap_or_default(),
        special_requirements: None,
    }
}

/// Load the registration page for `event_id`.
///
/// # Errors
///
/// Returns `EventError::NotFound` if the event does not exist.
pub async fn registration_page(
    events: &EventService<'_>,
    event_id: EventId,
    profile: &Profile,
) -> Result<RegistrationPage, EventError> {
    let event = events.get_event(event_id).await?;
    Ok(RegistrationPage {
        event,
        form: prefill(profile),
    })
}

/// Submit the form and issue a ticket.
///
/// # Errors
///
/// Returns `EventError::Validation` if the terms are not accepted or a
/// required field is blank, and any error of
/// [`EventService::register_for_event`].
pub async fn submit(
    events: &EventService<'_>,
    event_id: EventId,
    profile: &Profile,
    form: RegistrationForm,
) -> Result<RegistrationConfirmation, EventError> {
    if !form.terms_accepted() {
        return Err(ValidationError::new("accept_terms", "terms and conditions must be accepted").into());
    }

    let details = form.into_details();
    details.validate()?;

    // Loaded up front: the ticket stands even if the event goes away after.
    let event = events.get_event(event_id).await?;
    let registration = events
        .register_for_event(event_id, profile.id, &details)
        .await?;

    Ok(RegistrationConfirmation {
        event_id,
        event_title: event.title,
        ticket_id: registration.ticket_id,
        redirect_to: REGISTERED_PATH,
        redirect_after_secs: REDIRECT_DELAY_SECS,
    })
}
