//! Domain models for the campus events service.
//!
//! These types are the validated records that flow between the storage
//! backends, the services and the route handlers. Each maps onto one table
//! (`profiles`, `events`, `event_approvals`, `event_registrations`).

pub mod approval;
pub mod event;
pub mod profile;
pub mod registration;
pub mod session;

pub use approval::EventApproval;
pub use event::{Event, EventDraft, EventFilter, EventOrder, EventPatch, EventQuery};
pub use profile::{NewProfile, Profile, ProfileUpdate};
pub use registration::{EventRegistration, RegistrationDetails, UserRegistration};
pub use session::{SessionUser, keys as session_keys};

use chrono::{DateTime, SubsecRound, Utc};

/// A field-level validation failure at the repository boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending field, as submitted.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trim a required text field, rejecting blank input.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional text field, mapping blank input to `None`.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// The current time, truncated to the microseconds `TIMESTAMPTZ` keeps.
///
/// Every stored record is stamped with this, so what a write returns is
/// what a later read decodes.
#[must_use]
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn test_timestamp_has_microsecond_precision() {
        for _ in 0..100 {
            assert_eq!(timestamp().nanosecond() % 1_000, 0);
        }
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("title", "  Fest ").ok().as_deref(), Some("Fest"));
        assert_eq!(required("title", "   ").map_err(|e| e.field), Err("title"));
    }
}
