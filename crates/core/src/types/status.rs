//! Status enums for events, approvals and registrations.
//!
//! [`EventStatus`] carries the event lifecycle state machine:
//!
//! ```text
//!            approve            reject
//! pending ──────────► approved ◄──────► rejected
//!    │                                     ▲
//!    └─────────────── reject ──────────────┘
//! ```
//!
//! An admin can reverse a decision in either direction. Nothing ever returns
//! to `pending`, and re-applying the current decision is accepted as an
//! idempotent re-application.

use serde::{Deserialize, Serialize};

/// Event approval status.
///
/// Also used as the status of an approval audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "event_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Awaiting an admin decision. Every event starts here.
    #[default]
    Pending,
    /// Publicly visible and open for registration.
    Approved,
    /// Hidden from the public listing.
    Rejected,
}

/// A status change that the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move event from {from} to {to}")]
pub struct StatusTransitionError {
    /// Current status.
    pub from: EventStatus,
    /// Requested status.
    pub to: EventStatus,
}

impl EventStatus {
    /// Whether an admin decision may move an event from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending | Self::Approved | Self::Rejected, Self::Approved | Self::Rejected)
        )
    }

    /// Apply an admin decision, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns `StatusTransitionError` when `next` is not reachable from `self`
    /// (any attempt to move back to `Pending`).
    pub const fn transition(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: next,
            })
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("invalid event status: {s}")),
        }
    }
}

/// Registration (ticket) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "registration_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Issued ticket, the state every registration starts in.
    #[default]
    Confirmed,
    /// Withdrawn by the student or the organizer.
    Cancelled,
    /// Checked in at the event.
    Attended,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Attended => write!(f, "attended"),
        }
    }
}
