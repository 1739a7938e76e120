//! Per-role dashboard view models.

use chrono::NaiveDate;
use serde::Serialize;

use campus_events_core::EventStatus;

use super::events::{EventError, EventService};
use crate::models::{Event, Profile, UserRegistration};

/// Event counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    /// Tally `events` by status.
    #[must_use]
    pub fn tally(events: &[Event]) -> Self {
        events.iter().fold(Self::default(), |mut counts, event| {
            counts.total += 1;
            match event.status {
                EventStatus::Pending => counts.pending += 1,
                EventStatus::Approved => counts.approved += 1,
                EventStatus::Rejected => counts.rejected += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub profile: Profile,
    pub registrations: Vec<UserRegistration>,
    /// Registrations for events dated today or later.
    pub upcoming: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacultyDashboard {
    pub profile: Profile,
    pub events: Vec<Event>,
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub profile: Profile,
    pub pending_events: Vec<Event>,
    pub all_events: Vec<Event>,
    pub counts: StatusCounts,
}

/// Build the student dashboard.
///
/// # Errors
///
/// Returns `EventError::Repository` if the store fails.
pub async fn student(
    events: &EventService<'_>,
    profile: Profile,
    today: NaiveDate,
) -> Result<StudentDashboard, EventError> {
    let registrations = events.list_user_registrations(profile.id).await?;
    let upcoming = registrations
        .iter()
        .filter(|r| r.event.date >= today)
        .count();

    Ok(StudentDashboard {
        profile,
        registrations,
        upcoming,
    })
}

/// Build the faculty dashboard.
///
/// # Errors
///
/// Returns `EventError::Repository` if the store fails.
pub async fn faculty(
    events: &EventService<'_>,
    profile: Profile,
) -> Result<FacultyDashboard, EventError> {
    let own = events.list_faculty_events(profile.id).await?;
    Ok(FacultyDashboard {
        counts: StatusCounts::tally(&own),
        events: own,
        profile,
    })
}

/// Build the admin dashboard.
///
/// # Errors
///
/// Returns `EventError::Repository` if the store fails.
pub async fn admin(
    events: &EventService<'_>,
    profile: Profile,
) -> Result<AdminDashboard, EventError> {
    let all_events = events.list_all_events().await?;
    let pending_events = all_events
        .iter()
        .filter(|e| e.status == EventStatus::Pending)
        .cloned()
        .collect();

    Ok(AdminDashboard {
        profile,
        counts: StatusCounts::tally(&all_events),
        pending_events,
        all_events,
    })
}
