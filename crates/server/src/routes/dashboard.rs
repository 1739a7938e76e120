//! Role dashboards and the event management actions behind them.
//!
//! Every handler takes a [`RequireRole`] extractor, so the guard runs
//! before any store access.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use campus_events_core::{EventId, EventStatus};

use crate::error::Result;
use crate::middleware::{AdminOnly, FacultyOnly, RequireRole, StudentOnly};
use crate::models::{Event, EventApproval, EventDraft, EventPatch, EventRegistration, Profile};
use crate::services::dashboard::{self, AdminDashboard, FacultyDashboard, StudentDashboard};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// New event form submitted by faculty.
#[derive(Debug, Deserialize)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub organizer_contact: Option<String>,
}

impl EventForm {
    /// Draft organized by `organizer`.
    fn into_draft(self, organizer: &Profile) -> EventDraft {
        EventDraft {
            title: self.title,
            description: self.description,
            date: self.date,
            time: self.time,
            location: self.location,
            category: self.category,
            capacity: self.capacity,
            price: self.price,
            image_url: self.image_url,
            organizer_id: organizer.id,
            organizer_name: organizer.name.clone(),
            organizer_contact: self
                .organizer_contact
                .or_else(|| Some(organizer.contact.clone())),
        }
    }
}

/// Approval decision form.
#[derive(Debug, Deserialize)]
pub struct DecisionForm {
    pub status: EventStatus,
    pub comment: Option<String>,
}

/// Query for the admin event list.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<EventStatus>,
}

// =============================================================================
// Student
// =============================================================================

pub async fn student(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<StudentOnly>,
) -> Result<Json<StudentDashboard>> {
    let view = dashboard::student(&state.events(), profile, Utc::now().date_naive()).await?;
    Ok(Json(view))
}

// =============================================================================
// Faculty
// =============================================================================

pub async fn faculty(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<FacultyOnly>,
) -> Result<Json<FacultyDashboard>> {
    Ok(Json(dashboard::faculty(&state.events(), profile).await?))
}

/// Submit a new event for approval.
pub async fn create_event(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<FacultyOnly>,
    Form(form): Form<EventForm>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.events().create_event(form.into_draft(&profile)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Edit one of the faculty member's own events.
pub async fn update_event(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<FacultyOnly>,
    Path(id): Path<EventId>,
    Form(patch): Form<EventPatch>,
) -> Result<Json<Event>> {
    let event = state.events().update_event(id, &patch, &profile).await?;
    Ok(Json(event))
}

pub async fn delete_own_event(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<FacultyOnly>,
    Path(id): Path<EventId>,
) -> Result<StatusCode> {
    state.events().delete_event(id, &profile).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Registrations for one of the faculty member's own events.
pub async fn event_registrations(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<FacultyOnly>,
    Path(id): Path<EventId>,
) -> Result<Json<Vec<EventRegistration>>> {
    let registrations = state
        .events()
        .list_managed_event_registrations(id, &profile)
        .await?;
    Ok(Json(registrations))
}

// =============================================================================
// Admin
// =============================================================================

pub async fn admin(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<AdminOnly>,
) -> Result<Json<AdminDashboard>> {
    Ok(Json(dashboard::admin(&state.events(), profile).await?))
}

/// Every event, optionally narrowed to one status.
pub async fn all_events(
    State(state): State<AppState>,
    RequireRole(..): RequireRole<AdminOnly>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Event>>> {
    let events = state.events();
    let listed = match query.status {
        Some(EventStatus::Pending) => events.list_pending_events().await?,
        Some(EventStatus::Approved) => events.list_approved_events().await?,
        Some(status) => events
            .list_all_events()
            .await?
            .into_iter()
            .filter(|e| e.status == status)
            .collect(),
        None => events.list_all_events().await?,
    };
    Ok(Json(listed))
}

/// Approve or reject an event.
pub async fn set_status(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<AdminOnly>,
    Path(id): Path<EventId>,
    Form(form): Form<DecisionForm>,
) -> Result<Json<Event>> {
    let event = state
        .events()
        .set_event_status(id, form.status, &profile, form.comment)
        .await?;
    Ok(Json(event))
}

/// Edit any event. Its status is left to the approval actions.
pub async fn admin_update_event(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<AdminOnly>,
    Path(id): Path<EventId>,
    Form(patch): Form<EventPatch>,
) -> Result<Json<Event>> {
    let event = state.events().update_event(id, &patch, &profile).await?;
    Ok(Json(event))
}

/// Registrations for any event, e.g. before deleting it.
pub async fn admin_event_registrations(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<AdminOnly>,
    Path(id): Path<EventId>,
) -> Result<Json<Vec<EventRegistration>>> {
    let registrations = state
        .events()
        .list_managed_event_registrations(id, &profile)
        .await?;
    Ok(Json(registrations))
}

pub async fn delete_event(
    State(state): State<AppState>,
    RequireRole(profile, ..): RequireRole<AdminOnly>,
    Path(id): Path<EventId>,
) -> Result<StatusCode> {
    state.events().delete_event(id, &profile).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Decision trail for an event, oldest first.
pub async fn approvals(
    State(state): State<AppState>,
    RequireRole(..): RequireRole<AdminOnly>,
    Path(id): Path<EventId>,
) -> Result<Json<Vec<EventApproval>>> {
    Ok(Json(state.events().list_event_approvals(id).await?))
}
