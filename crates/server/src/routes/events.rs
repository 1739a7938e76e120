//! Public event browsing.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Serialize;

use campus_events_core::{EventId, EventStatus, Role};

use crate::error::{AppError, Result};
use crate::middleware::SessionState;
use crate::models::{Event, EventFilter};
use crate::services::events::{EventError, EventListing};
use crate::state::AppState;

/// Event listing page.
#[derive(Debug, Serialize)]
pub struct EventsPage {
    pub events: Vec<EventListing>,
    pub category: Option<String>,
    pub q: Option<String>,
}

/// List approved events, optionally filtered by `category` and `q`.
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<EventsPage>> {
    let events = state
        .events()
        .browse_events(&filter, Utc::now().date_naive())
        .await?;

    Ok(Json(EventsPage {
        events,
        category: filter.category,
        q: filter.search,
    }))
}

/// Show one event.
///
/// Events that are not approved are only visible to their organizer and to
/// admins; everyone else gets a 404.
pub async fn show(
    State(state): State<AppState>,
    session: SessionState,
    Path(id): Path<EventId>,
) -> Result<Json<Event>> {
    let event = state.events().get_event(id).await?;

    let visible = event.status == EventStatus::Approved
        || session.profile().is_some_and(|viewer| {
            viewer.role == Role::Admin || event.is_organized_by(viewer.id)
        });
    if !visible {
        return Err(AppError::Event(EventError::NotFound));
    }

    Ok(Json(event))
}
