//! Registration route handlers.
//!
//! Signed-out visitors are sent to the login page with a `return_to` that
//! brings them back to the same event.

use axum::{
    Form, Json,
    extract::{Path, State, rejection::FormRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};

use campus_events_core::EventId;

use crate::error::Result;
use crate::middleware::guard::{GuardRejection, LOGIN_PATH};
use crate::middleware::{RequireAuth, SessionState};
use crate::models::{Profile, UserRegistration};
use crate::services::registration::{self, REDIRECT_DELAY_SECS, REGISTERED_PATH, RegistrationForm};
use crate::state::AppState;

/// Resolve the signed-in profile or the response that replaces the page.
fn signed_in(session: SessionState, event_id: EventId) -> std::result::Result<Profile, Response> {
    match session {
        SessionState::Authenticated(profile) => Ok(profile),
        SessionState::Anonymous => {
            let target = format!("{LOGIN_PATH}?return_to=/events/register/{event_id}");
            Err(Redirect::to(&target).into_response())
        }
        SessionState::Loading => Err(GuardRejection::Pending.into_response()),
    }
}

/// Show the registration form prefilled from the profile.
pub async fn form(
    State(state): State<AppState>,
    session: SessionState,
    Path(event_id): Path<EventId>,
) -> Result<Response> {
    let profile = match signed_in(session, event_id) {
        Ok(profile) => profile,
        Err(response) => return Ok(response),
    };

    let page = registration::registration_page(&state.events(), event_id, &profile).await?;
    Ok(Json(page).into_response())
}

/// Submit the registration form.
///
/// The session is checked before the body is parsed, so a signed-out
/// visitor is redirected whatever they sent. The confirmation is returned with a `Refresh` header pointing at the
/// registered-events page.
pub async fn submit(
    State(state): State<AppState>,
    session: SessionState,
    Path(event_id): Path<EventId>,
    form: std::result::Result<Form<RegistrationForm>, FormRejection>,
) -> Result<Response> {
    let profile = match signed_in(session, event_id) {
        Ok(profile) => profile,
        Err(response) => return Ok(response),
    };
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let confirmation = registration::submit(&state.events(), event_id, &profile, form).await?;
    tracing::info!(
        %event_id,
        user_id = %profile.id,
        ticket_id = %confirmation.ticket_id,
        "Registration confirmed"
    );

    let refresh = format!("{REDIRECT_DELAY_SECS}; url={REGISTERED_PATH}");
    Ok((
        StatusCode::CREATED,
        [(header::REFRESH, refresh)],
        Json(confirmation),
    )
        .into_response())
}

/// The signed-in user's registrations with their events.
pub async fn registered(
    State(state): State<AppState>,
    RequireAuth(profile): RequireAuth,
) -> Result<Json<Vec<UserRegistration>>> {
    let registrations = state.events().list_user_registrations(profile.id).await?;
    Ok(Json(registrations))
}
