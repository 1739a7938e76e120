//! Authentication route handlers.
//!
//! Sign-in establishes a session holding only the user id; the role always
//! comes from the stored profile. Sign-up never signs the user in.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use campus_events_core::Role;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{SessionSnapshot, SessionState, clear_current_user, set_current_user};
use crate::models::{NewProfile, SessionUser};
use crate::state::AppState;

/// Message shown on the login page after a successful sign-up.
const ACCOUNT_CREATED: &str = "Account created successfully. Please sign in.";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Relative path to continue to after signing in.
    pub return_to: Option<String>,
}

/// Sign-up form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub contact: String,
    pub department: Option<String>,
    pub year: Option<String>,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub return_to: Option<String>,
    pub message: Option<String>,
}

/// Query parameters for the sign-up page.
#[derive(Debug, Default, Deserialize)]
pub struct SignupQuery {
    pub error: Option<String>,
}

// =============================================================================
// View Models
// =============================================================================

/// Login page.
#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub return_to: Option<String>,
    pub message: Option<String>,
}

/// Sign-up page.
#[derive(Debug, Serialize)]
pub struct SignupPage {
    /// Roles that may be chosen at sign-up.
    pub roles: &'static [Role],
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page, or skip it when already signed in.
pub async fn login_page(session: SessionState, Query(query): Query<LoginQuery>) -> Response {
    if let SessionState::Authenticated(profile) = session {
        return Redirect::to(profile.role.dashboard_path()).into_response();
    }

    Json(LoginPage {
        return_to: query.return_to.filter(|p| is_safe_return_path(p)),
        message: query.message,
    })
    .into_response()
}

/// Handle login form submission.
///
/// Redirects to the requested `return_to` path when it is a safe relative
/// path, otherwise to the dashboard of the profile's role.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let profile = state
        .identity()
        .sign_in(&form.email, &form.password)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

    set_current_user(&session, &SessionUser::new(profile.id)).await?;
    set_sentry_user(&profile.id, Some(profile.email.as_str()));
    tracing::info!(user_id = %profile.id, role = %profile.role, "Signed in");

    let target = form
        .return_to
        .filter(|p| is_safe_return_path(p))
        .unwrap_or_else(|| profile.role.dashboard_path().to_owned());
    Ok(Redirect::to(&target))
}

/// Sign out. Signing out twice is harmless.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

/// Current session state for a front end.
pub async fn session_status(session: SessionState) -> Json<SessionSnapshot> {
    Json(session.into())
}

// =============================================================================
// Sign-up Routes
// =============================================================================

/// Display the sign-up page, or go home when already signed in.
pub async fn signup_page(session: SessionState, Query(query): Query<SignupQuery>) -> Response {
    if session.profile().is_some() {
        return Redirect::to("/").into_response();
    }

    Json(SignupPage {
        roles: &[Role::Student, Role::Faculty],
        error: query.error,
    })
    .into_response()
}

/// Handle sign-up form submission.
///
/// Admin accounts are never self-registered. On success the user is sent to
/// the login page with a confirmation message.
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Result<Response> {
    if form.role == Role::Admin {
        return Err(AppError::BadRequest(
            "Admin accounts cannot be created by sign-up".to_string(),
        ));
    }

    state
        .identity()
        .sign_up(
            &form.email,
            &form.password,
            NewProfile {
                name: form.name,
                role: form.role,
                contact: form.contact,
                department: form.department,
                year: form.year,
            },
        )
        .await?;

    let target = format!("/login?message={}", encode_query_value(ACCOUNT_CREATED));
    Ok(Redirect::to(&target).into_response())
}

// =============================================================================
// Helpers
// =============================================================================

/// Only same-site absolute paths are followed after sign-in.
fn is_safe_return_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_path_must_be_local() {
        assert!(is_safe_return_path("/events/register/abc"));
        assert!(!is_safe_return_path("//evil.example.com"));
        assert!(!is_safe_return_path("https://evil.example.com"));
        assert!(!is_safe_return_path("/\\evil.example.com"));
        assert!(!is_safe_return_path(""));
    }

    #[test]
    fn test_message_is_encoded() {
        assert_eq!(encode_query_value("a b."), "a+b.");
    }
}
