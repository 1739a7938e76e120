//! Role-based route guard.
//!
//! [`authorize`] is the decision table; [`RequireAuth`] and [`RequireRole`]
//! apply it as axum extractors.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn approvals(RequireRole(admin, ..): RequireRole<AdminOnly>) -> impl IntoResponse {
//!     format!("Hello, {}!", admin.name)
//! }
//! ```

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};

use campus_events_core::Role;

use super::auth::SessionState;
use crate::models::Profile;
use crate::state::AppState;

/// Login page path.
pub const LOGIN_PATH: &str = "/login";

/// Seconds a client should wait before retrying while the session loads.
const RETRY_AFTER_SECS: &str = "1";

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; render nothing and retry.
    Pending,
    /// Not signed in.
    RedirectToLogin,
    /// Signed in with a role that may not see the route.
    RedirectHome,
    /// Access granted.
    Allow,
}

/// Decide whether `state` may access a route open to `allowed` roles.
///
/// An empty `allowed` set admits any signed-in user.
#[must_use]
pub fn authorize(allowed: &[Role], state: &SessionState) -> GuardDecision {
    match state {
        SessionState::Loading => GuardDecision::Pending,
        SessionState::Anonymous => GuardDecision::RedirectToLogin,
        SessionState::Authenticated(profile) => {
            if allowed.is_empty() || allowed.contains(&profile.role) {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectHome
            }
        }
    }
}

/// Rejection produced when the guard does not allow a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// 503 with `Retry-After`.
    Pending,
    /// Redirect to the login page.
    RedirectToLogin,
    /// Silent redirect to the home page.
    RedirectHome,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Pending => (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, RETRY_AFTER_SECS)],
            )
                .into_response(),
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
        }
    }
}

/// Apply the guard, yielding the signed-in profile when allowed.
fn guard(allowed: &[Role], state: SessionState) -> Result<Profile, GuardRejection> {
    match (authorize(allowed, &state), state) {
        (GuardDecision::Allow, SessionState::Authenticated(profile)) => Ok(profile),
        (GuardDecision::RedirectHome, _) => Err(GuardRejection::RedirectHome),
        (GuardDecision::RedirectToLogin, _) => Err(GuardRejection::RedirectToLogin),
        (GuardDecision::Pending | GuardDecision::Allow, _) => Err(GuardRejection::Pending),
    }
}

/// Roles admitted by a [`RequireRole`] extractor.
pub trait RolePolicy: Send + Sync + 'static {
    /// Roles allowed through.
    const ALLOWED: &'static [Role];
}

/// Students only.
pub struct StudentOnly;
/// Faculty only.
pub struct FacultyOnly;
/// Admins only.
pub struct AdminOnly;
/// Faculty or admins.
pub struct FacultyOrAdmin;

impl RolePolicy for StudentOnly {
    const ALLOWED: &'static [Role] = &[Role::Student];
}

impl RolePolicy for FacultyOnly {
    const ALLOWED: &'static [Role] = &[Role::Faculty];
}

impl RolePolicy for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Admin];
}

impl RolePolicy for FacultyOrAdmin {
    const ALLOWED: &'static [Role] = &[Role::Faculty, Role::Admin];
}

/// Extractor that requires any signed-in user.
pub struct RequireAuth(pub Profile);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(session) = SessionState::from_request_parts(parts, state).await;
        guard(&[], session).map(Self)
    }
}

/// Extractor that requires a signed-in user whose role `P` admits.
pub struct RequireRole<P: RolePolicy>(pub Profile, pub PhantomData<P>);

impl<P: RolePolicy> FromRequestParts<AppState> for RequireRole<P> {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(session) = SessionState::from_request_parts(parts, state).await;
        guard(P::ALLOWED, session).map(|profile| Self(profile, PhantomData))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use campus_events_core::{Email, UserId};

    use super::*;
    use crate::models::NewProfile;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(
            NewProfile {
                name: "Someone".to_owned(),
                role,
                contact: "9876543210".to_owned(),
                department: None,
                year: None,
            }
            .into_profile(
                UserId::generate(),
                Email::parse("someone@example.com").unwrap(),
                Utc::now(),
            ),
        )
    }

    #[test]
    fn test_loading_is_pending() {
        assert_eq!(
            authorize(AdminOnly::ALLOWED, &SessionState::Loading),
            GuardDecision::Pending
        );
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(
            authorize(AdminOnly::ALLOWED, &SessionState::Anonymous),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(
            guard(AdminOnly::ALLOWED, SessionState::Anonymous).unwrap_err(),
            GuardRejection::RedirectToLogin
        );
    }

    #[test]
    fn test_wrong_role_goes_home() {
        assert_eq!(
            authorize(AdminOnly::ALLOWED, &signed_in(Role::Student)),
            GuardDecision::RedirectHome
        );
        assert_eq!(
            authorize(FacultyOrAdmin::ALLOWED, &signed_in(Role::Student)),
            GuardDecision::RedirectHome
        );
    }

    #[test]
    fn test_allowed_roles_pass() {
        assert_eq!(
            authorize(FacultyOrAdmin::ALLOWED, &signed_in(Role::Faculty)),
            GuardDecision::Allow
        );
        assert_eq!(
            authorize(StudentOnly::ALLOWED, &signed_in(Role::Student)),
            GuardDecision::Allow
        );
        assert_eq!(authorize(&[], &signed_in(Role::Admin)), GuardDecision::Allow);
        assert_eq!(
            guard(FacultyOnly::ALLOWED, signed_in(Role::Faculty))
                .unwrap()
                .role,
            Role::Faculty
        );
    }

    #[test]
    fn test_pending_response_has_retry_after() {
        let response = GuardRejection::Pending.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key(header::RETRY_AFTER));

        let response = GuardRejection::RedirectToLogin.into_response();
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            LOGIN_PATH
        );
    }
}
