//! Session state resolution and sign-in/sign-out helpers.
//!
//! The session only stores the user id. [`SessionState`] reloads the
//! profile from the store on every request, so the role used for
//! authorization always comes from stored data.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Serialize;
use tower_sessions::Session;

use campus_events_core::Role;

use crate::models::{Profile, SessionUser, session_keys};
use crate::state::AppState;

/// The authentication state of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The session or profile could not be read; no decision can be made.
    Loading,
    /// No one is signed in.
    Anonymous,
    /// Signed in with a stored profile.
    Authenticated(Profile),
}

impl SessionState {
    /// The signed-in profile, if any.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            Self::Loading | Self::Anonymous => None,
        }
    }

    /// The signed-in role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.profile().map(|p| p.role)
    }
}

/// Serializable snapshot for `GET /session`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub role: Option<Role>,
    pub profile: Option<Profile>,
}

impl From<SessionState> for SessionSnapshot {
    fn from(state: SessionState) -> Self {
        let is_loading = matches!(state, SessionState::Loading);
        let role = state.role();
        let profile = match state {
            SessionState::Authenticated(profile) => Some(profile),
            SessionState::Loading | SessionState::Anonymous => None,
        };
        Self {
            is_loading,
            is_authenticated: profile.is_some(),
            role,
            profile,
        }
    }
}

impl FromRequestParts<AppState> for SessionState {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let Some(session) = parts.extensions.get::<Session>() else {
            tracing::error!("Session layer missing from router");
            return Ok(Self::Loading);
        };

        let user = match session.get::<SessionUser>(session_keys::CURRENT_USER).await {
            Ok(Some(user)) => user,
            Ok(None) => return Ok(Self::Anonymous),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read session");
                return Ok(Self::Loading);
            }
        };

        match state.identity().load_profile(user.user_id).await {
            Ok(Some(profile)) => {
                tracing::Span::current().record("user_id", tracing::field::display(profile.id));
                Ok(Self::Authenticated(profile))
            }
            Ok(None) => {
                tracing::warn!(user_id = %user.user_id, "Session refers to a missing profile");
                Ok(Self::Anonymous)
            }
            Err(_) => Ok(Self::Loading),
        }
    }
}

/// Helper to set the signed-in user in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to end the session (sign out).
///
/// Signing out without a session is a no-op, so repeated calls succeed.
///
/// # Errors
///
/// Returns an error if the session store cannot be updated.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<SessionUser>(session_keys::CURRENT_USER).await?;
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use tower_sessions::MemoryStore as SessionMemoryStore;

    use campus_events_core::{Email, UserId};

    use super::*;

    fn profile() -> Profile {
        crate::models::NewProfile {
            name: "Admin User".to_owned(),
            role: Role::Admin,
            contact: "9876543212".to_owned(),
            department: None,
            year: None,
        }
        .into_profile(
            UserId::generate(),
            Email::parse("admin@example.com").unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_snapshot() {
        let loading = SessionSnapshot::from(SessionState::Loading);
        assert!(loading.is_loading);
        assert!(!loading.is_authenticated);

        let signed_in = SessionSnapshot::from(SessionState::Authenticated(profile()));
        assert!(!signed_in.is_loading);
        assert!(signed_in.is_authenticated);
        assert_eq!(signed_in.role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent() {
        let session = Session::new(None, Arc::new(SessionMemoryStore::default()), None);
        let user = SessionUser {
            user_id: UserId::generate(),
        };
        set_current_user(&session, &user).await.unwrap();
        assert_eq!(
            session
                .get::<SessionUser>(session_keys::CURRENT_USER)
                .await
                .unwrap(),
            Some(user)
        );

        clear_current_user(&session).await.unwrap();
        clear_current_user(&session).await.unwrap();
        assert!(
            session
                .get::<SessionUser>(session_keys::CURRENT_USER)
                .await
                .unwrap()
                .is_none()
        );
    }
}
