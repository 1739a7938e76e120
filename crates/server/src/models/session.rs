//! Session-related types.
//!
//! Only the user id is kept in the session cookie store. The profile (and
//! with it the role) is reloaded from the event store on every request.

use serde::{Deserialize, Serialize};

use campus_events_core::UserId;

/// Session-stored user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Authenticated user's id.
    pub user_id: UserId,
}

impl SessionUser {
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}
