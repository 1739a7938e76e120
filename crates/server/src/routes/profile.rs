//! Profile viewing and editing for the signed-in user.

use axum::{Form, Json, extract::State};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Profile, ProfileUpdate};
use crate::state::AppState;

pub async fn show(RequireAuth(profile): RequireAuth) -> Json<Profile> {
    Json(profile)
}

/// Update the signed-in user's own profile.
///
/// A role in the form is ignored unless the user is an admin.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(profile): RequireAuth,
    Form(update): Form<ProfileUpdate>,
) -> Result<Json<Profile>> {
    let updated = state
        .identity()
        .update_profile(profile.id, update, &profile)
        .await?;
    Ok(Json(updated))
}
