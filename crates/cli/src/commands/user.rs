//! Account management.
//!
//! Admin accounts cannot be created through sign-up; this is how they are
//! provisioned.
//!
//! # Usage
//!
//! ```bash
//! campus-cli user create -e admin@example.com -n "Admin Name" -r admin \
//!     -c 9876543212 -p 'a long password'
//! ```

use campus_events_core::{Role, UserId};
use campus_events_server::db::PostgresStore;
use campus_events_server::models::NewProfile;
use campus_events_server::services::identity::IdentityService;

use super::{CommandError, connect};

/// Account details from the command line.
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub contact: String,
    pub department: Option<String>,
}

/// Create an account with any role.
///
/// # Returns
///
/// The id of the created user.
///
/// # Errors
///
/// Returns `CommandError::Account` when the email is taken or a field is
/// invalid.
pub async fn create(account: NewAccount) -> Result<UserId, CommandError> {
    let store = PostgresStore::new(connect().await?);

    tracing::info!("Creating user: {} ({})", account.email, account.role);

    let profile = IdentityService::new(&store)
        .sign_up(
            &account.email,
            &account.password,
            NewProfile {
                name: account.name,
                role: account.role,
                contact: account.contact,
                department: account.department,
                year: None,
            },
        )
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        profile.id,
        profile.email,
        profile.role
    );
    Ok(profile.id)
}
