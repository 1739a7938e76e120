//! Identity service.
//!
//! Password sign-up and sign-in over the storage interface. The profile,
//! and with it the role, is always read back from the store.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use campus_events_core::{Email, Role, UserId};

use crate::db::{EventStore, RepositoryError};
use crate::models::{NewProfile, Profile, ProfileUpdate, timestamp};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Identity service.
///
/// Handles account creation, password sign-in and profile lookups.
pub struct IdentityService<'a> {
    store: &'a dyn EventStore,
}

impl<'a> IdentityService<'a> {
    /// Create a new identity service.
    #[must_use]
    pub const fn new(store: &'a dyn EventStore) -> Self {
        Self { store }
    }

    /// Register a new account with its profile.
    ///
    /// The identity and the profile are written in one store transaction.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::InvalidProfile` if a required profile field is blank.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::ProfileCreationFailed` if the store rejects the write.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: NewProfile,
    ) -> Result<Profile, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let profile = profile.validate()?;

        let password_hash = hash_password(password)?;
        let profile = profile.into_profile(UserId::generate(), email, timestamp());

        self.store
            .create_account(&profile, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => {
                    tracing::error!(error = %other, "Failed to create account");
                    AuthError::ProfileCreationFailed(other)
                }
            })?;

        tracing::info!(user_id = %profile.id, role = %profile.role, "Account created");
        Ok(profile)
    }

    /// Sign in with email and password, returning the stored profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::ProfileLoad` if the identity has no profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let credentials = self
            .store
            .get_credentials(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        self.load_profile(credentials.user_id)
            .await?
            .ok_or(AuthError::ProfileLoad)
    }

    /// Load a profile by user id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn load_profile(&self, user_id: UserId) -> Result<Option<Profile>, AuthError> {
        self.store.get_profile(user_id).await.map_err(|e| {
            tracing::error!(error = %e, %user_id, "Failed to load profile");
            AuthError::Repository(e)
        })
    }

    /// Update `target`'s profile on behalf of `actor`.
    ///
    /// Only the owner or an admin may edit a profile, and only an admin may
    /// change a role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if `actor` may not edit the profile.
    /// Returns `AuthError::ProfileLoad` if the profile does not exist.
    /// Returns `AuthError::InvalidProfile` if a supplied field is blank.
    pub async fn update_profile(
        &self,
        target: UserId,
        mut update: ProfileUpdate,
        actor: &Profile,
    ) -> Result<Profile, AuthError> {
        let mut profile = self
            .load_profile(target)
            .await?
            .ok_or(AuthError::ProfileLoad)?;

        if !profile.editable_by(actor) {
            return Err(AuthError::Forbidden);
        }
        if actor.role != Role::Admin {
            update.role = None;
        }

        update.apply(&mut profile, timestamp())?;
        self.store.update_profile(&profile).await?;

        tracing::info!(user_id = %profile.id, actor = %actor.id, "Profile updated");
        Ok(profile)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn student() -> NewProfile {
        NewProfile {
            name: "John Student".to_owned(),
            role: Role::Student,
            contact: "9876543210".to_owned(),
            department: Some("Computer Science".to_owned()),
            year: Some("Third Year".to_owned()),
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("password").is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let store = MemoryStore::new();
        let identity = IdentityService::new(&store);

        let created = identity
            .sign_up("Student@Example.com", "password", student())
            .await
            .unwrap();
        assert_eq!(created.email.as_str(), "student@example.com");

        let signed_in = identity
            .sign_in("student@example.com", "password")
            .await
            .unwrap();
        assert_eq!(signed_in.id, created.id);
        assert_eq!(signed_in.role, Role::Student);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let identity = IdentityService::new(&store);
        identity
            .sign_up("student@example.com", "password", student())
            .await
            .unwrap();

        let err = identity
            .sign_up("student@example.com", "password", student())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_wrong_password_and_unknown_email() {
        let store = MemoryStore::new();
        let identity = IdentityService::new(&store);
        identity
            .sign_up("student@example.com", "password", student())
            .await
            .unwrap();

        assert!(matches!(
            identity.sign_in("student@example.com", "nope-nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            identity.sign_in("nobody@example.com", "password").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_update_profile_permissions() {
        let store = MemoryStore::new();
        let identity = IdentityService::new(&store);
        let me = identity
            .sign_up("student@example.com", "password", student())
            .await
            .unwrap();
        let other = identity
            .sign_up("other@example.com", "password", student())
            .await
            .unwrap();

        let update = ProfileUpdate {
            role: Some(Role::Admin),
            contact: Some("1234567890".to_owned()),
            ..ProfileUpdate::default()
        };
        let updated = identity
            .update_profile(me.id, update.clone(), &me)
            .await
            .unwrap();
        assert_eq!(updated.contact, "1234567890");
        assert_eq!(updated.role, Role::Student);

        assert!(matches!(
            identity.update_profile(me.id, update, &other).await,
            Err(AuthError::Forbidden)
        ));
    }
}
