//! User profile domain types.
//!
//! A profile is the application-level user record. It is distinct from the
//! bare authentication identity (email + password hash) kept in `accounts`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_events_core::{Email, Role, UserId};

use super::{ValidationError, optional, required};

/// A user profile (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// Same id as the authentication identity.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Role that drives authorization.
    pub role: Role,
    /// Phone or other contact detail.
    pub contact: String,
    /// Academic department, if any.
    pub department: Option<String>,
    /// Year of study (students).
    pub year: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Whether `actor` may edit this profile (the owner or an admin).
    #[must_use]
    pub fn editable_by(&self, actor: &Self) -> bool {
        actor.id == self.id || actor.role == Role::Admin
    }
}

/// Profile data submitted at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub name: String,
    pub role: Role,
    pub contact: String,
    pub department: Option<String>,
    pub year: Option<String>,
}

impl NewProfile {
    /// Trim and validate the sign-up fields.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name or contact is blank.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", &self.name)?,
            role: self.role,
            contact: required("contact", &self.contact)?,
            department: optional(self.department.as_deref()),
            year: optional(self.year.as_deref()),
        })
    }

    /// Build the stored profile for a freshly created identity.
    #[must_use]
    pub fn into_profile(self, id: UserId, email: Email, now: DateTime<Utc>) -> Profile {
        Profile {
            id,
            name: self.name,
            email,
            role: self.role,
            contact: self.contact,
            department: self.department,
            year: self.year,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    /// Only honored when an admin performs the update.
    pub role: Option<Role>,
}

impl ProfileUpdate {
    /// Apply the update to `profile`, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a supplied name or contact is blank.
    pub fn apply(&self, profile: &mut Profile, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            profile.name = required("name", name)?;
        }
        if let Some(contact) = &self.contact {
            profile.contact = required("contact", contact)?;
        }
        if self.department.is_some() {
            profile.department = optional(self.department.as_deref());
        }
        if self.year.is_some() {
            profile.year = optional(self.year.as_deref());
        }
        if let Some(role) = self.role {
            profile.role = role;
        }
        profile.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_profile() -> NewProfile {
        NewProfile {
            name: "  John Student ".to_owned(),
            role: Role::Student,
            contact: "9876543210".to_owned(),
            department: Some("Computer Science".to_owned()),
            year: Some("   ".to_owned()),
        }
    }

    #[test]
    fn test_validate_trims_and_blanks_optional() {
        let profile = new_profile().validate().unwrap();
        assert_eq!(profile.name, "John Student");
        assert_eq!(profile.year, None);
        assert_eq!(profile.department.as_deref(), Some("Computer Science"));
    }

    #[test]
    fn test_validate_requires_contact() {
        let mut input = new_profile();
        input.contact = String::new();
        assert_eq!(input.validate().unwrap_err().field, "contact");
    }

    #[test]
    fn test_update_and_editable_by() {
        let now = Utc::now();
        let email = Email::parse("student@example.com").unwrap();
        let mut profile = new_profile()
            .validate()
            .unwrap()
            .into_profile(UserId::generate(), email.clone(), now);
        let other = new_profile()
            .validate()
            .unwrap()
            .into_profile(UserId::generate(), email, now);

        assert!(profile.editable_by(&profile.clone()));
        assert!(!profile.editable_by(&other));

        let update = ProfileUpdate {
            year: Some("Final Year".to_owned()),
            ..ProfileUpdate::default()
        };
        update.apply(&mut profile, now).unwrap();
        assert_eq!(profile.year.as_deref(), Some("Final Year"));
        assert_eq!(profile.name, "John Student");
    }
}
