//! Profile roles.

use serde::{Deserialize, Serialize};

/// Role carried by a user profile.
///
/// The role is always read from the stored profile, never from request data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses approved events and registers for them.
    Student,
    /// Organizes events, which require admin approval.
    Faculty,
    /// Approves or rejects events and manages everything.
    Admin,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 3] = [Self::Student, Self::Faculty, Self::Admin];

    /// Path of the dashboard this role lands on after signing in.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Student => "/dashboard/student",
            Self::Faculty => "/dashboard/faculty",
            Self::Admin => "/dashboard/admin",
        }
    }

    /// Stable lowercase name, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::Student.dashboard_path(), "/dashboard/student");
        assert_eq!(Role::Faculty.dashboard_path(), "/dashboard/faculty");
        assert_eq!(Role::Admin.dashboard_path(), "/dashboard/admin");
    }
}
