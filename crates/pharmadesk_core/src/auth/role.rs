//! User roles and request identity.

use crate::model::note::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Role string for regular staff accounts.
pub const ROLE_USER: &str = "user";
/// Role string for administrators.
pub const ROLE_ADMIN: &str = "admin";
/// Role string for super administrators.
pub const ROLE_SUPERADMIN: &str = "superadmin";

/// Account role attached to an authenticated identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Stable string id used by account records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Admin => ROLE_ADMIN,
            Self::SuperAdmin => ROLE_SUPERADMIN,
        }
    }

    /// Returns whether this role may use admin-gated operations.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(RoleParseError::EmptyRole);
        }

        match normalized {
            ROLE_USER => Ok(Self::User),
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_SUPERADMIN => Ok(Self::SuperAdmin),
            other => Err(RoleParseError::UnsupportedRole(other.to_string())),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    EmptyRole,
    UnsupportedRole(String),
}

impl Display for RoleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRole => write!(f, "role value must not be empty"),
            Self::UnsupportedRole(value) => write!(f, "role is unsupported: {value}"),
        }
    }
}

impl Error for RoleParseError {}

/// Authenticated identity resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}
