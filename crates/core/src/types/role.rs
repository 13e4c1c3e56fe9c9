//! Account roles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a [`UserRole`] from user input.
#[derive(Debug, Clone, Error)]
#[error("invalid role: {0}. Valid roles: user, admin")]
pub struct RoleError(pub String);

/// Role attached to a storefront account.
///
/// Only `admin` unlocks the admin panel; any role string the server sends
/// that this client does not know about decodes as [`UserRole::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper.
    #[default]
    User,
    /// Store administrator.
    Admin,
    /// Role not recognised by this client.
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_unknown_role_deserializes() {
        let role: UserRole = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, UserRole::Unknown);
        assert!(!role.is_admin());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }
}
