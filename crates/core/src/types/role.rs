//! Platform role type.
//!
//! Roles are stored by display name in both the users table and the session
//! record (`role_name`). Unknown names pass through as [`Role::Other`] so a
//! new role added in one service does not break token validation in another.

use serde::{Deserialize, Serialize};

/// A user's role within the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Back-office staff with access to `/admin` routes.
    Admin,
    /// Shop customer; denied all `/admin` routes.
    Customer,
    /// A role name this crate does not know about.
    Other(String),
}

impl Role {
    /// The display name as stored in the database and session record.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::Customer => "Customer",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Admin" => Self::Admin,
            "Customer" => Self::Customer,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_round_trip() {
        assert_eq!(Role::from("Admin"), Role::Admin);
        assert_eq!(Role::from("Customer"), Role::Customer);
        assert_eq!(Role::Customer.as_str(), "Customer");
    }

    #[test]
    fn test_unknown_role_passes_through() {
        let role = Role::from("Warehouse");
        assert_eq!(role, Role::Other("Warehouse".to_owned()));
        assert_eq!(role.as_str(), "Warehouse");
    }

    #[test]
    fn test_serde_by_name() {
        let json = serde_json::to_string(&Role::Customer).expect("serialize");
        assert_eq!(json, "\"Customer\"");
        let back: Role = serde_json::from_str("\"Admin\"").expect("deserialize");
        assert_eq!(back, Role::Admin);
    }
}
