//! Caller roles with different permission levels.

use serde::{Deserialize, Serialize};

/// Role of the calling identity, as confirmed by the backend.
///
/// The client never assumes a role it hasn't had confirmed; catalog-mutating
/// operations are gated on [`Role::can_manage_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to catalog management.
    Admin,
    /// Authenticated shopper.
    User,
    /// Unauthenticated visitor, read-only catalog access.
    #[default]
    Guest,
}

impl Role {
    /// Whether this role may create, update, or delete products.
    #[must_use]
    pub const fn can_manage_catalog(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
            Self::Guest => write!(f, "guest"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "guest" => Ok(Self::Guest),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
