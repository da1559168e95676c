//! Role claims embedded in vendor authentication tokens.

use serde::{Deserialize, Serialize};

/// Permission class carried in an authentication token's role claim.
///
/// The storefront only ever persists a session for [`Role::Vendor`]; any
/// other claim is rejected at the boundary instead of being carried around
/// as an unchecked string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A vendor account with access to the vendor dashboard.
    Vendor,
    /// A regular shopper account.
    User,
}

impl Role {
    /// Whether this role grants access to the vendor dashboard.
    #[must_use]
    pub const fn is_vendor(self) -> bool {
        matches!(self, Self::Vendor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vendor => write!(f, "vendor"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendor" => Ok(Self::Vendor),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("vendor".parse::<Role>(), Ok(Role::Vendor));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert_eq!(Role::Vendor.to_string(), "vendor");
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Vendor".parse::<Role>().is_err());
    }

    #[test]
    fn test_is_vendor() {
        assert!(Role::Vendor.is_vendor());
        assert!(!Role::User.is_vendor());
    }
}
