//! User accounts and access-token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Errors that can occur when parsing a [`Role`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct RoleError(String);

/// Access role carried by an account.
///
/// Registration only ever assigns [`Role::User`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
}

impl Role {
    /// Stored and serialized name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            other => Err(RoleError(other.to_owned())),
        }
    }
}

/// A user about to be inserted. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Claims encoded into a signed access token.
///
/// Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_role_round_trips_through_text() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_claims_shape() {
        let claims = AccessClaims {
            email: "ada@example.com".to_string(),
            role: Role::User,
            iat: 1_700_000_000,
            exp: 1_700_086_400,
        };
        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            json!({
                "email": "ada@example.com",
                "role": "user",
                "iat": 1_700_000_000,
                "exp": 1_700_086_400
            })
        );
    }
}
