//! User entity and roles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission tier attached to a user
///
/// Roles travel as exact upper-case strings. Any other value (including a
/// differently-cased privileged name such as `"admin"`) deserializes to
/// [`Role::Unknown`] and is never granted anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Superuser,
    Admin,
    User,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superuser => "SUPERUSER",
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            id: 0,
            username: username.into(),
            role,
        }
    }
}

crate::impl_entity!(User, "user");
