use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::users;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role: {0}")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// User row without the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl TryFrom<users::Model> for User {
    type Error = InvalidRole;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            role: model.role.parse()?,
            username: model.username,
            email: model.email,
            is_active: model.is_active,
            created_at: model.created_at,
            last_login: model.last_login,
        })
    }
}

/// Non-sensitive identity returned by login and user creation.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Fresh view of the logged-in user for `GET /auth/me`.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// Identity cached in the session at login. The role may lag behind the
/// `users` row until the next login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Partial update of a user row; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
    pub last_login: Option<String>,
}

impl UserPatch {
    #[must_use]
    pub fn password_hash(hash: String) -> Self {
        Self {
            password_hash: Some(hash),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_active(active: bool) -> Self {
        Self {
            is_active: Some(active),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn last_login(at: String) -> Self {
        Self {
            last_login: Some(at),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.password_hash.is_none() && self.is_active.is_none() && self.last_login.is_none()
    }
}
