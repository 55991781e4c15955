//! Domain service for authentication.
//!
//! Handles credential checks, the current-user lookup and self-service
//! password changes. Session storage itself lives at the HTTP layer.

use thiserror::Error;

use crate::models::{SessionUser, User, UserInfo};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown account or wrong password. Deliberately identical for both.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials (username or email), stamps the last-login time
    /// and records a `login` entry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown account or a
    /// wrong password and [`AuthError::AccountDisabled`] for an inactive
    /// account, whatever the password.
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        ip: Option<String>,
    ) -> Result<User, AuthError>;

    /// Records a `logout` entry. Never fails.
    async fn logout(&self, user: &SessionUser, ip: Option<String>);

    /// Reads the user row behind a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] when the row has been deleted.
    async fn current_user(&self, user_id: i32) -> Result<UserInfo, AuthError>;

    /// Changes the caller's own password after re-verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a short new password and
    /// [`AuthError::InvalidCredentials`] if the current password is wrong.
    async fn change_password(
        &self,
        user: &SessionUser,
        current_password: &str,
        new_password: &str,
        ip: Option<String>,
    ) -> Result<(), AuthError>;
}
