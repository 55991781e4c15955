//! Domain service for administrative user management.

use thiserror::Error;

use crate::models::{SessionUser, User};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("User {0} not found")]
    NotFound(i32),

    /// An admin tried to disable or delete their own account.
    #[error("{0}")]
    SelfAction(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// Raw create-user input as submitted; validated by the service.
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Administrative operations. Every caller is an authenticated admin; the
/// acting user is passed explicitly for self-protection checks and auditing.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// # Errors
    ///
    /// [`UserError::Validation`] for missing fields, an unknown role or a short
    /// password; [`UserError::Conflict`] when the username or email is taken.
    async fn create_user(
        &self,
        actor: &SessionUser,
        input: CreateUserInput,
        ip: Option<String>,
    ) -> Result<User, UserError>;

    async fn reset_password(
        &self,
        actor: &SessionUser,
        target_id: i32,
        new_password: &str,
        ip: Option<String>,
    ) -> Result<(), UserError>;

    /// Returns the new `is_active` value.
    async fn toggle_status(
        &self,
        actor: &SessionUser,
        target_id: i32,
        ip: Option<String>,
    ) -> Result<bool, UserError>;

    async fn delete_user(
        &self,
        actor: &SessionUser,
        target_id: i32,
        ip: Option<String>,
    ) -> Result<(), UserError>;
}
