//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::constants::actions;
use crate::db::{InsertOutcome, NewUser, Store};
use crate::models::{NewActivity, Role, SessionUser, User, UserPatch};
use crate::services::activity::ActivityLogger;
use crate::services::password::{self, PasswordService};
use crate::services::user_service::{CreateUserInput, UserError, UserService};

const DUPLICATE_USER: &str = "Username or email already exists";

pub struct SeaOrmUserService {
    store: Store,
    passwords: Arc<PasswordService>,
    activity: ActivityLogger,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, passwords: Arc<PasswordService>, activity: ActivityLogger) -> Self {
        Self {
            store,
            passwords,
            activity,
        }
    }

    async fn require_user(&self, id: i32) -> Result<User, UserError> {
        self.store.get_user(id).await?.ok_or(UserError::NotFound(id))
    }
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn ensure_not_self(actor: &SessionUser, target_id: i32, msg: &str) -> Result<(), UserError> {
    if actor.id == target_id {
        return Err(UserError::SelfAction(msg.to_string()));
    }
    Ok(())
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users(None).await?)
    }

    async fn create_user(
        &self,
        actor: &SessionUser,
        input: CreateUserInput,
        ip: Option<String>,
    ) -> Result<User, UserError> {
        let (Some(username), Some(email), Some(password), Some(role)) = (
            required(input.username),
            required(input.email),
            input.password.filter(|p| !p.is_empty()),
            required(input.role),
        ) else {
            return Err(UserError::Validation("All fields are required".to_string()));
        };

        let role: Role = role
            .parse()
            .map_err(|_| UserError::Validation("Invalid user role".to_string()))?;

        if let Some(msg) = password::check_length(&password) {
            return Err(UserError::Validation(msg));
        }

        if self.store.username_or_email_taken(&username, &email).await? {
            return Err(UserError::Conflict(DUPLICATE_USER.to_string()));
        }

        let password_hash = self.passwords.hash(&password).await?;

        let user = match self
            .store
            .insert_user(NewUser {
                username,
                email,
                password_hash,
                role,
            })
            .await?
        {
            InsertOutcome::Created(user) => user,
            InsertOutcome::Duplicate => {
                return Err(UserError::Conflict(DUPLICATE_USER.to_string()));
            }
        };

        self.activity
            .record(
                NewActivity::new(Some(actor.id), actions::CREATE_USER)
                    .entity(actions::ENTITY_USER, user.id)
                    .details(format!("Created user {} ({})", user.username, user.role))
                    .ip(ip),
            )
            .await;

        info!(actor = %actor.username, user_id = user.id, role = %user.role, "Created user: {}", user.username);

        Ok(user)
    }

    async fn reset_password(
        &self,
        actor: &SessionUser,
        target_id: i32,
        new_password: &str,
        ip: Option<String>,
    ) -> Result<(), UserError> {
        if new_password.is_empty() {
            return Err(UserError::Validation("New password is required".to_string()));
        }

        if let Some(msg) = password::check_length(new_password) {
            return Err(UserError::Validation(msg));
        }

        let target = self.require_user(target_id).await?;
        let password_hash = self.passwords.hash(new_password).await?;

        if !self
            .store
            .update_user(target_id, UserPatch::password_hash(password_hash))
            .await?
        {
            return Err(UserError::NotFound(target_id));
        }

        self.activity
            .record(
                NewActivity::new(Some(actor.id), actions::RESET_PASSWORD)
                    .entity(actions::ENTITY_USER, target_id)
                    .details(format!("Reset password for user {}", target.username))
                    .ip(ip),
            )
            .await;

        info!(actor = %actor.username, user_id = target_id, "Reset password for user: {}", target.username);

        Ok(())
    }

    async fn toggle_status(
        &self,
        actor: &SessionUser,
        target_id: i32,
        ip: Option<String>,
    ) -> Result<bool, UserError> {
        ensure_not_self(actor, target_id, "You cannot deactivate your own account")?;

        let target = self.require_user(target_id).await?;
        let is_active = self
            .store
            .toggle_user_active(target_id)
            .await?
            .ok_or(UserError::NotFound(target_id))?;

        let verb = if is_active { "Activated" } else { "Deactivated" };

        self.activity
            .record(
                NewActivity::new(Some(actor.id), actions::TOGGLE_USER_STATUS)
                    .entity(actions::ENTITY_USER, target_id)
                    .details(format!("{verb} user {}", target.username))
                    .ip(ip),
            )
            .await;

        info!(actor = %actor.username, user_id = target_id, is_active, "{verb} user: {}", target.username);

        Ok(is_active)
    }

    async fn delete_user(
        &self,
        actor: &SessionUser,
        target_id: i32,
        ip: Option<String>,
    ) -> Result<(), UserError> {
        ensure_not_self(actor, target_id, "You cannot delete your own account")?;

        let target = self.require_user(target_id).await?;

        if !self.store.delete_user(target_id).await? {
            return Err(UserError::NotFound(target_id));
        }

        self.activity
            .record(
                NewActivity::new(Some(actor.id), actions::DELETE_USER)
                    .entity(actions::ENTITY_USER, target_id)
                    .details(format!("Deleted user {}", target.username))
                    .ip(ip),
            )
            .await;

        info!(actor = %actor.username, user_id = target_id, "Deleted user: {}", target.username);

        Ok(())
    }
}
