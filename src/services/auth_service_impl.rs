//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use crate::constants::actions;
use crate::db::Store;
use crate::models::{NewActivity, SessionUser, User, UserInfo, UserPatch, timestamp_now};
use crate::services::activity::ActivityLogger;
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::password::{self, PasswordService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmAuthService {
    store: Store,
    passwords: Arc<PasswordService>,
    activity: ActivityLogger,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, passwords: Arc<PasswordService>, activity: ActivityLogger) -> Self {
        Self {
            store,
            passwords,
            activity,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        ip: Option<String>,
    ) -> Result<User, AuthError> {
        let Some(model) = self.store.find_user_for_login(identifier).await? else {
            self.passwords.verify_dummy(password).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !model.is_active {
            return Err(AuthError::AccountDisabled);
        }

        if !self.passwords.verify(password, &model.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let now = timestamp_now();
        self.store
            .update_user(model.id, UserPatch::last_login(now.clone()))
            .await?;

        let mut user = User::try_from(model).map_err(|e| AuthError::Internal(e.to_string()))?;
        user.last_login = Some(now);

        self.activity
            .record(
                NewActivity::new(Some(user.id), actions::LOGIN)
                    .details("User logged in")
                    .ip(ip),
            )
            .await;

        info!(user_id = user.id, username = %user.username, "User logged in");

        Ok(user)
    }

    async fn logout(&self, user: &SessionUser, ip: Option<String>) {
        self.activity
            .record(
                NewActivity::new(Some(user.id), actions::LOGOUT)
                    .details("User logged out")
                    .ip(ip),
            )
            .await;

        info!(user_id = user.id, username = %user.username, "User logged out");
    }

    async fn current_user(&self, user_id: i32) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn change_password(
        &self,
        user: &SessionUser,
        current_password: &str,
        new_password: &str,
        ip: Option<String>,
    ) -> Result<(), AuthError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(AuthError::Validation(
                "Current password and new password are required".to_string(),
            ));
        }

        if let Some(msg) = password::check_length(new_password) {
            return Err(AuthError::Validation(msg));
        }

        let model = self
            .store
            .find_user_model(user.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .passwords
            .verify(current_password, &model.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let new_hash = self.passwords.hash(new_password).await?;

        if !self
            .store
            .update_user(user.id, UserPatch::password_hash(new_hash))
            .await?
        {
            return Err(AuthError::UserNotFound);
        }

        self.activity
            .record(
                NewActivity::new(Some(user.id), actions::CHANGE_PASSWORD)
                    .entity(actions::ENTITY_USER, user.id)
                    .details("User changed their password")
                    .ip(ip),
            )
            .await;

        info!(user_id = user.id, "Password changed for user: {}", user.username);

        Ok(())
    }
}
