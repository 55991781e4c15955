use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, sea_query::Expr,
};

use crate::entities::{prelude::*, users};
use crate::models::{Role, User, UserPatch, timestamp_now};

/// Input for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug)]
pub enum InsertOutcome {
    Created(User),
    /// Username or email collided with a unique index.
    Duplicate,
}

fn to_user(model: users::Model) -> Result<User> {
    User::try_from(model).context("Stored user has an unknown role")
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Row (including the password hash) whose username or email equals `identifier`.
    pub async fn find_for_login(&self, identifier: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(identifier))
                    .add(users::Column::Email.eq(identifier)),
            )
            .one(&self.conn)
            .await
            .context("Failed to query user by username or email")
    }

    /// Row including the password hash, for re-verifying a password.
    pub async fn find_model_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        self.find_model_by_id(id).await?.map(to_user).transpose()
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?
            .map(to_user)
            .transpose()
    }

    /// Users newest first; `limit` caps the result when set.
    pub async fn list(&self, limit: Option<u64>) -> Result<Vec<User>> {
        let mut query = Users::find()
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .all(&self.conn)
            .await
            .context("Failed to list users")?
            .into_iter()
            .map(to_user)
            .collect()
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool> {
        let count = Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(username))
                    .add(users::Column::Email.eq(email)),
            )
            .count(&self.conn)
            .await
            .context("Failed to check for existing users")?;

        Ok(count > 0)
    }

    pub async fn insert(&self, new_user: NewUser) -> Result<InsertOutcome> {
        let active = users::ActiveModel {
            id: NotSet,
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(timestamp_now()),
            last_login: Set(None),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(InsertOutcome::Created(to_user(model)?)),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err).context("Failed to insert user"),
        }
    }

    /// Writes only the fields present in `patch`. Returns `false` if no row has `id`.
    pub async fn update(&self, id: i32, patch: UserPatch) -> Result<bool> {
        if patch.is_empty() {
            return Ok(self.find_model_by_id(id).await?.is_some());
        }

        let active = users::ActiveModel {
            password_hash: patch.password_hash.map_or(NotSet, Set),
            is_active: patch.is_active.map_or(NotSet, Set),
            last_login: patch.last_login.map_or(NotSet, |at| Set(Some(at))),
            ..Default::default()
        };

        let result = Users::update_many()
            .set(active)
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update user")?;

        Ok(result.rows_affected > 0)
    }

    /// Flips `is_active` and returns the value this call wrote.
    ///
    /// The update only applies while the flag still holds the value read just
    /// before it, so concurrent toggles each report a distinct transition.
    pub async fn toggle_active(&self, id: i32) -> Result<Option<bool>> {
        loop {
            let Some(current) = self.find_model_by_id(id).await? else {
                return Ok(None);
            };
            let next = !current.is_active;

            let result = Users::update_many()
                .col_expr(users::Column::IsActive, Expr::value(next))
                .filter(users::Column::Id.eq(id))
                .filter(users::Column::IsActive.eq(current.is_active))
                .exec(&self.conn)
                .await
                .context("Failed to toggle user status")?;

            if result.rows_affected > 0 {
                return Ok(Some(next));
            }
        }
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected > 0)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
