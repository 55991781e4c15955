use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::GeneralConfig;
use crate::entities::users;
use crate::models::{ActivityLogEntry, LogFilter, NewActivity, User, UserPatch};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{InsertOutcome, NewUser};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn from_config(general: &GeneralConfig) -> Result<Self> {
        Self::with_pool_options(
            &general.database_url,
            general.max_db_connections,
            general.min_db_connections,
            Duration::from_secs(general.db_timeout_seconds),
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        timeout: Duration,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every connection to an in-memory database sees its own empty database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn activity_repo(&self) -> repositories::activity_log::ActivityLogRepository {
        repositories::activity_log::ActivityLogRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn find_user_for_login(&self, identifier: &str) -> Result<Option<users::Model>> {
        self.user_repo().find_for_login(identifier).await
    }

    pub async fn find_user_model(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().find_model_by_id(id).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn list_users(&self, limit: Option<u64>) -> Result<Vec<User>> {
        self.user_repo().list(limit).await
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo()
            .username_or_email_taken(username, email)
            .await
    }

    pub async fn insert_user(&self, new_user: NewUser) -> Result<InsertOutcome> {
        self.user_repo().insert(new_user).await
    }

    pub async fn update_user(&self, id: i32, patch: UserPatch) -> Result<bool> {
        self.user_repo().update(id, patch).await
    }

    pub async fn toggle_user_active(&self, id: i32) -> Result<Option<bool>> {
        self.user_repo().toggle_active(id).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    // ========================================================================
    // Activity logs
    // ========================================================================

    pub async fn add_activity(&self, activity: NewActivity) -> Result<()> {
        self.activity_repo().add(activity).await
    }

    pub async fn get_activity_page(
        &self,
        filter: &LogFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<ActivityLogEntry>, u64)> {
        self.activity_repo().get_page(filter, page, limit).await
    }

    pub async fn distinct_activity_actions(&self) -> Result<Vec<String>> {
        self.activity_repo().distinct_actions().await
    }
}
