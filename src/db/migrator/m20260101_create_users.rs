use crate::entities::prelude::*;
use crate::entities::users;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bootstrap account created with the schema; the password is meant to be
/// rotated through `/auth/change-password` or `holywins reset-password`.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@localhost";
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

fn hash_bootstrap_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(BOOTSTRAP_ADMIN_PASSWORD.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash bootstrap password: {e}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = crate::models::timestamp_now();
        let password_hash = hash_bootstrap_password()?;

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Users)
            .columns([
                users::Column::Username,
                users::Column::Email,
                users::Column::PasswordHash,
                users::Column::Role,
                users::Column::IsActive,
                users::Column::CreatedAt,
            ])
            .values([
                BOOTSTRAP_ADMIN_USERNAME.into(),
                BOOTSTRAP_ADMIN_EMAIL.into(),
                password_hash.into(),
                crate::models::Role::Admin.as_str().into(),
                true.into(),
                now.into(),
            ])
            .map_err(|e| DbErr::Custom(e.to_string()))?
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
