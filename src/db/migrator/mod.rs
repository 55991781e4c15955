use sea_orm_migration::prelude::*;

pub mod m20260101_create_users;
mod m20260102_create_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_create_users::Migration),
            Box::new(m20260102_create_activity_logs::Migration),
        ]
    }
}
