use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // No foreign key on user_id: entries must survive user deletion.
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::UserId).integer().null())
                    .col(ColumnDef::new(ActivityLogs::Action).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::EntityType).string().null())
                    .col(ColumnDef::new(ActivityLogs::EntityId).integer().null())
                    .col(ColumnDef::new(ActivityLogs::Details).string().null())
                    .col(ColumnDef::new(ActivityLogs::IpAddress).string().null())
                    .col(ColumnDef::new(ActivityLogs::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_created_at")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_user_id")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_action")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Action)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    EntityType,
    EntityId,
    Details,
    IpAddress,
    CreatedAt,
}
