use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(TaskStatus::Enum)
                    .values([
                        TaskStatus::Pending,
                        TaskStatus::InProgress,
                        TaskStatus::Completed,
                        TaskStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(TaskPriority::Enum)
                    .values([TaskPriority::Low, TaskPriority::Medium, TaskPriority::High])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(pk_uuid(Tasks::Id))
                    .col(string_len(Tasks::Title, 255))
                    .col(text_null(Tasks::Description))
                    .col(
                        ColumnDef::new(Tasks::Status)
                            .enumeration(
                                TaskStatus::Enum,
                                [
                                    TaskStatus::Pending,
                                    TaskStatus::InProgress,
                                    TaskStatus::Completed,
                                    TaskStatus::Cancelled,
                                ],
                            )
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .enumeration(
                                TaskPriority::Enum,
                                [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High],
                            )
                            .null(),
                    )
                    .col(timestamp_with_time_zone_null(Tasks::DueDate))
                    .col(
                        timestamp_with_time_zone(Tasks::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Tasks::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_status")
                    .table(Tasks::Table)
                    .col(Tasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_priority")
                    .table(Tasks::Table)
                    .col(Tasks::Priority)
                    .to_owned(),
            )
            .await?;

        // Backs the default list ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_created_at_id")
                    .table(Tasks::Table)
                    .col((Tasks::CreatedAt, IndexOrder::Desc))
                    .col((Tasks::Id, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_type(Type::drop().if_exists().name(TaskPriority::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().if_exists().name(TaskStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TaskStatus {
    #[sea_orm(iden = "task_status")]
    Enum,
    #[sea_orm(iden = "PENDING")]
    Pending,
    #[sea_orm(iden = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(iden = "COMPLETED")]
    Completed,
    #[sea_orm(iden = "CANCELLED")]
    Cancelled,
}

#[derive(DeriveIden)]
enum TaskPriority {
    #[sea_orm(iden = "task_priority")]
    Enum,
    #[sea_orm(iden = "LOW")]
    Low,
    #[sea_orm(iden = "MEDIUM")]
    Medium,
    #[sea_orm(iden = "HIGH")]
    High,
}
