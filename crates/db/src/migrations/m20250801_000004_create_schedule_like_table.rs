//! Create schedule_like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScheduleLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScheduleLike::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ScheduleLike::ScheduleId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_like_user")
                            .from(ScheduleLike::Table, ScheduleLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_like_schedule")
                            .from(ScheduleLike::Table, ScheduleLike::ScheduleId)
                            .to(Schedule::Table, Schedule::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, schedule_id) - at most one like per pair,
        // backstop for the concurrent double-toggle race
        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_like_user_schedule")
                    .table(ScheduleLike::Table)
                    .col(ScheduleLike::UserId)
                    .col(ScheduleLike::ScheduleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: schedule_id (for listing a schedule's likes)
        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_like_schedule_id")
                    .table(ScheduleLike::Table)
                    .col(ScheduleLike::ScheduleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduleLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ScheduleLike {
    Table,
    Id,
    UserId,
    ScheduleId,
    CreatedAt,
}

#[derive(Iden)]
enum Schedule {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
