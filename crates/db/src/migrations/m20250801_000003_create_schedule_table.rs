//! Create schedule table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedule::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedule::TeamId).string_len(32).not_null())
                    .col(ColumnDef::new(Schedule::CreatedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Schedule::Opponent).string_len(128))
                    .col(ColumnDef::new(Schedule::Venue).string_len(256))
                    .col(
                        ColumnDef::new(Schedule::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Schedule::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Schedule::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_team")
                            .from(Schedule::Table, Schedule::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_creator")
                            .from(Schedule::Table, Schedule::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: team_id (for listing a team's schedules)
        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_team_id")
                    .table(Schedule::Table)
                    .col(Schedule::TeamId)
                    .to_owned(),
            )
            .await?;

        // Index: starts_at (for upcoming-match queries)
        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_starts_at")
                    .table(Schedule::Table)
                    .col(Schedule::StartsAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Schedule::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Schedule {
    Table,
    Id,
    TeamId,
    CreatedBy,
    Opponent,
    Venue,
    StartsAt,
    LikeCount,
    CreatedAt,
}

#[derive(Iden)]
enum Team {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
