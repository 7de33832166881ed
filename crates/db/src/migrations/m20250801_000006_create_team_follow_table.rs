//! Create team_follow table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeamFollow::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamFollow::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamFollow::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(TeamFollow::TeamId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(TeamFollow::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_follow_user")
                            .from(TeamFollow::Table, TeamFollow::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_follow_team")
                            .from(TeamFollow::Table, TeamFollow::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, team_id) - prevent duplicate follows
        manager
            .create_index(
                Index::create()
                    .name("idx_team_follow_user_team")
                    .table(TeamFollow::Table)
                    .col(TeamFollow::UserId)
                    .col(TeamFollow::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: team_id (for listing a team's followers)
        manager
            .create_index(
                Index::create()
                    .name("idx_team_follow_team_id")
                    .table(TeamFollow::Table)
                    .col(TeamFollow::TeamId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamFollow::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TeamFollow {
    Table,
    Id,
    UserId,
    TeamId,
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
