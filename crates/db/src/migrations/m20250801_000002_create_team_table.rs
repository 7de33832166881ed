//! Create team table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Team::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Team::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Team::City).string_len(128))
                    .col(ColumnDef::new(Team::Description).text())
                    .col(ColumnDef::new(Team::OwnerId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Team::FollowersCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Team::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_owner")
                            .from(Team::Table, Team::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: owner_id (for listing a user's teams)
        manager
            .create_index(
                Index::create()
                    .name("idx_team_owner_id")
                    .table(Team::Table)
                    .col(Team::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Team {
    Table,
    Id,
    Name,
    City,
    Description,
    OwnerId,
    FollowersCount,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
