//! Create peer_rating table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PeerRating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PeerRating::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PeerRating::RaterId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(PeerRating::SubjectId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PeerRating::Shooting).double().not_null())
                    .col(ColumnDef::new(PeerRating::Passing).double().not_null())
                    .col(ColumnDef::new(PeerRating::Stamina).double().not_null())
                    .col(ColumnDef::new(PeerRating::Physical).double().not_null())
                    .col(ColumnDef::new(PeerRating::Dribbling).double().not_null())
                    .col(ColumnDef::new(PeerRating::Defense).double().not_null())
                    .col(
                        ColumnDef::new(PeerRating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PeerRating::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_peer_rating_rater")
                            .from(PeerRating::Table, PeerRating::RaterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_peer_rating_subject")
                            .from(PeerRating::Table, PeerRating::SubjectId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (rater_id, subject_id) - one rating per rater per subject
        manager
            .create_index(
                Index::create()
                    .name("idx_peer_rating_rater_subject")
                    .table(PeerRating::Table)
                    .col(PeerRating::RaterId)
                    .col(PeerRating::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: subject_id (for aggregating a player's ratings)
        manager
            .create_index(
                Index::create()
                    .name("idx_peer_rating_subject_id")
                    .table(PeerRating::Table)
                    .col(PeerRating::SubjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PeerRating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PeerRating {
    Table,
    Id,
    RaterId,
    SubjectId,
    Shooting,
    Passing,
    Stamina,
    Physical,
    Dribbling,
    Defense,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
