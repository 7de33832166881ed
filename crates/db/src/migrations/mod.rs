//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250801_000001_create_user_table;
mod m20250801_000002_create_team_table;
mod m20250801_000003_create_schedule_table;
mod m20250801_000004_create_schedule_like_table;
mod m20250801_000005_create_user_follow_table;
mod m20250801_000006_create_team_follow_table;
mod m20250801_000007_create_peer_rating_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_user_table::Migration),
            Box::new(m20250801_000002_create_team_table::Migration),
            Box::new(m20250801_000003_create_schedule_table::Migration),
            Box::new(m20250801_000004_create_schedule_like_table::Migration),
            Box::new(m20250801_000005_create_user_follow_table::Migration),
            Box::new(m20250801_000006_create_team_follow_table::Migration),
            Box::new(m20250801_000007_create_peer_rating_table::Migration),
        ]
    }
}
