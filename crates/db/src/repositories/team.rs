//! Team repository.

use std::sync::Arc;

use crate::entities::{Team, team};
use futsalgo_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Team repository for database operations.
#[derive(Clone)]
pub struct TeamRepository {
    db: Arc<DatabaseConnection>,
}

impl TeamRepository {
    /// Create a new team repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<team::Model>> {
        Team::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a team by ID, failing if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<team::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TeamNotFound(id.to_string()))
    }

    /// Find teams owned by a user.
    pub async fn find_by_owner(&self, owner_id: &str, limit: u64) -> AppResult<Vec<team::Model>> {
        Team::find()
            .filter(team::Column::OwnerId.eq(owner_id))
            .order_by_desc(team::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new team.
    pub async fn create(&self, model: team::ActiveModel) -> AppResult<team::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment followers count atomically (single UPDATE query, no fetch).
    pub async fn increment_followers_count(&self, team_id: &str) -> AppResult<()> {
        Team::update_many()
            .col_expr(
                team::Column::FollowersCount,
                Expr::col(team::Column::FollowersCount).add(1),
            )
            .filter(team::Column::Id.eq(team_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement followers count atomically (single UPDATE query, no fetch).
    pub async fn decrement_followers_count(&self, team_id: &str) -> AppResult<()> {
        Team::update_many()
            .col_expr(
                team::Column::FollowersCount,
                Expr::cust("GREATEST(followers_count - 1, 0)"),
            )
            .filter(team::Column::Id.eq(team_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_team(id: &str, name: &str) -> team::Model {
        team::Model {
            id: id.to_string(),
            name: name.to_string(),
            city: Some("Busan".to_string()),
            description: None,
            owner_id: "user1".to_string(),
            followers_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let team = create_test_team("team1", "FC Haeundae");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[team.clone()]])
                .into_connection(),
        );

        let repo = TeamRepository::new(db);
        let result = repo.find_by_id("team1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "FC Haeundae");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<team::Model>::new()])
                .into_connection(),
        );

        let repo = TeamRepository::new(db);
        let result = repo.get_by_id("ghost").await;

        assert!(matches!(result, Err(AppError::TeamNotFound(_))));
    }
}
