//! Team follow repository.

use std::sync::Arc;

use crate::entities::{TeamFollow, team_follow};
use futsalgo_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Team follow repository for database operations.
#[derive(Clone)]
pub struct TeamFollowRepository {
    db: Arc<DatabaseConnection>,
}

impl TeamFollowRepository {
    /// Create a new team follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a team follow by user and team.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        team_id: &str,
    ) -> AppResult<Option<team_follow::Model>> {
        TeamFollow::find()
            .filter(team_follow::Column::UserId.eq(user_id))
            .filter(team_follow::Column::TeamId.eq(team_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following a team.
    pub async fn is_following(&self, user_id: &str, team_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, team_id).await?.is_some())
    }

    /// Create a new team follow.
    pub async fn create(&self, model: team_follow::ActiveModel) -> AppResult<team_follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a team follow by pair.
    pub async fn delete_by_pair(&self, user_id: &str, team_id: &str) -> AppResult<()> {
        let follow = self.find_by_pair(user_id, team_id).await?;
        if let Some(f) = follow {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get followers of a team (paginated).
    pub async fn find_by_team(
        &self,
        team_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<team_follow::Model>> {
        let mut query = TeamFollow::find()
            .filter(team_follow::Column::TeamId.eq(team_id))
            .order_by_desc(team_follow::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(team_follow::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a team.
    pub async fn count_by_team(&self, team_id: &str) -> AppResult<u64> {
        TeamFollow::find()
            .filter(team_follow::Column::TeamId.eq(team_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_follow(id: &str, user_id: &str, team_id: &str) -> team_follow::Model {
        team_follow::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            team_id: team_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_is_following_true() {
        let follow = create_test_follow("tf1", "user1", "team1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[follow.clone()]])
                .into_connection(),
        );

        let repo = TeamFollowRepository::new(db);
        let result = repo.is_following("user1", "team1").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<team_follow::Model>::new()])
                .into_connection(),
        );

        let repo = TeamFollowRepository::new(db);
        let result = repo.is_following("user1", "team1").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_find_by_team() {
        let f1 = create_test_follow("tf1", "user1", "team1");
        let f2 = create_test_follow("tf2", "user2", "team1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = TeamFollowRepository::new(db);
        let result = repo.find_by_team("team1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count_by_team() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(12))
                }]])
                .into_connection(),
        );

        let repo = TeamFollowRepository::new(db);
        let count = repo.count_by_team("team1").await.unwrap();

        assert_eq!(count, 12);
    }
}
