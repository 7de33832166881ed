//! User follow repository.

use std::sync::Arc;

use crate::entities::{UserFollow, user_follow};
use futsalgo_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// User follow repository for database operations.
#[derive(Clone)]
pub struct UserFollowRepository {
    db: Arc<DatabaseConnection>,
}

impl UserFollowRepository {
    /// Create a new user follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow relationship by follower and followee.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Option<user_follow::Model>> {
        UserFollow::find()
            .filter(user_follow::Column::FollowerId.eq(follower_id))
            .filter(user_follow::Column::FolloweeId.eq(followee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, followee_id).await?.is_some())
    }

    /// Create a new follow relationship.
    pub async fn create(&self, model: user_follow::ActiveModel) -> AppResult<user_follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a follow relationship by pair.
    pub async fn delete_by_pair(&self, follower_id: &str, followee_id: &str) -> AppResult<()> {
        let follow = self.find_by_pair(follower_id, followee_id).await?;
        if let Some(f) = follow {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get users that a user is following (paginated).
    pub async fn find_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user_follow::Model>> {
        let mut query = UserFollow::find()
            .filter(user_follow::Column::FollowerId.eq(user_id))
            .order_by_desc(user_follow::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(user_follow::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get users that are following a user (paginated).
    pub async fn find_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user_follow::Model>> {
        let mut query = UserFollow::find()
            .filter(user_follow::Column::FolloweeId.eq(user_id))
            .order_by_desc(user_follow::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(user_follow::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        UserFollow::find()
            .filter(user_follow::Column::FolloweeId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count following of a user.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        UserFollow::find()
            .filter(user_follow::Column::FollowerId.eq(user_id))
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

    fn create_test_follow(id: &str, follower_id: &str, followee_id: &str) -> user_follow::Model {
        user_follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let follow = create_test_follow("f1", "user1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[follow.clone()]])
                .into_connection(),
        );

        let repo = UserFollowRepository::new(db);
        let result = repo.find_by_pair("user1", "user2").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.follower_id, "user1");
        assert_eq!(found.followee_id, "user2");
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user_follow::Model>::new()])
                .into_connection(),
        );

        let repo = UserFollowRepository::new(db);
        let result = repo.is_following("user1", "user3").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_find_followers() {
        let f1 = create_test_follow("f1", "user2", "user1");
        let f2 = create_test_follow("f2", "user3", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = UserFollowRepository::new(db);
        let result = repo.find_followers("user1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_following() {
        let f1 = create_test_follow("f1", "user1", "user2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1]])
                .into_connection(),
        );

        let repo = UserFollowRepository::new(db);
        let result = repo.find_following("user1", 10, None).await.unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_count_followers() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(7))
                }]])
                .into_connection(),
        );

        let repo = UserFollowRepository::new(db);
        let count = repo.count_followers("user1").await.unwrap();

        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn test_count_following() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let repo = UserFollowRepository::new(db);
        let count = repo.count_following("user1").await.unwrap();

        assert_eq!(count, 3);
    }
}
