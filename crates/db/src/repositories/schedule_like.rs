//! Schedule like repository.

use std::sync::Arc;

use crate::entities::{ScheduleLike, schedule_like};
use futsalgo_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Schedule like repository for database operations.
#[derive(Clone)]
pub struct ScheduleLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ScheduleLikeRepository {
    /// Create a new schedule like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and schedule.
    pub async fn find_by_pair(
        &self,
        user_id: &str,
        schedule_id: &str,
    ) -> AppResult<Option<schedule_like::Model>> {
        ScheduleLike::find()
            .filter(schedule_like::Column::UserId.eq(user_id))
            .filter(schedule_like::Column::ScheduleId.eq(schedule_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has liked a schedule.
    pub async fn has_liked(&self, user_id: &str, schedule_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(user_id, schedule_id).await?.is_some())
    }

    /// Create a new like.
    pub async fn create(&self, model: schedule_like::ActiveModel) -> AppResult<schedule_like::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a like by pair.
    pub async fn delete_by_pair(&self, user_id: &str, schedule_id: &str) -> AppResult<()> {
        let like = self.find_by_pair(user_id, schedule_id).await?;
        if let Some(l) = like {
            l.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Get likes of a schedule (paginated).
    pub async fn find_by_schedule(
        &self,
        schedule_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<schedule_like::Model>> {
        let mut query = ScheduleLike::find()
            .filter(schedule_like::Column::ScheduleId.eq(schedule_id))
            .order_by_desc(schedule_like::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(schedule_like::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes of a schedule.
    pub async fn count_by_schedule(&self, schedule_id: &str) -> AppResult<u64> {
        ScheduleLike::find()
            .filter(schedule_like::Column::ScheduleId.eq(schedule_id))
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

    fn create_test_like(id: &str, user_id: &str, schedule_id: &str) -> schedule_like::Model {
        schedule_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            schedule_id: schedule_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_liked_true() {
        let like = create_test_like("l1", "user1", "s1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like.clone()]])
                .into_connection(),
        );

        let repo = ScheduleLikeRepository::new(db);
        let result = repo.has_liked("user1", "s1").await.unwrap();

        assert!(result);
    }

    #[tokio::test]
    async fn test_has_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<schedule_like::Model>::new()])
                .into_connection(),
        );

        let repo = ScheduleLikeRepository::new(db);
        let result = repo.has_liked("user1", "s1").await.unwrap();

        assert!(!result);
    }

    #[tokio::test]
    async fn test_find_by_schedule() {
        let l1 = create_test_like("l1", "user1", "s1");
        let l2 = create_test_like("l2", "user2", "s1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = ScheduleLikeRepository::new(db);
        let result = repo.find_by_schedule("s1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count_by_schedule() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(4))
                }]])
                .into_connection(),
        );

        let repo = ScheduleLikeRepository::new(db);
        let count = repo.count_by_schedule("s1").await.unwrap();

        assert_eq!(count, 4);
    }
}
