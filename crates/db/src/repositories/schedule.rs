//! Schedule repository.

use std::sync::Arc;

use crate::entities::{Schedule, schedule};
use futsalgo_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Schedule repository for database operations.
#[derive(Clone)]
pub struct ScheduleRepository {
    db: Arc<DatabaseConnection>,
}

impl ScheduleRepository {
    /// Create a new schedule repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a schedule by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<schedule::Model>> {
        Schedule::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a schedule by ID, failing if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<schedule::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ScheduleNotFound(id.to_string()))
    }

    /// Find schedules for a team (paginated).
    pub async fn find_by_team(
        &self,
        team_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<schedule::Model>> {
        let mut query = Schedule::find()
            .filter(schedule::Column::TeamId.eq(team_id))
            .order_by_desc(schedule::Column::Id);

        if let Some(id) = until_id {
            query = query.filter(schedule::Column::Id.lt(id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new schedule.
    pub async fn create(&self, model: schedule::ActiveModel) -> AppResult<schedule::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment like count atomically (single UPDATE query, no fetch).
    pub async fn increment_like_count(&self, schedule_id: &str) -> AppResult<()> {
        Schedule::update_many()
            .col_expr(
                schedule::Column::LikeCount,
                Expr::col(schedule::Column::LikeCount).add(1),
            )
            .filter(schedule::Column::Id.eq(schedule_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement like count atomically (single UPDATE query, no fetch).
    pub async fn decrement_like_count(&self, schedule_id: &str) -> AppResult<()> {
        Schedule::update_many()
            .col_expr(
                schedule::Column::LikeCount,
                Expr::cust("GREATEST(like_count - 1, 0)"),
            )
            .filter(schedule::Column::Id.eq(schedule_id))
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

    fn create_test_schedule(id: &str, team_id: &str) -> schedule::Model {
        schedule::Model {
            id: id.to_string(),
            team_id: team_id.to_string(),
            created_by: "user1".to_string(),
            opponent: Some("FC Mapo".to_string()),
            venue: Some("Hongdae Futsal Park".to_string()),
            starts_at: Utc::now().into(),
            like_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let schedule = create_test_schedule("s1", "team1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[schedule.clone()]])
                .into_connection(),
        );

        let repo = ScheduleRepository::new(db);
        let result = repo.find_by_id("s1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().team_id, "team1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<schedule::Model>::new()])
                .into_connection(),
        );

        let repo = ScheduleRepository::new(db);
        let result = repo.get_by_id("ghost").await;

        assert!(matches!(result, Err(AppError::ScheduleNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_team() {
        let s1 = create_test_schedule("s1", "team1");
        let s2 = create_test_schedule("s2", "team1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[s1, s2]])
                .into_connection(),
        );

        let repo = ScheduleRepository::new(db);
        let result = repo.find_by_team("team1", 10, None).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
