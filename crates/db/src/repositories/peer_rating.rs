//! Peer rating repository.

use std::sync::Arc;

use crate::entities::{PeerRating, peer_rating};
use futsalgo_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Peer rating repository for database operations.
#[derive(Clone)]
pub struct PeerRatingRepository {
    db: Arc<DatabaseConnection>,
}

impl PeerRatingRepository {
    /// Create a new peer rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a rating by rater and subject.
    pub async fn find_by_pair(
        &self,
        rater_id: &str,
        subject_id: &str,
    ) -> AppResult<Option<peer_rating::Model>> {
        PeerRating::find()
            .filter(peer_rating::Column::RaterId.eq(rater_id))
            .filter(peer_rating::Column::SubjectId.eq(subject_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all ratings submitted for a subject.
    pub async fn find_by_subject(&self, subject_id: &str) -> AppResult<Vec<peer_rating::Model>> {
        PeerRating::find()
            .filter(peer_rating::Column::SubjectId.eq(subject_id))
            .order_by_asc(peer_rating::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new rating.
    pub async fn create(&self, model: peer_rating::ActiveModel) -> AppResult<peer_rating::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an existing rating.
    pub async fn update(&self, model: peer_rating::ActiveModel) -> AppResult<peer_rating::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_rating(id: &str, rater_id: &str, subject_id: &str) -> peer_rating::Model {
        peer_rating::Model {
            id: id.to_string(),
            rater_id: rater_id.to_string(),
            subject_id: subject_id.to_string(),
            shooting: 7.0,
            passing: 6.0,
            stamina: 8.0,
            physical: 5.0,
            dribbling: 7.0,
            defense: 6.0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let rating = create_test_rating("r1", "user2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[rating.clone()]])
                .into_connection(),
        );

        let repo = PeerRatingRepository::new(db);
        let result = repo.find_by_pair("user2", "user1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().shooting, 7.0);
    }

    #[tokio::test]
    async fn test_find_by_subject() {
        let r1 = create_test_rating("r1", "user2", "user1");
        let r2 = create_test_rating("r2", "user3", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = PeerRatingRepository::new(db);
        let result = repo.find_by_subject("user1").await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_subject_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<peer_rating::Model>::new()])
                .into_connection(),
        );

        let repo = PeerRatingRepository::new(db);
        let result = repo.find_by_subject("user1").await.unwrap();

        assert!(result.is_empty());
    }
}
