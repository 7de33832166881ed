//! Team service.

use chrono::Utc;
use futsalgo_common::{AppResult, IdGenerator};
use futsalgo_db::{
    entities::team,
    repositories::{TeamRepository, UserRepository},
};
use sea_orm::Set;

/// Team service for creating and reading teams.
#[derive(Clone)]
pub struct TeamService {
    team_repo: TeamRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl TeamService {
    /// Create a new team service.
    #[must_use]
    pub fn new(team_repo: TeamRepository, user_repo: UserRepository) -> Self {
        Self {
            team_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a team by id, failing if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<team::Model> {
        self.team_repo.get_by_id(id).await
    }

    /// Create a team owned by an existing user.
    pub async fn create(
        &self,
        name: &str,
        owner_id: &str,
        city: Option<String>,
        description: Option<String>,
    ) -> AppResult<team::Model> {
        self.user_repo.get_by_id(owner_id).await?;

        let model = team::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            city: Set(city),
            description: Set(description),
            owner_id: Set(owner_id.to_string()),
            followers_count: Set(0),
            created_at: Set(Utc::now().into()),
        };
        self.team_repo.create(model).await
    }

    /// List teams owned by a user.
    pub async fn list_by_owner(&self, owner_id: &str, limit: u64) -> AppResult<Vec<team::Model>> {
        self.team_repo.find_by_owner(owner_id, limit).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futsalgo_common::AppError;
    use futsalgo_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_rejects_missing_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = TeamService::new(TeamRepository::new(Arc::clone(&db)), UserRepository::new(db));
        let result = service.create("FC Test", "ghost", None, None).await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }
}
