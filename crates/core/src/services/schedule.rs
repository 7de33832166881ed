//! Schedule service.

use chrono::{DateTime, FixedOffset, Utc};
use futsalgo_common::{AppResult, IdGenerator};
use futsalgo_db::{
    entities::schedule,
    repositories::{ScheduleRepository, TeamRepository},
};
use sea_orm::Set;

/// Schedule service for creating and reading match schedules.
#[derive(Clone)]
pub struct ScheduleService {
    schedule_repo: ScheduleRepository,
    team_repo: TeamRepository,
    id_gen: IdGenerator,
}

impl ScheduleService {
    /// Create a new schedule service.
    #[must_use]
    pub fn new(schedule_repo: ScheduleRepository, team_repo: TeamRepository) -> Self {
        Self {
            schedule_repo,
            team_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a schedule by id, failing if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<schedule::Model> {
        self.schedule_repo.get_by_id(id).await
    }

    /// Create a match schedule for a team.
    pub async fn create(
        &self,
        team_id: &str,
        created_by: &str,
        opponent: Option<String>,
        venue: Option<String>,
        starts_at: DateTime<FixedOffset>,
    ) -> AppResult<schedule::Model> {
        self.team_repo.get_by_id(team_id).await?;

        let model = schedule::ActiveModel {
            id: Set(self.id_gen.generate()),
            team_id: Set(team_id.to_string()),
            created_by: Set(created_by.to_string()),
            opponent: Set(opponent),
            venue: Set(venue),
            starts_at: Set(starts_at),
            like_count: Set(0),
            created_at: Set(Utc::now().into()),
        };
        self.schedule_repo.create(model).await
    }

    /// List schedules for a team, newest first.
    pub async fn list_by_team(
        &self,
        team_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<schedule::Model>> {
        self.schedule_repo.find_by_team(team_id, limit, until_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futsalgo_common::AppError;
    use futsalgo_db::entities::team;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_rejects_missing_team() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<team::Model>::new()])
                .into_connection(),
        );

        let service = ScheduleService::new(
            ScheduleRepository::new(Arc::clone(&db)),
            TeamRepository::new(db),
        );
        let result = service
            .create("ghost", "user1", None, None, Utc::now().into())
            .await;

        assert!(matches!(result, Err(AppError::TeamNotFound(_))));
    }
}
