//! User service.

use chrono::Utc;
use futsalgo_common::{AppError, AppResult, IdGenerator};
use futsalgo_db::{entities::user, repositories::UserRepository};
use sea_orm::{ActiveValue, Set};

use crate::services::rating::RatingVector;

/// Profile fields accepted at registration and on profile updates.
#[derive(Debug, Clone, Default)]
pub struct UserProfileInput {
    pub name: Option<String>,
    pub city: Option<String>,
    pub position: Option<String>,
}

/// User service for registration, authentication, and profile updates.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a bearer token to a user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get a user by id, failing if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Register a new player with an optional self-assessment.
    ///
    /// Usernames are unique case-insensitively. The issued token is the
    /// caller's credential for subsequent requests.
    pub async fn register(
        &self,
        username: &str,
        profile: UserProfileInput,
        self_ratings: Option<&RatingVector>,
    ) -> AppResult<user::Model> {
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username '{username}' is already taken"
            )));
        }

        let ratings = self_ratings.cloned().unwrap_or_default();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.to_string()),
            username_lower: Set(username.to_lowercase()),
            token: Set(Some(self.id_gen.generate_token())),
            name: Set(profile.name),
            avatar_url: Set(None),
            city: Set(profile.city),
            position: Set(profile.position),
            self_shooting: Set(ratings.shooting),
            self_passing: Set(ratings.passing),
            self_stamina: Set(ratings.stamina),
            self_physical: Set(ratings.physical),
            self_dribbling: Set(ratings.dribbling),
            self_defense: Set(ratings.defense),
            followers_count: Set(0),
            following_count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: ActiveValue::NotSet,
        };
        self.user_repo.create(model).await
    }

    /// Replace a player's self-assessment.
    pub async fn update_self_assessment(
        &self,
        user_id: &str,
        ratings: &RatingVector,
    ) -> AppResult<user::Model> {
        // Ensure the row exists so the update error path stays clean
        self.user_repo.get_by_id(user_id).await?;

        let model = user::ActiveModel {
            id: Set(user_id.to_string()),
            self_shooting: Set(ratings.shooting),
            self_passing: Set(ratings.passing),
            self_stamina: Set(ratings.stamina),
            self_physical: Set(ratings.physical),
            self_dribbling: Set(ratings.dribbling),
            self_defense: Set(ratings.defense),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };
        self.user_repo.update(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            token: Some("token1".to_string()),
            name: None,
            avatar_url: None,
            city: None,
            position: None,
            self_shooting: 0.0,
            self_passing: 0.0,
            self_stamina: 0.0,
            self_physical: 0.0,
            self_dribbling: 0.0,
            self_defense: 0.0,
            followers_count: 0,
            following_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate_by_token_found() {
        let user = create_test_user("user1", "minsu");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate_by_token("token1").await.unwrap();

        assert_eq!(result.id, "user1");
    }

    #[tokio::test]
    async fn test_authenticate_by_token_unknown() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate_by_token("bogus").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let existing = create_test_user("user1", "minsu");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .register("MinSu", UserProfileInput::default(), None)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
