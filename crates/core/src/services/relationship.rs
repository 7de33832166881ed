//! Relationship toggle service.
//!
//! One service handles the three directed-edge kinds: a user liking a
//! schedule, a user following another user, and a user following a team.
//! A toggle flips edge presence: delete when present, create when absent.
//! The lookup and the mutation are two store round-trips, so two concurrent
//! first-time toggles can race; the unique index on each edge table rejects
//! the losing insert and a repeated delete is a no-op.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futsalgo_common::{AppError, AppResult, IdGenerator};
use futsalgo_db::{
    entities::{schedule_like, team_follow, user_follow},
    repositories::{
        ScheduleLikeRepository, ScheduleRepository, TeamFollowRepository, TeamRepository,
        UserFollowRepository, UserRepository,
    },
};
use sea_orm::Set;
use serde::Serialize;

use crate::services::view::{ViewInvalidator, ViewTarget};

/// The kind of directed edge being toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// User likes a schedule.
    ScheduleLike,
    /// User follows another user.
    UserFollow,
    /// User follows a team.
    TeamFollow,
}

impl RelationshipKind {
    /// The cached view affected by a toggle against `target_id`.
    #[must_use]
    pub fn view_target(self, target_id: &str) -> ViewTarget {
        match self {
            Self::ScheduleLike => ViewTarget::Schedule(target_id.to_string()),
            Self::UserFollow => ViewTarget::UserProfile(target_id.to_string()),
            Self::TeamFollow => ViewTarget::TeamProfile(target_id.to_string()),
        }
    }

    const fn activated_message(self) -> &'static str {
        match self {
            Self::ScheduleLike => "Schedule liked",
            Self::UserFollow => "You are now following this player",
            Self::TeamFollow => "You are now following this team",
        }
    }

    const fn deactivated_message(self) -> &'static str {
        match self {
            Self::ScheduleLike => "Schedule like removed",
            Self::UserFollow => "You are no longer following this player",
            Self::TeamFollow => "You are no longer following this team",
        }
    }
}

/// Outcome of a toggle, in the uniform shape all three kinds share.
///
/// Toggles never surface raw errors: every failure is converted into
/// `success: false` with a user-facing message at this boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToggleResult {
    fn flipped(kind: RelationshipKind, active: bool) -> Self {
        let message = if active {
            kind.activated_message()
        } else {
            kind.deactivated_message()
        };
        Self {
            success: true,
            active: Some(active),
            message: Some(message.to_string()),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            active: None,
            message: None,
            error: Some(error.into()),
        }
    }

    fn from_error(err: &AppError) -> Self {
        let message = match err {
            AppError::Unauthorized => "Not authenticated",
            AppError::SelfReference => "You cannot follow yourself",
            AppError::UserNotFound(_) => "Player not found",
            AppError::ScheduleNotFound(_) => "Schedule not found",
            AppError::TeamNotFound(_) => "Team not found",
            AppError::NotFound(_) => "Not found",
            // Store and internal detail stays in the server log
            _ => {
                tracing::error!(error = %err, "Relationship toggle failed");
                "Something went wrong. Please try again"
            }
        };
        Self::failure(message)
    }
}

/// Store seam shared by the three edge kinds: presence check, insert, delete.
#[async_trait]
trait EdgeStore {
    async fn exists(&self, source_id: &str, target_id: &str) -> AppResult<bool>;
    async fn insert(&self, id: String, source_id: &str, target_id: &str) -> AppResult<()>;
    async fn remove(&self, source_id: &str, target_id: &str) -> AppResult<()>;
}

#[async_trait]
impl EdgeStore for ScheduleLikeRepository {
    async fn exists(&self, source_id: &str, target_id: &str) -> AppResult<bool> {
        self.has_liked(source_id, target_id).await
    }

    async fn insert(&self, id: String, source_id: &str, target_id: &str) -> AppResult<()> {
        let model = schedule_like::ActiveModel {
            id: Set(id),
            user_id: Set(source_id.to_string()),
            schedule_id: Set(target_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        self.create(model).await?;
        Ok(())
    }

    async fn remove(&self, source_id: &str, target_id: &str) -> AppResult<()> {
        self.delete_by_pair(source_id, target_id).await
    }
}

#[async_trait]
impl EdgeStore for UserFollowRepository {
    async fn exists(&self, source_id: &str, target_id: &str) -> AppResult<bool> {
        self.is_following(source_id, target_id).await
    }

    async fn insert(&self, id: String, source_id: &str, target_id: &str) -> AppResult<()> {
        let model = user_follow::ActiveModel {
            id: Set(id),
            follower_id: Set(source_id.to_string()),
            followee_id: Set(target_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        self.create(model).await?;
        Ok(())
    }

    async fn remove(&self, source_id: &str, target_id: &str) -> AppResult<()> {
        self.delete_by_pair(source_id, target_id).await
    }
}

#[async_trait]
impl EdgeStore for TeamFollowRepository {
    async fn exists(&self, source_id: &str, target_id: &str) -> AppResult<bool> {
        self.is_following(source_id, target_id).await
    }

    async fn insert(&self, id: String, source_id: &str, target_id: &str) -> AppResult<()> {
        let model = team_follow::ActiveModel {
            id: Set(id),
            user_id: Set(source_id.to_string()),
            team_id: Set(target_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        self.create(model).await?;
        Ok(())
    }

    async fn remove(&self, source_id: &str, target_id: &str) -> AppResult<()> {
        self.delete_by_pair(source_id, target_id).await
    }
}

/// Relationship service for toggling edges and reading edge state.
#[derive(Clone)]
pub struct RelationshipService {
    schedule_like_repo: ScheduleLikeRepository,
    user_follow_repo: UserFollowRepository,
    team_follow_repo: TeamFollowRepository,
    user_repo: UserRepository,
    team_repo: TeamRepository,
    schedule_repo: ScheduleRepository,
    invalidator: Arc<dyn ViewInvalidator>,
    id_gen: IdGenerator,
}

impl RelationshipService {
    /// Create a new relationship service.
    #[must_use]
    pub fn new(
        schedule_like_repo: ScheduleLikeRepository,
        user_follow_repo: UserFollowRepository,
        team_follow_repo: TeamFollowRepository,
        user_repo: UserRepository,
        team_repo: TeamRepository,
        schedule_repo: ScheduleRepository,
        invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            schedule_like_repo,
            user_follow_repo,
            team_follow_repo,
            user_repo,
            team_repo,
            schedule_repo,
            invalidator,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle an edge of the given kind between actor and target.
    ///
    /// The cached view of the target is invalidated after every call,
    /// success or failure, so no stale representation survives a partial
    /// state change.
    pub async fn toggle(
        &self,
        actor_id: &str,
        target_id: &str,
        kind: RelationshipKind,
    ) -> ToggleResult {
        let outcome = self.apply(actor_id, target_id, kind).await;

        if let Err(e) = self
            .invalidator
            .invalidate(&kind.view_target(target_id))
            .await
        {
            tracing::warn!(error = %e, target_id = %target_id, "Failed to invalidate cached view");
        }

        match outcome {
            Ok(active) => ToggleResult::flipped(kind, active),
            Err(e) => ToggleResult::from_error(&e),
        }
    }

    /// Toggle a like on a schedule.
    pub async fn toggle_schedule_like(&self, actor_id: &str, schedule_id: &str) -> ToggleResult {
        self.toggle(actor_id, schedule_id, RelationshipKind::ScheduleLike)
            .await
    }

    /// Toggle following another player.
    pub async fn toggle_user_follow(&self, actor_id: &str, target_user_id: &str) -> ToggleResult {
        self.toggle(actor_id, target_user_id, RelationshipKind::UserFollow)
            .await
    }

    /// Toggle following a team.
    pub async fn toggle_team_follow(&self, actor_id: &str, team_id: &str) -> ToggleResult {
        self.toggle(actor_id, team_id, RelationshipKind::TeamFollow)
            .await
    }

    async fn apply(
        &self,
        actor_id: &str,
        target_id: &str,
        kind: RelationshipKind,
    ) -> AppResult<bool> {
        if actor_id.is_empty() {
            return Err(AppError::Unauthorized);
        }

        match kind {
            RelationshipKind::ScheduleLike => {
                self.schedule_repo.get_by_id(target_id).await?;
                let active = self.flip(&self.schedule_like_repo, actor_id, target_id).await?;
                if active {
                    self.schedule_repo.increment_like_count(target_id).await?;
                } else {
                    self.schedule_repo.decrement_like_count(target_id).await?;
                }
                Ok(active)
            }
            RelationshipKind::UserFollow => {
                // Self-follow is rejected before any store access
                if actor_id == target_id {
                    return Err(AppError::SelfReference);
                }
                self.user_repo.get_by_id(target_id).await?;
                let active = self.flip(&self.user_follow_repo, actor_id, target_id).await?;
                if active {
                    self.user_repo.increment_following_count(actor_id).await?;
                    self.user_repo.increment_followers_count(target_id).await?;
                } else {
                    self.user_repo.decrement_following_count(actor_id).await?;
                    self.user_repo.decrement_followers_count(target_id).await?;
                }
                Ok(active)
            }
            RelationshipKind::TeamFollow => {
                self.team_repo.get_by_id(target_id).await?;
                let active = self.flip(&self.team_follow_repo, actor_id, target_id).await?;
                if active {
                    self.team_repo.increment_followers_count(target_id).await?;
                } else {
                    self.team_repo.decrement_followers_count(target_id).await?;
                }
                Ok(active)
            }
        }
    }

    /// Flip edge presence: delete when present, create when absent.
    ///
    /// Returns the new state (`true` = edge now exists). Not atomic against
    /// the store; the unique pair index is the backstop for concurrent
    /// creates.
    async fn flip<S: EdgeStore>(
        &self,
        store: &S,
        source_id: &str,
        target_id: &str,
    ) -> AppResult<bool> {
        if store.exists(source_id, target_id).await? {
            store.remove(source_id, target_id).await?;
            Ok(false)
        } else {
            store
                .insert(self.id_gen.generate(), source_id, target_id)
                .await?;
            Ok(true)
        }
    }

    // ==================== Read-side helpers ====================

    /// Check if a user has liked a schedule.
    pub async fn has_liked(&self, user_id: &str, schedule_id: &str) -> AppResult<bool> {
        self.schedule_like_repo.has_liked(user_id, schedule_id).await
    }

    /// Check if a user is following another user.
    pub async fn is_following_user(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.user_follow_repo
            .is_following(follower_id, followee_id)
            .await
    }

    /// Check if a user is following a team.
    pub async fn is_following_team(&self, user_id: &str, team_id: &str) -> AppResult<bool> {
        self.team_follow_repo.is_following(user_id, team_id).await
    }

    /// Get likes of a schedule.
    pub async fn schedule_likes(
        &self,
        schedule_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<schedule_like::Model>> {
        self.schedule_like_repo
            .find_by_schedule(schedule_id, limit, until_id)
            .await
    }

    /// Get followers of a user.
    pub async fn user_followers(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user_follow::Model>> {
        self.user_follow_repo
            .find_followers(user_id, limit, until_id)
            .await
    }

    /// Get users that a user is following.
    pub async fn user_following(
        &self,
        user_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<user_follow::Model>> {
        self.user_follow_repo
            .find_following(user_id, limit, until_id)
            .await
    }

    /// Get followers of a team.
    pub async fn team_followers(
        &self,
        team_id: &str,
        limit: u64,
        until_id: Option<&str>,
    ) -> AppResult<Vec<team_follow::Model>> {
        self.team_follow_repo
            .find_by_team(team_id, limit, until_id)
            .await
    }

    /// Total likes on a schedule.
    pub async fn count_schedule_likes(&self, schedule_id: &str) -> AppResult<u64> {
        self.schedule_like_repo.count_by_schedule(schedule_id).await
    }

    /// Total followers of a user.
    pub async fn count_user_followers(&self, user_id: &str) -> AppResult<u64> {
        self.user_follow_repo.count_followers(user_id).await
    }

    /// Total users a user is following.
    pub async fn count_user_following(&self, user_id: &str) -> AppResult<u64> {
        self.user_follow_repo.count_following(user_id).await
    }

    /// Total followers of a team.
    pub async fn count_team_followers(&self, team_id: &str) -> AppResult<u64> {
        self.team_follow_repo.count_by_team(team_id).await
    }
}
