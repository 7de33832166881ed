//! Team endpoints.

use axum::{Json, Router, extract::State, middleware, routing::post};
use futsalgo_common::AppResult;
use futsalgo_core::{ToggleResult, ViewTarget};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    rate_limit::{RateLimiterState, rate_limit_write_middleware},
    response::ApiResponse,
};

/// Rendered team profile. Viewer-independent, so it is what gets cached.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub description: Option<String>,
    pub owner_id: String,
    pub followers_count: i32,
    pub created_at: String,
}

impl From<futsalgo_db::entities::team::Model> for TeamView {
    fn from(t: futsalgo_db::entities::team::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            city: t.city,
            description: t.description,
            owner_id: t.owner_id,
            followers_count: t.followers_count,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Team create request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub city: Option<String>,
    pub description: Option<String>,
}

/// Create a team owned by the caller.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<ApiResponse<TeamView>> {
    req.validate()?;

    let team = state
        .team_service
        .create(&req.name, &user.id, req.city, req.description)
        .await?;
    Ok(ApiResponse::ok(team.into()))
}

/// Follow toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub team_id: String,
}

/// Toggle following a team.
async fn follow(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> Json<ToggleResult> {
    let actor_id = user.map(|u| u.id).unwrap_or_default();
    let result = state
        .relationship_service
        .toggle_team_follow(&actor_id, &req.team_id)
        .await;
    Json(result)
}

/// Team show request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub team_id: String,
}

/// Team show response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowResponse {
    #[serde(flatten)]
    pub team: TeamView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// Show a team.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<ShowResponse>> {
    let key = ViewTarget::TeamProfile(req.team_id.clone()).cache_key();
    let team = read_through(&state, &key, &req.team_id).await?;

    let is_following = match viewer {
        Some(v) => Some(
            state
                .relationship_service
                .is_following_team(&v.id, &req.team_id)
                .await?,
        ),
        None => None,
    };

    Ok(ApiResponse::ok(ShowResponse { team, is_following }))
}

/// Load the team view through the cache.
async fn read_through(state: &AppState, key: &str, team_id: &str) -> AppResult<TeamView> {
    match state.view_cache.get(key).await {
        Ok(Some(json)) => {
            if let Ok(view) = serde_json::from_str(&json) {
                return Ok(view);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "View cache read failed"),
    }

    let view = TeamView::from(state.team_service.get_by_id(team_id).await?);
    if let Ok(json) = serde_json::to_string(&view)
        && let Err(e) = state.view_cache.set(key, &json).await
    {
        tracing::warn!(error = %e, "View cache write failed");
    }
    Ok(view)
}

/// Followers list request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowersRequest {
    pub team_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

/// Team follow edge item response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFollowItemResponse {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<futsalgo_db::entities::team_follow::Model> for TeamFollowItemResponse {
    fn from(f: futsalgo_db::entities::team_follow::Model) -> Self {
        Self {
            id: f.id,
            user_id: f.user_id,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// Followers list response. `total` is the full edge count, not the page size.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFollowersResponse {
    pub items: Vec<TeamFollowItemResponse>,
    pub total: u64,
}

/// List followers of a team.
async fn followers(
    State(state): State<AppState>,
    Json(req): Json<FollowersRequest>,
) -> AppResult<ApiResponse<TeamFollowersResponse>> {
    let limit = req.limit.min(100);
    let followers = state
        .relationship_service
        .team_followers(&req.team_id, limit, req.until_id.as_deref())
        .await?;
    let total = state
        .relationship_service
        .count_team_followers(&req.team_id)
        .await?;
    Ok(ApiResponse::ok(TeamFollowersResponse {
        items: followers.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Owned teams list request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub owner_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// List teams owned by a user.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<Vec<TeamView>>> {
    let limit = req.limit.min(100);
    let teams = state.team_service.list_by_owner(&req.owner_id, limit).await?;
    Ok(ApiResponse::ok(teams.into_iter().map(Into::into).collect()))
}

pub fn router(limiter: &RateLimiterState) -> Router<AppState> {
    let writes = Router::new()
        .route("/create", post(create))
        .route("/follow", post(follow))
        .layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_write_middleware,
        ));

    Router::new()
        .route("/show", post(show))
        .route("/followers", post(followers))
        .route("/list", post(list))
        .merge(writes)
}
