//! User endpoints.

use axum::{Json, Router, extract::State, middleware, routing::post};
use futsalgo_common::AppResult;
use futsalgo_core::{RatingVector, ToggleResult, UserProfileInput, ViewTarget};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    rate_limit::{RateLimiterState, rate_limit_signup_middleware, rate_limit_write_middleware},
    response::ApiResponse,
};

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub position: Option<String>,
    pub self_ratings: Option<RatingVector>,
}

/// Registration response: profile plus the issued token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub token: Option<String>,
}

/// Register a new player.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    req.validate()?;

    let user = state
        .user_service
        .register(
            &req.username,
            UserProfileInput {
                name: req.name,
                city: req.city,
                position: req.position,
            },
            req.self_ratings.as_ref(),
        )
        .await?;

    Ok(ApiResponse::ok(RegisterResponse {
        id: user.id,
        username: user.username,
        token: user.token,
    }))
}

/// Follow toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: String,
}

/// Toggle following a player.
async fn follow(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<FollowRequest>,
) -> Json<ToggleResult> {
    let actor_id = user.map(|u| u.id).unwrap_or_default();
    let result = state
        .relationship_service
        .toggle_user_follow(&actor_id, &req.user_id)
        .await;
    Json(result)
}

/// Profile show request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub user_id: String,
}

/// Rendered profile. Viewer-independent, so it is what gets cached.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub position: Option<String>,
    /// Self-assessment blended with peer ratings.
    pub displayed_ratings: RatingVector,
    pub followers_count: i32,
    pub following_count: i32,
    pub created_at: String,
}

/// Profile show response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowResponse {
    #[serde(flatten)]
    pub profile: ProfileView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// Show a player profile with displayed ratings.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<ShowResponse>> {
    let key = ViewTarget::UserProfile(req.user_id.clone()).cache_key();
    let profile = read_through(&state, &key, &req.user_id).await?;

    let is_following = match viewer {
        Some(v) if v.id != req.user_id => Some(
            state
                .relationship_service
                .is_following_user(&v.id, &req.user_id)
                .await?,
        ),
        _ => None,
    };

    Ok(ApiResponse::ok(ShowResponse {
        profile,
        is_following,
    }))
}

/// Load the profile view through the cache.
async fn read_through(state: &AppState, key: &str, user_id: &str) -> AppResult<ProfileView> {
    match state.view_cache.get(key).await {
        Ok(Some(json)) => {
            if let Ok(view) = serde_json::from_str(&json) {
                return Ok(view);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "View cache read failed"),
    }

    let user = state.user_service.get_by_id(user_id).await?;
    let displayed_ratings = state.rating_service.displayed_ratings_for(&user).await?;
    let view = ProfileView {
        id: user.id,
        username: user.username,
        name: user.name,
        avatar_url: user.avatar_url,
        city: user.city,
        position: user.position,
        displayed_ratings,
        followers_count: user.followers_count,
        following_count: user.following_count,
        created_at: user.created_at.to_rfc3339(),
    };

    if let Ok(json) = serde_json::to_string(&view)
        && let Err(e) = state.view_cache.set(key, &json).await
    {
        tracing::warn!(error = %e, "View cache write failed");
    }
    Ok(view)
}

/// Followers/following list request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub user_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

/// Follow edge item response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowItemResponse {
    pub id: String,
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: String,
}

impl From<futsalgo_db::entities::user_follow::Model> for FollowItemResponse {
    fn from(f: futsalgo_db::entities::user_follow::Model) -> Self {
        Self {
            id: f.id,
            follower_id: f.follower_id,
            followee_id: f.followee_id,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// Follow list response. `total` is the full edge count, not the page size.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowListResponse {
    pub items: Vec<FollowItemResponse>,
    pub total: u64,
}

/// List followers of a user.
async fn followers(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<FollowListResponse>> {
    let limit = req.limit.min(100);
    let followers = state
        .relationship_service
        .user_followers(&req.user_id, limit, req.until_id.as_deref())
        .await?;
    let total = state
        .relationship_service
        .count_user_followers(&req.user_id)
        .await?;
    Ok(ApiResponse::ok(FollowListResponse {
        items: followers.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// List users that a user is following.
async fn following(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<FollowListResponse>> {
    let limit = req.limit.min(100);
    let following = state
        .relationship_service
        .user_following(&req.user_id, limit, req.until_id.as_deref())
        .await?;
    let total = state
        .relationship_service
        .count_user_following(&req.user_id)
        .await?;
    Ok(ApiResponse::ok(FollowListResponse {
        items: following.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Self-assessment update request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatingsRequest {
    #[validate(range(min = 0.0, max = 10.0))]
    pub shooting: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub passing: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub stamina: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub physical: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub dribbling: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub defense: f64,
}

/// Replace the caller's self-assessment.
async fn update_ratings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateRatingsRequest>,
) -> AppResult<ApiResponse<()>> {
    req.validate()?;

    let vector = RatingVector {
        shooting: req.shooting,
        passing: req.passing,
        stamina: req.stamina,
        physical: req.physical,
        dribbling: req.dribbling,
        defense: req.defense,
    };
    state
        .user_service
        .update_self_assessment(&user.id, &vector)
        .await?;

    // The profile view embeds the blend, so it must be refreshed
    let key = ViewTarget::UserProfile(user.id.clone()).cache_key();
    if let Err(e) = state.view_cache.invalidate(&key).await {
        tracing::warn!(error = %e, "View cache invalidation failed");
    }

    Ok(ApiResponse::ok(()))
}

pub fn router(limiter: &RateLimiterState) -> Router<AppState> {
    let signup = Router::new()
        .route("/register", post(register))
        .layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_signup_middleware,
        ));

    let writes = Router::new()
        .route("/follow", post(follow))
        .route("/update-ratings", post(update_ratings))
        .layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_write_middleware,
        ));

    Router::new()
        .route("/show", post(show))
        .route("/followers", post(followers))
        .route("/following", post(following))
        .merge(signup)
        .merge(writes)
}
