//! Schedule endpoints.

use axum::{Json, Router, extract::State, middleware, routing::post};
use chrono::{DateTime, FixedOffset};
use futsalgo_common::AppResult;
use futsalgo_core::{ToggleResult, ViewTarget};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    rate_limit::{RateLimiterState, rate_limit_write_middleware},
    response::ApiResponse,
};

/// Rendered schedule detail. Viewer-independent, so it is what gets cached.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub id: String,
    pub team_id: String,
    pub created_by: String,
    pub opponent: Option<String>,
    pub venue: Option<String>,
    pub starts_at: String,
    pub like_count: i32,
    pub created_at: String,
}

impl From<futsalgo_db::entities::schedule::Model> for ScheduleView {
    fn from(s: futsalgo_db::entities::schedule::Model) -> Self {
        Self {
            id: s.id,
            team_id: s.team_id,
            created_by: s.created_by,
            opponent: s.opponent,
            venue: s.venue,
            starts_at: s.starts_at.to_rfc3339(),
            like_count: s.like_count,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// Like toggle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub schedule_id: String,
}

/// Toggle a like on a schedule.
///
/// Unauthenticated callers get a failure result rather than a 401; toggles
/// report every outcome through the uniform result shape.
async fn like(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> Json<ToggleResult> {
    let actor_id = user.map(|u| u.id).unwrap_or_default();
    let result = state
        .relationship_service
        .toggle_schedule_like(&actor_id, &req.schedule_id)
        .await;
    Json(result)
}

/// Schedule show request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub schedule_id: String,
}

/// Schedule show response: cached detail plus the viewer's like state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowResponse {
    #[serde(flatten)]
    pub schedule: ScheduleView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_liked: Option<bool>,
}

/// Show a schedule.
async fn show(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<ShowResponse>> {
    let key = ViewTarget::Schedule(req.schedule_id.clone()).cache_key();
    let schedule = read_through(&state, &key, &req.schedule_id).await?;

    let has_liked = match user {
        Some(u) => Some(
            state
                .relationship_service
                .has_liked(&u.id, &req.schedule_id)
                .await?,
        ),
        None => None,
    };

    Ok(ApiResponse::ok(ShowResponse {
        schedule,
        has_liked,
    }))
}

/// Load the schedule view through the cache.
async fn read_through(state: &AppState, key: &str, schedule_id: &str) -> AppResult<ScheduleView> {
    match state.view_cache.get(key).await {
        Ok(Some(json)) => {
            if let Ok(view) = serde_json::from_str(&json) {
                return Ok(view);
            }
            // Unparseable entry, fall through to a fresh load
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "View cache read failed"),
    }

    let view = ScheduleView::from(state.schedule_service.get_by_id(schedule_id).await?);
    if let Ok(json) = serde_json::to_string(&view)
        && let Err(e) = state.view_cache.set(key, &json).await
    {
        tracing::warn!(error = %e, "View cache write failed");
    }
    Ok(view)
}

/// Schedule create request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub team_id: String,
    pub opponent: Option<String>,
    pub venue: Option<String>,
    pub starts_at: DateTime<FixedOffset>,
}

/// Create a match schedule.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> AppResult<ApiResponse<ScheduleView>> {
    let schedule = state
        .schedule_service
        .create(&req.team_id, &user.id, req.opponent, req.venue, req.starts_at)
        .await?;
    Ok(ApiResponse::ok(schedule.into()))
}

/// Likes list request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesRequest {
    pub schedule_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

const fn default_limit() -> u64 {
    10
}

/// Like item response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeItemResponse {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
}

impl From<futsalgo_db::entities::schedule_like::Model> for LikeItemResponse {
    fn from(l: futsalgo_db::entities::schedule_like::Model) -> Self {
        Self {
            id: l.id,
            user_id: l.user_id,
            created_at: l.created_at.to_rfc3339(),
        }
    }
}

/// Likes list response. `total` is the full edge count, not the page size.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub items: Vec<LikeItemResponse>,
    pub total: u64,
}

/// List likes of a schedule.
async fn likes(
    State(state): State<AppState>,
    Json(req): Json<LikesRequest>,
) -> AppResult<ApiResponse<LikesResponse>> {
    let limit = req.limit.min(100);
    let likes = state
        .relationship_service
        .schedule_likes(&req.schedule_id, limit, req.until_id.as_deref())
        .await?;
    let total = state
        .relationship_service
        .count_schedule_likes(&req.schedule_id)
        .await?;
    Ok(ApiResponse::ok(LikesResponse {
        items: likes.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Team schedules list request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub team_id: String,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub until_id: Option<String>,
}

/// List schedules for a team, newest first.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> AppResult<ApiResponse<Vec<ScheduleView>>> {
    let limit = req.limit.min(100);
    let schedules = state
        .schedule_service
        .list_by_team(&req.team_id, limit, req.until_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(
        schedules.into_iter().map(Into::into).collect(),
    ))
}

pub fn router(limiter: &RateLimiterState) -> Router<AppState> {
    let writes = Router::new()
        .route("/like", post(like))
        .route("/create", post(create))
        .layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_write_middleware,
        ));

    Router::new()
        .route("/show", post(show))
        .route("/likes", post(likes))
        .route("/list", post(list))
        .merge(writes)
}
