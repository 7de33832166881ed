//! Peer rating endpoints.

use axum::{Json, Router, extract::State, middleware, routing::post};
use futsalgo_common::AppResult;
use futsalgo_core::{RatingVector, ViewTarget};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    rate_limit::{RateLimiterState, rate_limit_write_middleware},
    response::ApiResponse,
};

/// Rating submission request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Player being rated.
    pub user_id: String,
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

/// Rating submission response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub id: String,
    pub subject_id: String,
}

/// Submit or replace a peer rating.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> AppResult<ApiResponse<SubmitResponse>> {
    req.validate()?;

    let vector = RatingVector {
        shooting: req.shooting,
        passing: req.passing,
        stamina: req.stamina,
        physical: req.physical,
        dribbling: req.dribbling,
        defense: req.defense,
    };
    let rating = state
        .rating_service
        .submit_rating(&user.id, &req.user_id, &vector)
        .await?;

    // The subject's profile view embeds the blend, so it must be refreshed
    let key = ViewTarget::UserProfile(req.user_id.clone()).cache_key();
    if let Err(e) = state.view_cache.invalidate(&key).await {
        tracing::warn!(error = %e, "View cache invalidation failed");
    }

    Ok(ApiResponse::ok(SubmitResponse {
        id: rating.id,
        subject_id: rating.subject_id,
    }))
}

pub fn router(limiter: &RateLimiterState) -> Router<AppState> {
    Router::new()
        .route("/submit", post(submit))
        .layer(middleware::from_fn_with_state(
            limiter.clone(),
            rate_limit_write_middleware,
        ))
}
