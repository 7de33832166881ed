//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use futsalgo_common::ViewCache;
use futsalgo_core::{
    RatingService, RelationshipService, ScheduleService, TeamService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub relationship_service: RelationshipService,
    pub rating_service: RatingService,
    pub schedule_service: ScheduleService,
    pub team_service: TeamService,
    pub view_cache: ViewCache,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` into the request extensions.
/// Requests without a valid token pass through unauthenticated; the
/// `AuthUser` extractor is what rejects them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
