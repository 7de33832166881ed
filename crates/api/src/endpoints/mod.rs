//! API endpoints.

mod ratings;
mod schedules;
mod teams;
mod users;

use axum::Router;

use crate::middleware::AppState;
use crate::rate_limit::RateLimiterState;

/// Create the API router. Write and signup routes get their own rate
/// limit categories layered on top of the global standard limit.
pub fn router(limiter: &RateLimiterState) -> Router<AppState> {
    Router::new()
        .nest("/schedules", schedules::router(limiter))
        .nest("/users", users::router(limiter))
        .nest("/teams", teams::router(limiter))
        .nest("/ratings", ratings::router(limiter))
}
