//! HTTP API layer for futsalgo.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: schedules, users, teams, ratings
//! - **Extractors**: authentication
//! - **Middleware**: auth, rate limiting
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod rate_limit;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
pub use rate_limit::{ApiRateLimiter, RateLimitConfig, RateLimiterState};
