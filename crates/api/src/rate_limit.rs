//! API rate limiting middleware.
//!
//! Per-user rate limiting with a per-IP fallback for unauthenticated
//! requests. Window state lives in process memory and carries an expiry;
//! a periodic sweep task (spawned by the server) evicts expired windows so
//! the key map stays bounded.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

/// Rate limit configuration for an endpoint category.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Time window duration in seconds.
    pub window_secs: u64,
    /// Category label. Windows are keyed per category, so a request checked
    /// against two categories (global plus per-route) counts once in each.
    pub category: &'static str,
}

impl RateLimitConfig {
    /// Create a new rate limit config.
    #[must_use]
    pub const fn new(max_requests: u32, window_secs: u64, category: &'static str) -> Self {
        Self {
            max_requests,
            window_secs,
            category,
        }
    }
}

/// Default rate limits per endpoint category.
pub mod limits {
    use super::RateLimitConfig;

    /// All endpoints.
    pub const STANDARD: RateLimitConfig = RateLimitConfig::new(300, 60, "standard");

    /// Write operations (toggles, rating submissions, creates).
    pub const WRITE: RateLimitConfig = RateLimitConfig::new(30, 60, "write");

    /// Registration.
    pub const SIGNUP: RateLimitConfig = RateLimitConfig::new(5, 3600, "signup");
}

/// Counter window for a single key.
#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started_at: Instant,
    /// When the entry can be swept. Refreshed on every check.
    expires_at: Instant,
}

/// In-process rate limiter keyed by user id or client IP.
#[derive(Clone)]
pub struct ApiRateLimiter {
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

impl Default for ApiRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiRateLimiter {
    /// Create a new rate limiter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check whether a request under `key` is allowed, and record it.
    /// Windows are scoped by config category so the same key counts
    /// independently against each category it is checked under.
    pub async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitDecision {
        let mut windows = self.windows.write().await;
        let now = Instant::now();
        let window = Duration::from_secs(config.window_secs);
        // Entries outlive their window by one extra window before eviction
        let ttl = window * 2;

        let scoped_key = format!("{}:{key}", config.category);
        let state = windows.entry(scoped_key).or_insert(Window {
            count: 0,
            started_at: now,
            expires_at: now + ttl,
        });
        state.expires_at = now + ttl;

        if now.duration_since(state.started_at) >= window {
            state.count = 0;
            state.started_at = now;
        }

        let reset = window
            .saturating_sub(now.duration_since(state.started_at))
            .as_secs();

        if state.count >= config.max_requests {
            return RateLimitDecision::Blocked { retry_after: reset };
        }

        state.count += 1;
        RateLimitDecision::Allowed {
            remaining: config.max_requests.saturating_sub(state.count),
            limit: config.max_requests,
            reset,
        }
    }

    /// Evict windows whose TTL has passed.
    pub async fn sweep(&self) {
        let mut windows = self.windows.write().await;
        let now = Instant::now();
        windows.retain(|_, w| w.expires_at > now);
    }

    /// Number of tracked keys.
    pub async fn key_count(&self) -> usize {
        self.windows.read().await.len()
    }
}

/// Rate limit check result.
#[derive(Debug, Clone)]
pub enum RateLimitDecision {
    /// Request is allowed.
    Allowed {
        remaining: u32,
        limit: u32,
        reset: u64,
    },
    /// Request is over the limit.
    Blocked { retry_after: u64 },
}

/// Rate limiter state injected into the middleware stack.
#[derive(Clone, Default)]
pub struct RateLimiterState {
    /// Per-user limiter.
    pub user_limiter: ApiRateLimiter,
    /// Per-IP limiter for unauthenticated requests.
    pub ip_limiter: ApiRateLimiter,
}

impl RateLimiterState {
    /// Create a new rate limiter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evict expired windows from both limiters.
    pub async fn sweep(&self) {
        self.user_limiter.sweep().await;
        self.ip_limiter.sweep().await;
    }
}

/// Rate limit error response.
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": "RATE_LIMIT_EXCEEDED",
                "message": "Too many requests",
                "retryAfter": self.retry_after
            }
        });

        (
            StatusCode::TOO_MANY_REQUESTS,
            [
                ("Retry-After", self.retry_after.to_string()),
                ("Content-Type", "application/json".to_string()),
            ],
            body.to_string(),
        )
            .into_response()
    }
}

/// Extract client IP from proxy headers.
fn extract_client_ip(req: &Request<Body>) -> Option<IpAddr> {
    if let Some(xff) = req.headers().get("x-forwarded-for")
        && let Ok(xff_str) = xff.to_str()
        && let Some(first_ip) = xff_str.split(',').next()
        && let Ok(ip) = first_ip.trim().parse::<IpAddr>()
    {
        return Some(ip);
    }

    if let Some(real_ip) = req.headers().get("x-real-ip")
        && let Ok(ip_str) = real_ip.to_str()
        && let Ok(ip) = ip_str.parse::<IpAddr>()
    {
        return Some(ip);
    }

    None
}

/// Rate limiting middleware for read endpoints.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, &limits::STANDARD).await
}

/// Rate limiting middleware for write operations.
pub async fn rate_limit_write_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, &limits::WRITE).await
}

/// Rate limiting middleware for registration.
pub async fn rate_limit_signup_middleware(
    State(limiter): State<RateLimiterState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    rate_limit_with_config(limiter, req, next, &limits::SIGNUP).await
}

async fn rate_limit_with_config(
    limiter: RateLimiterState,
    req: Request<Body>,
    next: Next,
    config: &RateLimitConfig,
) -> Result<Response, RateLimitError> {
    // Authenticated requests are keyed per user, others per client IP
    let decision = if let Some(user) = req.extensions().get::<futsalgo_db::entities::user::Model>()
    {
        let key = format!("user:{}", user.id);
        limiter.user_limiter.check(&key, config).await
    } else {
        let key = extract_client_ip(&req)
            .map_or_else(|| "unknown".to_string(), |ip| format!("ip:{ip}"));
        limiter.ip_limiter.check(&key, config).await
    };

    match decision {
        RateLimitDecision::Allowed {
            remaining,
            limit,
            reset,
        } => {
            let mut response = next.run(req).await;

            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", limit.into());
            headers.insert("X-RateLimit-Remaining", remaining.into());
            headers.insert("X-RateLimit-Reset", reset.into());

            Ok(response)
        }
        RateLimitDecision::Blocked { retry_after } => Err(RateLimitError { retry_after }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_requests_under_limit() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(5, 60, "standard");

        for _ in 0..5 {
            match limiter.check("user:u1", &config).await {
                RateLimitDecision::Allowed { .. } => {}
                RateLimitDecision::Blocked { .. } => panic!("Expected Allowed"),
            }
        }
    }

    #[tokio::test]
    async fn test_blocks_after_limit() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(3, 60, "standard");

        for _ in 0..3 {
            limiter.check("user:u1", &config).await;
        }

        match limiter.check("user:u1", &config).await {
            RateLimitDecision::Blocked { retry_after } => assert!(retry_after > 0),
            RateLimitDecision::Allowed { .. } => panic!("Expected Blocked"),
        }
    }

    #[tokio::test]
    async fn test_separate_keys_are_independent() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(2, 60, "standard");

        limiter.check("user:a", &config).await;
        limiter.check("user:a", &config).await;

        match limiter.check("user:b", &config).await {
            RateLimitDecision::Allowed { .. } => {}
            RateLimitDecision::Blocked { .. } => panic!("Expected Allowed for user:b"),
        }
    }

    #[tokio::test]
    async fn test_categories_count_independently() {
        let limiter = ApiRateLimiter::new();
        let write = RateLimitConfig::new(2, 60, "write");
        let standard = RateLimitConfig::new(5, 60, "standard");

        limiter.check("user:u1", &write).await;
        limiter.check("user:u1", &write).await;
        match limiter.check("user:u1", &write).await {
            RateLimitDecision::Blocked { .. } => {}
            RateLimitDecision::Allowed { .. } => panic!("Expected Blocked under write"),
        }

        // Exhausting the write budget must not consume the standard one
        match limiter.check("user:u1", &standard).await {
            RateLimitDecision::Allowed { remaining, .. } => assert_eq!(remaining, 4),
            RateLimitDecision::Blocked { .. } => panic!("Expected Allowed under standard"),
        }
    }

    #[tokio::test]
    async fn test_allowed_reports_remaining_and_reset() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(10, 60, "standard");

        match limiter.check("user:u1", &config).await {
            RateLimitDecision::Allowed {
                remaining,
                limit,
                reset,
            } => {
                assert_eq!(limit, 10);
                assert_eq!(remaining, 9);
                assert!(reset <= 60);
            }
            RateLimitDecision::Blocked { .. } => panic!("Expected Allowed"),
        }
    }

    #[tokio::test]
    async fn test_sweep_evicts_expired_windows() {
        let limiter = ApiRateLimiter::new();
        // Zero-length window expires immediately
        let config = RateLimitConfig::new(10, 0, "standard");

        limiter.check("user:u1", &config).await;
        limiter.check("user:u2", &config).await;
        assert_eq!(limiter.key_count().await, 2);

        tokio::time::sleep(Duration::from_millis(10)).await;
        limiter.sweep().await;

        assert_eq!(limiter.key_count().await, 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_live_windows() {
        let limiter = ApiRateLimiter::new();
        let config = RateLimitConfig::new(10, 60, "standard");

        limiter.check("user:u1", &config).await;
        limiter.sweep().await;

        assert_eq!(limiter.key_count().await, 1);
    }
}
