//! Futsalgo server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use fred::interfaces::ClientLike;
use futsalgo_api::{
    middleware::AppState, rate_limit::RateLimiterState, router as api_router,
};
use futsalgo_common::{Config, ViewCache};
use futsalgo_core::{
    CacheViewInvalidator, RatingService, RelationshipService, ScheduleService, TeamService,
    UserService,
};
use futsalgo_db::repositories::{
    PeerRatingRepository, ScheduleLikeRepository, ScheduleRepository, TeamFollowRepository,
    TeamRepository, UserFollowRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired rate limit windows get evicted.
const RATE_LIMIT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Waits for a shutdown signal (SIGINT or SIGTERM).
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "futsalgo=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting futsalgo server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = futsalgo_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    futsalgo_db::migrate(&db).await?;
    info!("Migrations completed");

    // Connect to Redis for the view cache
    info!("Connecting to Redis...");
    let redis_config = fred::types::config::Config::from_url(&config.redis.url)?;
    let redis_client = fred::clients::Client::new(redis_config, None, None, None);
    redis_client.connect();
    redis_client.wait_for_connect().await?;
    let redis_client = Arc::new(redis_client);
    info!("Connected to Redis");

    let view_ttl = u64::try_from(config.redis.view_ttl_secs).unwrap_or(300);
    let view_cache = ViewCache::with_ttl(
        Arc::clone(&redis_client),
        config.redis.prefix.clone(),
        Duration::from_secs(view_ttl),
    );
    let invalidator = Arc::new(CacheViewInvalidator::new(view_cache.clone()));

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let team_repo = TeamRepository::new(Arc::clone(&db));
    let schedule_repo = ScheduleRepository::new(Arc::clone(&db));
    let schedule_like_repo = ScheduleLikeRepository::new(Arc::clone(&db));
    let user_follow_repo = UserFollowRepository::new(Arc::clone(&db));
    let team_follow_repo = TeamFollowRepository::new(Arc::clone(&db));
    let peer_rating_repo = PeerRatingRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let relationship_service = RelationshipService::new(
        schedule_like_repo,
        user_follow_repo,
        team_follow_repo,
        user_repo.clone(),
        team_repo.clone(),
        schedule_repo.clone(),
        invalidator,
    );
    let rating_service = RatingService::new(peer_rating_repo, user_repo.clone());
    let schedule_service = ScheduleService::new(schedule_repo, team_repo.clone());
    let team_service = TeamService::new(team_repo, user_repo);

    let state = AppState {
        user_service,
        relationship_service,
        rating_service,
        schedule_service,
        team_service,
        view_cache,
    };

    // Rate limiter with a periodic sweep of expired windows
    let rate_limiter = RateLimiterState::new();
    let sweeper = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.sweep().await;
        }
    });

    let app = Router::new()
        .nest("/api", api_router(&rate_limiter))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            futsalgo_api::rate_limit::rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            futsalgo_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
