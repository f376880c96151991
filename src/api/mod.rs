pub mod handlers;

use crate::config::Config;
use crate::db::Database;
use crate::feed::FeedService;
use crate::store::PgRelationshipStore;
use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state: the raw pool for liveness checks and follow
/// listings, and the feed service for everything pipeline-shaped.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub feed: Arc<FeedService<PgRelationshipStore>>,
}

/// Start the API server
pub async fn start_api_server(db: Arc<Database>) -> Result<()> {
    let config = Config::get();

    let store = Arc::new(PgRelationshipStore::new(db.clone()));
    let feed = Arc::new(FeedService::from_config(store));
    let state = AppState { db, feed };

    // Set up CORS
    let cors = if config.server.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    // Create router with all routes
    let app = Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        // Feed routes
        .route("/api/feed/:viewer_id", get(handlers::feed::get_feed))
        // Follow mutation routes
        .route(
            "/api/follows/:actor_id/users/:target_id",
            put(handlers::follows::set_follow),
        )
        .route(
            "/api/follows/:actor_id/users/:target_id/toggle",
            post(handlers::follows::toggle_follow),
        )
        .route(
            "/api/follows/:actor_id/stories/:story_id",
            put(handlers::follows::set_story_follow),
        )
        .route(
            "/api/follows/:actor_id/stories/:story_id/toggle",
            post(handlers::follows::toggle_story_follow),
        )
        // Follow listing routes
        .route(
            "/api/profiles/:id/following",
            get(handlers::follows::get_following),
        )
        .route(
            "/api/profiles/:id/followers",
            get(handlers::follows::get_followers),
        )
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Get bind address
    let addr = format!("{}:{}", config.server.host, config.server.port).parse::<SocketAddr>()?;

    // Start server
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
