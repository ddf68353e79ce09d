//! Router configuration for the API server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/stats", get(handlers::api_stats))
        .route("/api/search", get(handlers::api_search))
        .route("/api/pages", get(handlers::api_pages))
        // Live stats push
        .route("/ws/stats", get(handlers::ws_stats))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
