//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .route("/api/analyze-comments", post(handlers::analyze_comments_file))
        .route("/api/analyze-text", post(handlers::analyze_text))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
