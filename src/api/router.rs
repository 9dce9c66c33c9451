use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::llm;
use super::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/llm/anthropic", post(llm::stream_anthropic))
        .route("/llm/ollama", post(llm::stream_ollama))
        .route("/llm/ollama/mq", post(llm::publish_ollama))
        .with_state(state)
        // Browser clients call these routes directly.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
