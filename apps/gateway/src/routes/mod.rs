pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::proxy::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Bodies are buffered whole before forwarding, so the limit bounds memory per request.
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Analyzer proxy
        .route("/api/extract", post(handlers::handle_extract))
        .route("/api/analyze", post(handlers::handle_analyze))
        .layer(body_limit)
        .with_state(state)
}
