pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::handle_panic;
use crate::notes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/generate-note", post(handlers::handle_generate_note))
        .route(
            "/api/test-generation",
            post(handlers::handle_test_generation),
        )
        .route("/api/test-claude", post(handlers::handle_test_generation))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
}
