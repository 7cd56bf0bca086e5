pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/interview/prompt",
            post(handlers::handle_preview_prompt),
        )
        .route(
            "/api/v1/interview/questions",
            post(handlers::handle_generate_questions),
        )
        .route(
            "/api/v1/interview/questions/stream",
            post(handlers::handle_stream_questions),
        )
        .with_state(state)
}
