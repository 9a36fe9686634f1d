// ABOUTME: HTTP API layer for Notewise providing REST endpoints and routing
// ABOUTME: Integration layer over the AI core and storage packages

use axum::{
    routing::{get, post},
    Router,
};

pub mod ai_handlers;
pub mod auth;
pub mod response;
pub mod state;

pub use state::DbState;

/// Creates the AI API router (nested under /api/v1/ai)
pub fn create_ai_router() -> Router<DbState> {
    Router::new()
        .route("/generate", post(ai_handlers::handle_generate))
        .route("/improve", post(ai_handlers::handle_improve))
        .route("/summarize", post(ai_handlers::handle_summarize))
        .route("/translate", post(ai_handlers::handle_translate))
        .route("/answer", post(ai_handlers::handle_answer))
        .route("/usage", get(ai_handlers::get_usage_stats))
}
