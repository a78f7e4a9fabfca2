pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::history::handlers as history;
use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        // Single-purpose scoring
        .route("/api/v1/match", post(handlers::handle_match))
        .route(
            "/api/v1/skills/suggest",
            post(handlers::handle_suggest_skills),
        )
        .route("/api/v1/ats", post(handlers::handle_ats))
        .route("/api/v1/experience", post(handlers::handle_experience))
        // Full analysis
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/analyze/upload",
            post(handlers::handle_analyze_upload),
        )
        // Run history
        .route(
            "/api/v1/history",
            get(history::handle_list_history).delete(history::handle_clear_history),
        )
        .route("/api/v1/history/:id", delete(history::handle_delete_run))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
