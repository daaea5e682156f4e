//! HTTP route table

use crate::{handlers::contact::handle_contact_submit, AppState};
use axum::{extract::State, response::IntoResponse, routing::get, routing::post, Json, Router};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/contact", post(handle_contact_submit))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/health",
            "contact": "/api/contact"
        }
    }))
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": state.version
    }))
}
