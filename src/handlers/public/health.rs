// handlers/public/health.rs - GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// Liveness of this server plus reachability of the pharmacy API.
/// Any HTTP answer from the API counts as reachable.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let sessions = state.sessions.len().await;

    match state.backend.health().await {
        Ok(status) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "sessions": sessions,
                    "backend": {
                        "url": state.backend.base_url(),
                        "status": status,
                    }
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check could not reach the backend: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "backend unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "sessions": sessions,
                        "backend": {
                            "url": state.backend.base_url(),
                            "error": e.to_string(),
                        }
                    }
                })),
            )
        }
    }
}
