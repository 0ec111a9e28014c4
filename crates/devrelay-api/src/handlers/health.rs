//! Health check handler.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /health - Liveness and counts. No authorization.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
        authorized_chats: state.relay.guard.len(),
        connected_reporters: state.hub.connected(),
        uptime_seconds: state.config.uptime_seconds(),
    })
}
