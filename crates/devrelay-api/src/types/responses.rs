//! Response DTOs for the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"OK"` while the process is serving.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Size of the allow-list.
    pub authorized_chats: usize,
    /// Open reporter sockets.
    pub connected_reporters: usize,
    pub uptime_seconds: u64,
}

/// Successful command response.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}

impl CommandResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "Command sent successfully".to_string(),
        }
    }
}
