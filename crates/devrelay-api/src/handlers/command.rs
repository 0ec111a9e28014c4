//! Dashboard command handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, warn};

use devrelay_core::reply::format_web_notification;
use devrelay_core::{Command, Interpretation};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::types::{CommandRequest, CommandResponse};

/// POST /api/command - Forward a dashboard command to an authorized chat.
///
/// The chat receives a notification naming the command and its data. Commands
/// that involve the device are also pushed to connected reporters.
pub async fn send_command(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CommandRequest>, JsonRejection>,
) -> Result<Json<CommandResponse>> {
    let Json(req) = payload?;

    let chat = req
        .telegram_chat_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Telegram chat ID is required".to_string()))?;

    if !state.relay.guard.is_authorized(&chat) {
        warn!(chat_id = %chat, command = %req.command, "Rejected command for unauthorized chat");
        return Err(ApiError::Unauthorized(
            "Chat ID is not authorized".to_string(),
        ));
    }

    info!(chat_id = %chat, command = %req.command, "Received command from web");

    let interpretation = Command::structured(&req.command, req.data.as_ref()).interpret();
    if let Interpretation::Action(action) = &interpretation {
        if let Some(device_command) = action.device_command() {
            state.hub.dispatch(device_command, &chat);
        }
    }

    let notification = format_web_notification(&req.command, req.data.as_ref());
    state.gateway.send_text(&chat, &notification, None).await?;

    Ok(Json(CommandResponse::sent()))
}
