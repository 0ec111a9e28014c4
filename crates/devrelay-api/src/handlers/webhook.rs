//! Telegram webhook handler.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode};
use tracing::{debug, error, warn};

use devrelay_core::reply::{format_callback_echo, respond, UNAUTHORIZED_REPLY};
use devrelay_core::{Command, Interpretation};
use devrelay_telegram::{deliver, deliver_all, InboundCallback, InboundMessage, InboundUpdate, UpdateKind};

use crate::state::AppState;

/// POST /webhook/telegram - Handle one bot update.
///
/// Always answers 200 once the body parses, including for rejected chats and
/// failed sends; only an unreadable body yields 500.
pub async fn telegram_webhook(State(state): State<AppState>, body: Bytes) -> (StatusCode, &'static str) {
    let update: InboundUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            error!(error = %e, "Error processing webhook");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error processing webhook");
        }
    };

    match update.kind() {
        UpdateKind::Message(message) => handle_message(&state, message).await,
        UpdateKind::Callback(callback) => handle_callback(&state, callback).await,
        UpdateKind::Other => {
            debug!(update_id = ?update.update_id, "Ignoring update without message or callback");
        }
    }

    (StatusCode::OK, "OK")
}

async fn handle_message(state: &AppState, message: &InboundMessage) {
    let chat = message.chat_identity();

    if !state.relay.guard.is_authorized(&chat) {
        warn!(chat_id = %chat, "Rejected message from unauthorized chat");
        if state.relay.notify_unauthorized {
            if let Err(e) = state.gateway.send_text(&chat, UNAUTHORIZED_REPLY, None).await {
                warn!(chat_id = %chat, error = %e, "Failed to send rejection");
            }
        }
        return;
    }

    debug!(chat_id = %chat, text = %message.text(), "Message received");
    let interpretation = Command::from_text(message.text()).interpret();

    if let Interpretation::Action(action) = &interpretation {
        if let Some(device_command) = action.device_command() {
            state.hub.dispatch(device_command, &chat);
        }
    }

    let reply = respond(&interpretation, &mut rand::thread_rng());
    deliver_all(
        state.gateway.as_ref(),
        &chat,
        Some(message.message_id),
        &reply.messages,
    )
    .await;

    if let Some(follow_up) = reply.follow_up {
        let gateway = Arc::clone(&state.gateway);
        let target = chat.clone();
        state
            .scheduler
            .schedule(chat.as_str(), follow_up.delay, async move {
                if let Err(e) = deliver(gateway.as_ref(), &target, None, &follow_up.message).await {
                    warn!(chat_id = %target, error = %e, "Failed to deliver follow-up");
                }
            });
    }
}

async fn handle_callback(state: &AppState, callback: &InboundCallback) {
    let data = callback.data.as_deref().unwrap_or("");

    match callback.chat_identity() {
        Some(chat) if state.relay.guard.is_authorized(&chat) => {
            let echo = format_callback_echo(data);
            if let Err(e) = state.gateway.send_text(&chat, &echo, None).await {
                warn!(chat_id = %chat, error = %e, "Failed to echo callback");
            }
        }
        Some(chat) => warn!(chat_id = %chat, "Ignoring callback from unauthorized chat"),
        None => debug!(callback_id = %callback.id, "Callback without originating chat"),
    }

    if let Err(e) = state.gateway.answer_callback(&callback.id).await {
        warn!(callback_id = %callback.id, error = %e, "Failed to answer callback");
    }
}
