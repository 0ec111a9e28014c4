//! Reporter WebSocket handler.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use devrelay_core::ReporterFrame;

use crate::hub::ReporterHub;
use crate::state::AppState;

/// GET /ws/reporter - Real-time channel for telemetry reporters.
pub async fn reporter_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<ReporterHub>) {
    let mut frames = hub.subscribe();
    let mut session = hub.session();
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                let Some(Ok(message)) = incoming else { break; };
                match message {
                    Message::Text(text) => match serde_json::from_str::<ReporterFrame>(&text) {
                        Ok(frame) => session.handle(frame),
                        Err(e) => warn!(error = %e, "Ignoring malformed reporter frame"),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            outgoing = frames.recv() => match outgoing {
                Ok(frame) => {
                    let payload = match serde_json::to_string(&frame) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(error = %e, "Failed to serialize relay frame");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Reporter fell behind; frames dropped");
                }
                Err(RecvError::Closed) => break,
            },
            _ = hub.closed() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    debug!(device_id = ?session.device_id(), "Reporter socket closed");
}
