//! Shared fixtures for endpoint tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};

use devrelay_api::{create_router, ApiConfig, AppState};
use devrelay_core::{Identity, RelayConfig};
use devrelay_telegram::{GatewayError, GatewayResult, MessagingGateway};

pub const TOKEN: &str = "123456:TEST-token-abcdef";

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Text {
        target: String,
        body: String,
        reply_to: Option<i32>,
    },
    Photo {
        target: String,
        url: String,
        caption: String,
    },
    Location {
        target: String,
    },
    AnswerCallback(String),
    SetWebhook(String),
}

/// Gateway that records every call instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A gateway whose every call fails like a rejected send.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies of text messages, in order.
    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Text { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> GatewayResult {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(GatewayError::Client("Bad Request: chat not found".to_string()))
        } else {
            Ok(json!({"ok": true}))
        }
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_text(&self, target: &Identity, body: &str, reply_to: Option<i32>) -> GatewayResult {
        self.record(Call::Text {
            target: target.to_string(),
            body: body.to_string(),
            reply_to,
        })
    }

    async fn send_photo(&self, target: &Identity, url: &str, caption: &str) -> GatewayResult {
        self.record(Call::Photo {
            target: target.to_string(),
            url: url.to_string(),
            caption: caption.to_string(),
        })
    }

    async fn send_location(&self, target: &Identity, _latitude: f64, _longitude: f64) -> GatewayResult {
        self.record(Call::Location {
            target: target.to_string(),
        })
    }

    async fn answer_callback(&self, callback_id: &str) -> GatewayResult {
        self.record(Call::AnswerCallback(callback_id.to_string()))
    }

    async fn set_webhook(&self, url: &str) -> GatewayResult {
        self.record(Call::SetWebhook(url.to_string()))
    }
}

pub fn relay_config(authorized: &str) -> RelayConfig {
    RelayConfig::new(Some(TOKEN.to_string()))
        .unwrap()
        .with_authorized_list(authorized)
}

pub fn test_state(relay: RelayConfig, gateway: Arc<RecordingGateway>) -> AppState {
    let gateway: Arc<dyn MessagingGateway> = gateway;
    AppState::new(ApiConfig::default(), relay, gateway)
}

/// Server with `authorized` as the allow-list.
pub fn make_server(authorized: &str, gateway: Arc<RecordingGateway>) -> (TestServer, AppState) {
    let state = test_state(relay_config(authorized), gateway);
    let server = TestServer::new(create_router(state.clone())).unwrap();
    (server, state)
}

/// A private-chat text message update.
pub fn message_update(chat_id: i64, message_id: i32, text: &str) -> Value {
    json!({
        "update_id": 1000,
        "message": {
            "message_id": message_id,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private"},
            "from": {"id": chat_id, "is_bot": false, "first_name": "Test"},
            "text": text
        }
    })
}

pub fn callback_update(chat_id: i64, callback_id: &str, data: &str) -> Value {
    json!({
        "update_id": 1001,
        "callback_query": {
            "id": callback_id,
            "data": data,
            "message": {"message_id": 9, "chat": {"id": chat_id, "type": "private"}}
        }
    })
}
