//! Inbound webhook updates.
//!
//! Only the fields the relay reads are modeled, and all of them are optional,
//! so unfamiliar update kinds still deserialize (and are then ignored).

use serde::Deserialize;

use devrelay_core::Identity;

/// A webhook update from the Bot API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundUpdate {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<InboundMessage>,
    #[serde(default)]
    pub callback_query: Option<InboundCallback>,
}

/// What an update asks the relay to handle.
#[derive(Debug, Clone, Copy)]
pub enum UpdateKind<'a> {
    Message(&'a InboundMessage),
    Callback(&'a InboundCallback),
    /// Neither a message nor a callback query.
    Other,
}

impl InboundUpdate {
    /// Classify the update. A message takes precedence over a callback query.
    pub fn kind(&self) -> UpdateKind<'_> {
        if let Some(message) = &self.message {
            UpdateKind::Message(message)
        } else if let Some(callback) = &self.callback_query {
            UpdateKind::Callback(callback)
        } else {
            UpdateKind::Other
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub message_id: i32,
    pub chat: InboundChat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<InboundUser>,
}

impl InboundMessage {
    pub fn chat_identity(&self) -> Identity {
        Identity::from(self.chat.id)
    }

    /// Message text, empty for media-only messages.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// An inline keyboard button press.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundCallback {
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
    /// The message carrying the keyboard; absent for inline-mode messages.
    #[serde(default)]
    pub message: Option<InboundMessage>,
}

impl InboundCallback {
    pub fn chat_identity(&self) -> Option<Identity> {
        self.message.as_ref().map(InboundMessage::chat_identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_update() {
        let update: InboundUpdate = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 77,
                "date": 1700000000,
                "chat": {"id": 123456, "type": "private"},
                "from": {"id": 123456, "is_bot": false, "first_name": "Ana", "username": "ana"},
                "text": "/battery"
            }
        }))
        .unwrap();

        let UpdateKind::Message(message) = update.kind() else {
            panic!("expected message");
        };
        assert_eq!(message.chat_identity(), Identity::new("123456"));
        assert_eq!(message.text(), "/battery");
        assert_eq!(message.message_id, 77);
    }

    #[test]
    fn test_callback_update() {
        let update: InboundUpdate = serde_json::from_value(json!({
            "update_id": 11,
            "callback_query": {
                "id": "cb-1",
                "data": "flash_on",
                "message": {"message_id": 5, "chat": {"id": -42}}
            }
        }))
        .unwrap();

        let UpdateKind::Callback(callback) = update.kind() else {
            panic!("expected callback");
        };
        assert_eq!(callback.id, "cb-1");
        assert_eq!(callback.chat_identity(), Some(Identity::new("-42")));
    }

    #[test]
    fn test_other_update_kinds_are_ignored() {
        let update: InboundUpdate = serde_json::from_value(json!({
            "update_id": 12,
            "edited_message": {"message_id": 1, "chat": {"id": 1}}
        }))
        .unwrap();
        assert!(matches!(update.kind(), UpdateKind::Other));

        let empty: InboundUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(empty.kind(), UpdateKind::Other));
    }

    #[test]
    fn test_media_message_has_empty_text() {
        let update: InboundUpdate = serde_json::from_value(json!({
            "message": {"message_id": 3, "chat": {"id": 9}, "photo": []}
        }))
        .unwrap();
        let UpdateKind::Message(message) = update.kind() else {
            panic!("expected message");
        };
        assert_eq!(message.text(), "");
    }
}
