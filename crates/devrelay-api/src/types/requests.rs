//! Request DTOs for the API.

use serde::Deserialize;
use serde_json::Value;

use devrelay_core::Identity;

/// Dashboard command request.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    /// Command name, with or without a leading `/`.
    #[serde(default)]
    pub command: String,
    /// Command parameters, forwarded verbatim in the notification.
    #[serde(default)]
    pub data: Option<Value>,
    /// Chat to notify; a JSON string or integer.
    #[serde(default)]
    pub telegram_chat_id: Option<Identity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_id_accepts_string_and_integer() {
        let req: CommandRequest = serde_json::from_value(json!({
            "command": "get_battery",
            "telegram_chat_id": "111"
        }))
        .unwrap();
        assert_eq!(req.telegram_chat_id, Some(Identity::new("111")));

        let req: CommandRequest = serde_json::from_value(json!({
            "command": "get_battery",
            "telegram_chat_id": 111
        }))
        .unwrap();
        assert_eq!(req.telegram_chat_id, Some(Identity::new("111")));
    }

    #[test]
    fn test_missing_fields_default() {
        let req: CommandRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.command.is_empty());
        assert!(req.data.is_none());
        assert!(req.telegram_chat_id.is_none());
    }
}
