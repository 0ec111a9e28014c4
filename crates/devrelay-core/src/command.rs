//! Command parsing and interpretation.
//!
//! Commands arrive in two shapes: slash-delimited chat text (`/sms +62812 hi`)
//! and structured web requests (`{"command": "sms", "data": {...}}`). Both are
//! first turned into a [`Command`] and then interpreted at a single boundary,
//! [`Command::interpret`], into an [`Interpretation`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Channel a command arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Web,
    Chat,
}

/// A command as received, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lowercased command name without the leading `/`.
    pub name: String,
    /// Named parameters (`number`, `body`) extracted from the input.
    pub parameters: BTreeMap<String, String>,
    pub origin: Origin,
    /// The original input, kept for `Action::Unknown`.
    raw: String,
    /// False for chat text that does not start with `/`.
    is_slash: bool,
}

/// Normalized action, independent of the channel it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Help,
    Status,
    Battery,
    Location,
    DeviceInfo,
    Screenshot,
    Camera,
    FlashToggle,
    Apps,
    Notifications,
    Reboot,
    SendSms { number: String, body: String },
    Call { number: String },
    Unknown(String),
}

/// Which command a usage hint is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageHint {
    Sms,
    Call,
}

/// Result of interpreting a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Action(Action),
    /// A known command with missing arguments.
    Usage(UsageHint),
    /// Chat text that is not a slash command at all.
    NotACommand,
}

impl Command {
    /// Parse chat text.
    ///
    /// The command token may carry a bot suffix (`/status@MyBot`), which is
    /// stripped. Positional arguments for `/sms` and `/call` are mapped onto
    /// the same named parameters the web path uses.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        let is_slash = trimmed.starts_with('/');
        let mut tokens = trimmed.split_whitespace();

        let name = if is_slash {
            tokens
                .next()
                .map(normalize_name)
                .unwrap_or_default()
        } else {
            String::new()
        };

        let args: Vec<&str> = tokens.collect();
        let mut parameters = BTreeMap::new();
        match name.as_str() {
            "sms" => {
                if let Some(number) = args.first() {
                    parameters.insert("number".to_string(), (*number).to_string());
                }
                if args.len() > 1 {
                    parameters.insert("body".to_string(), args[1..].join(" "));
                }
            }
            "call" => {
                if let Some(number) = args.first() {
                    parameters.insert("number".to_string(), (*number).to_string());
                }
            }
            _ => {}
        }

        Self {
            name,
            parameters,
            origin: Origin::Chat,
            raw: trimmed.to_string(),
            is_slash,
        }
    }

    /// Build a command from the web path's `{command, data}` shape.
    ///
    /// Object values in `data` become string parameters; strings are taken
    /// as-is and other JSON values use their compact serialization.
    pub fn structured(name: &str, data: Option<&Value>) -> Self {
        let mut parameters = BTreeMap::new();
        if let Some(Value::Object(map)) = data {
            for (key, value) in map {
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => continue,
                    other => other.to_string(),
                };
                parameters.insert(key.clone(), value);
            }
        }

        Self {
            name: normalize_name(name.trim()),
            parameters,
            origin: Origin::Web,
            raw: name.trim().to_string(),
            is_slash: true,
        }
    }

    /// Non-empty parameter lookup.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Map the command onto an [`Interpretation`].
    pub fn interpret(&self) -> Interpretation {
        if !self.is_slash {
            return Interpretation::NotACommand;
        }

        let action = match self.name.as_str() {
            "start" => Action::Start,
            "help" => Action::Help,
            "status" => Action::Status,
            "battery" | "get_battery" => Action::Battery,
            "location" | "get_location" => Action::Location,
            "deviceinfo" | "device_info" | "get_device_info" => Action::DeviceInfo,
            "screenshot" | "take_screenshot" => Action::Screenshot,
            "camera" | "take_photo" => Action::Camera,
            "flash" | "flash_on" | "flash_off" | "flash_toggle" => Action::FlashToggle,
            "apps" => Action::Apps,
            "notifications" => Action::Notifications,
            "reboot" => Action::Reboot,
            "sms" => {
                let body = self.param("body").or_else(|| self.param("message"));
                match (self.param("number"), body) {
                    (Some(number), Some(body)) => Action::SendSms {
                        number: number.to_string(),
                        body: body.to_string(),
                    },
                    _ => return Interpretation::Usage(UsageHint::Sms),
                }
            }
            "call" => match self.param("number") {
                Some(number) => Action::Call {
                    number: number.to_string(),
                },
                None => return Interpretation::Usage(UsageHint::Call),
            },
            _ => {
                debug!(command = %self.raw, origin = ?self.origin, "Unrecognized command");
                Action::Unknown(self.raw.clone())
            }
        };

        Interpretation::Action(action)
    }
}

/// Convenience wrapper: parse and interpret chat text in one step.
pub fn interpret(raw: &str) -> Interpretation {
    Command::from_text(raw).interpret()
}

/// Strip a leading `/` and any `@BotName` suffix, then lowercase.
fn normalize_name(token: &str) -> String {
    let token = token.strip_prefix('/').unwrap_or(token);
    let token = token.split('@').next().unwrap_or(token);
    token.to_ascii_lowercase()
}
