//! Reply generation for interpreted commands.
//!
//! Device values (battery, location) are simulated: the relay has no device
//! subsystem, so these are random stand-ins drawn from fixed distributions.
//! The random source is injected so callers can seed it.

use std::time::Duration;

use rand::Rng;
use serde_json::Value;

use crate::command::{Action, Interpretation, UsageHint};

/// Base coordinate perturbed by simulated location fixes.
pub const BASE_LATITUDE: f64 = -6.2088;
pub const BASE_LONGITUDE: f64 = 106.8456;

/// Half-width of the uniform offset applied to each axis, in degrees.
pub const LOCATION_JITTER: f64 = 0.005;

pub const SCREENSHOT_DELAY: Duration = Duration::from_secs(2);
pub const CAMERA_DELAY: Duration = Duration::from_secs(3);
pub const REBOOT_DELAY: Duration = Duration::from_secs(5);

const SCREENSHOT_URL: &str =
    "https://via.placeholder.com/400x800/2a5298/ffffff?text=Simulated+Screenshot";
const CAMERA_URL: &str =
    "https://via.placeholder.com/400x600/1e3c72/ffffff?text=Simulated+Camera+Photo";

const INSTALLED_APPS: [&str; 6] = ["WhatsApp", "Instagram", "Facebook", "Chrome", "YouTube", "Gmail"];
const LISTED_APPS: usize = 5;

/// Canned reply sent to chats that are not on the allow-list.
pub const UNAUTHORIZED_REPLY: &str = "❌ You are not authorized to access this device.";

/// One message to deliver to the chat that issued the command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// HTML-formatted text; `reply` threads it under the triggering message.
    Text { body: String, reply: bool },
    Photo { url: String, caption: String },
    Location { latitude: f64, longitude: f64 },
}

impl Outbound {
    fn text(body: impl Into<String>) -> Self {
        Outbound::Text {
            body: body.into(),
            reply: true,
        }
    }
}

/// A message delivered after a delay, once the request has completed.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUp {
    pub delay: Duration,
    pub message: Outbound,
}

/// Everything the relay sends back for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Sent in order before the request completes.
    pub messages: Vec<Outbound>,
    pub follow_up: Option<FollowUp>,
}

impl Reply {
    fn single(message: Outbound) -> Self {
        Self {
            messages: vec![message],
            follow_up: None,
        }
    }

    fn deferred(ack: Outbound, delay: Duration, later: Outbound) -> Self {
        Self {
            messages: vec![ack],
            follow_up: Some(FollowUp {
                delay,
                message: later,
            }),
        }
    }
}

/// Simulated battery reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    /// Percentage in `0..100`.
    pub level: u8,
    pub charging: bool,
}

/// Simulated location fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

pub fn simulate_battery<R: Rng + ?Sized>(rng: &mut R) -> BatteryReading {
    BatteryReading {
        level: rng.gen_range(0..100),
        charging: rng.gen_bool(0.5),
    }
}

pub fn simulate_location<R: Rng + ?Sized>(rng: &mut R) -> Coordinates {
    Coordinates {
        latitude: BASE_LATITUDE + rng.gen_range(-LOCATION_JITTER..LOCATION_JITTER),
        longitude: BASE_LONGITUDE + rng.gen_range(-LOCATION_JITTER..LOCATION_JITTER),
    }
}

/// Produce the reply for an interpretation.
pub fn respond<R: Rng + ?Sized>(interpretation: &Interpretation, rng: &mut R) -> Reply {
    match interpretation {
        Interpretation::Action(action) => respond_to_action(action, rng),
        Interpretation::Usage(UsageHint::Sms) => Reply::single(Outbound::text(
            "Format: /sms [number] [message]\nExample: /sms +628123456789 Hello, this is a test",
        )),
        Interpretation::Usage(UsageHint::Call) => Reply::single(Outbound::text(
            "Format: /call [number]\nExample: /call +628123456789",
        )),
        Interpretation::NotACommand => Reply::single(Outbound::Text {
            body: "Unrecognized message. Use /help to see the list of commands.".to_string(),
            reply: false,
        }),
    }
}

fn respond_to_action<R: Rng + ?Sized>(action: &Action, rng: &mut R) -> Reply {
    match action {
        Action::Start => Reply::single(Outbound::text(START_TEXT)),
        Action::Help => Reply::single(Outbound::text(HELP_TEXT)),
        Action::Status => Reply::single(Outbound::text(
            "✅ Device connected and ready for commands.",
        )),
        Action::Battery => {
            let reading = simulate_battery(rng);
            Reply::single(Outbound::text(format!(
                "🔋 <b>Battery Status</b>\nLevel: {}%\nStatus: {}\nHealth: Good",
                reading.level,
                if reading.charging { "Charging" } else { "Not charging" }
            )))
        }
        Action::Location => {
            let fix = simulate_location(rng);
            Reply {
                messages: vec![
                    Outbound::Location {
                        latitude: fix.latitude,
                        longitude: fix.longitude,
                    },
                    Outbound::text(format!(
                        "📍 <b>Device Location</b>\n\
                         Latitude: {lat:.6}\n\
                         Longitude: {lng:.6}\n\
                         Accuracy: ±20 meters\n\n\
                         <a href=\"https://maps.google.com/?q={lat},{lng}\">View on Google Maps</a>",
                        lat = fix.latitude,
                        lng = fix.longitude
                    )),
                ],
                follow_up: None,
            }
        }
        Action::DeviceInfo => Reply::single(Outbound::text(
            "📱 <b>Device Information</b>\n\n\
             Model: Samsung Galaxy S21\n\
             Android: 13.0\n\
             RAM: 8 GB\n\
             Storage: 128 GB\n\
             IMEI: 123456789012345\n\
             IP Address: 192.168.1.100",
        )),
        Action::Screenshot => Reply::deferred(
            Outbound::text("📸 Taking screenshot..."),
            SCREENSHOT_DELAY,
            Outbound::Photo {
                url: SCREENSHOT_URL.to_string(),
                caption: "Device screenshot".to_string(),
            },
        ),
        Action::Camera => Reply::deferred(
            Outbound::text("📷 Taking photo from camera..."),
            CAMERA_DELAY,
            Outbound::Photo {
                url: CAMERA_URL.to_string(),
                caption: "Photo from device camera".to_string(),
            },
        ),
        Action::FlashToggle => Reply::single(Outbound::text("🔦 Flash toggled")),
        Action::Apps => {
            let listed: Vec<String> = INSTALLED_APPS
                .iter()
                .take(LISTED_APPS)
                .map(|app| format!("• {}", app))
                .collect();
            Reply::single(Outbound::text(format!(
                "📲 <b>Installed Apps</b>\n\n{}\n\n...and {} more apps.",
                listed.join("\n"),
                INSTALLED_APPS.len() - LISTED_APPS
            )))
        }
        Action::Notifications => Reply::single(Outbound::text(
            "🔔 <b>Recent Notifications</b>\n\n\
             • WhatsApp: New message from John\n\
             • Instagram: Someone liked your photo\n\
             • Gmail: Important email from your bank",
        )),
        Action::Reboot => Reply::deferred(
            Outbound::text("🔄 Rebooting device..."),
            REBOOT_DELAY,
            Outbound::text("✅ Device has been rebooted."),
        ),
        Action::SendSms { number, body } => Reply::single(Outbound::text(format!(
            "📱 <b>SMS Sent</b>\n\nTo: {}\nMessage: {}",
            html_escape(number),
            html_escape(body)
        ))),
        Action::Call { number } => Reply::single(Outbound::text(format!(
            "📞 <b>Calling</b>\n\nNumber: {}",
            html_escape(number)
        ))),
        Action::Unknown(_) => Reply::single(Outbound::text(
            "Command not recognized. Use /help for assistance.",
        )),
    }
}

/// Notification forwarded to chat for a command issued from the web UI.
///
/// `data` is included verbatim (compact JSON) unless it is null or empty.
pub fn format_web_notification(command: &str, data: Option<&Value>) -> String {
    let mut message = format!(
        "🖥️ <b>Command from Web</b>\n\nCommand: <code>{}</code>",
        html_escape(command)
    );

    if let Some(data) = data.filter(|d| has_content(d)) {
        message.push_str(&format!("\nData: <code>{}</code>", html_escape(&data.to_string())));
    }

    message
}

/// Echo sent back when a user presses an inline keyboard button.
pub fn format_callback_echo(data: &str) -> String {
    format!("You selected: {}", html_escape(data))
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Escape text for Telegram's HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const START_TEXT: &str = "🤖 <b>Remote Device Controller Bot</b>\n\n\
Use the following commands to control the device:\n\n\
📱 <b>Device Information</b>\n\
/battery - Check battery status\n\
/location - Get device location\n\
/deviceinfo - Device information\n\n\
📸 <b>Camera &amp; Media</b>\n\
/screenshot - Take a screenshot\n\
/camera - Take a photo with the camera\n\
/flash - Toggle the flash\n\n\
⚙️ <b>System</b>\n\
/apps - List installed apps\n\
/notifications - Recent notifications\n\
/reboot - Restart the device\n\n\
📞 <b>Messages &amp; Calls</b>\n\
/sms [number] [message] - Send an SMS\n\
/call [number] - Place a call\n\n\
🆘 <b>Other</b>\n\
/help - Show this help\n\
/status - Connection status";

const HELP_TEXT: &str = "🆘 <b>Command Help</b>\n\n\
Use the following formats:\n\n\
• <code>/sms +628123456789 Your message</code>\n\
• <code>/call +628123456789</code>\n\n\
Other commands take no parameters.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{interpret, Command};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn text_of(message: &Outbound) -> &str {
        match message {
            Outbound::Text { body, .. } => body,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_battery_distribution_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut saw_charging = false;
        let mut saw_discharging = false;
        for _ in 0..500 {
            let reading = simulate_battery(&mut rng);
            assert!(reading.level < 100);
            saw_charging |= reading.charging;
            saw_discharging |= !reading.charging;
        }
        assert!(saw_charging && saw_discharging);
    }

    #[test]
    fn test_location_stays_within_jitter() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let fix = simulate_location(&mut rng);
            assert!((fix.latitude - BASE_LATITUDE).abs() <= LOCATION_JITTER);
            assert!((fix.longitude - BASE_LONGITUDE).abs() <= LOCATION_JITTER);
        }
    }

    #[test]
    fn test_location_reply_sends_pin_then_text() {
        let mut rng = StdRng::seed_from_u64(3);
        let reply = respond(&interpret("/location"), &mut rng);
        assert_eq!(reply.messages.len(), 2);
        let Outbound::Location { latitude, longitude } = &reply.messages[0] else {
            panic!("first message should be a location pin");
        };
        let body = text_of(&reply.messages[1]);
        assert!(body.contains(&format!("{:.6}", latitude)));
        assert!(body.contains(&format!("{:.6}", longitude)));
        assert!(body.contains("maps.google.com"));
    }

    #[test]
    fn test_deferred_actions_have_follow_ups() {
        let mut rng = StdRng::seed_from_u64(1);

        let reply = respond(&interpret("/screenshot"), &mut rng);
        let follow_up = reply.follow_up.expect("screenshot follow-up");
        assert_eq!(follow_up.delay, SCREENSHOT_DELAY);
        assert!(matches!(follow_up.message, Outbound::Photo { .. }));

        let reply = respond(&interpret("/camera"), &mut rng);
        assert_eq!(reply.follow_up.unwrap().delay, CAMERA_DELAY);

        let reply = respond(&interpret("/reboot"), &mut rng);
        let follow_up = reply.follow_up.unwrap();
        assert_eq!(follow_up.delay, REBOOT_DELAY);
        assert_eq!(text_of(&follow_up.message), "✅ Device has been rebooted.");

        assert!(respond(&interpret("/status"), &mut rng).follow_up.is_none());
    }

    #[test]
    fn test_not_a_command_differs_from_unknown() {
        let mut rng = StdRng::seed_from_u64(1);
        let plain = respond(&interpret("hello"), &mut rng);
        let unknown = respond(&interpret("/bogus"), &mut rng);
        assert_ne!(plain, unknown);
        assert!(matches!(plain.messages[0], Outbound::Text { reply: false, .. }));
        assert!(text_of(&unknown.messages[0]).contains("not recognized"));
    }

    #[test]
    fn test_usage_hints() {
        let mut rng = StdRng::seed_from_u64(1);
        let sms = respond(&interpret("/sms +62"), &mut rng);
        assert!(text_of(&sms.messages[0]).starts_with("Format: /sms"));
        let call = respond(&interpret("/call"), &mut rng);
        assert!(text_of(&call.messages[0]).starts_with("Format: /call"));
    }

    #[test]
    fn test_sms_reply_escapes_body() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = respond(&interpret("/sms +62 <b>hi</b> & bye"), &mut rng);
        let body = text_of(&reply.messages[0]);
        assert!(body.contains("&lt;b&gt;hi&lt;/b&gt; &amp; bye"));
    }

    #[test]
    fn test_apps_lists_five() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = respond(&interpret("/apps"), &mut rng);
        let body = text_of(&reply.messages[0]);
        assert_eq!(body.matches("• ").count(), 5);
        assert!(body.contains("...and 1 more apps."));
    }

    #[test]
    fn test_web_and_chat_paths_reply_identically() {
        let pairs = [
            ("/start", Command::structured("start", None)),
            ("/help", Command::structured("help", None)),
            ("/status", Command::structured("status", None)),
            ("/battery", Command::structured("battery", None)),
            ("/location", Command::structured("location", None)),
            ("/deviceinfo", Command::structured("deviceinfo", None)),
            ("/screenshot", Command::structured("screenshot", None)),
            ("/camera", Command::structured("camera", None)),
            ("/flash", Command::structured("flash", None)),
            ("/apps", Command::structured("apps", None)),
            ("/notifications", Command::structured("notifications", None)),
            ("/reboot", Command::structured("reboot", None)),
            (
                "/sms +6281234 hello world",
                Command::structured("sms", Some(&json!({"number": "+6281234", "body": "hello world"}))),
            ),
            (
                "/call +6281234",
                Command::structured("call", Some(&json!({"number": "+6281234"}))),
            ),
        ];

        for (text, web) in pairs {
            let chat_reply = respond(&interpret(text), &mut StdRng::seed_from_u64(42));
            let web_reply = respond(&web.interpret(), &mut StdRng::seed_from_u64(42));
            assert_eq!(chat_reply, web_reply, "mismatch for {text}");
        }
    }

    #[test]
    fn test_web_notification_formatting() {
        assert_eq!(
            format_web_notification("get_battery", None),
            "🖥️ <b>Command from Web</b>\n\nCommand: <code>get_battery</code>"
        );
        let with_data = format_web_notification("sms", Some(&json!({"number": "+62"})));
        assert!(with_data.ends_with("\nData: <code>{\"number\":\"+62\"}</code>"));
        let empty = format_web_notification("sms", Some(&json!({})));
        assert!(!empty.contains("Data:"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }
}
