//! Relay configuration.
//!
//! Built once at startup and shared read-only with every handler.
//!
//! # Environment Variables
//!
//! - `TELEGRAM_BOT_TOKEN` (required): bot credential
//! - `AUTHORIZED_CHAT_IDS`: comma-separated allow-list
//! - `PUBLIC_URL`: public base URL; when set the webhook is registered on startup
//! - `TELEGRAM_API_URL`: override for the Bot API base URL
//! - `GATEWAY_TIMEOUT_SECS`: per-request timeout for Bot API calls

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::auth::AuthorizationGuard;
use crate::error::{ConfigError, Result};

/// Path the Bot API posts updates to.
pub const WEBHOOK_PATH: &str = "/webhook/telegram";

const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable relay configuration.
#[derive(Clone)]
pub struct RelayConfig {
    bot_token: String,
    /// Allow-list of chats permitted to issue commands.
    pub guard: AuthorizationGuard,
    /// Public base URL of this relay, used to register the webhook.
    pub public_url: Option<Url>,
    /// Bot API base URL override (tests, self-hosted Bot API servers).
    pub telegram_api_url: Option<Url>,
    /// Timeout applied to every Bot API request.
    pub gateway_timeout: Duration,
    /// Send the canned rejection to unauthorized chats instead of staying silent.
    pub notify_unauthorized: bool,
}

impl RelayConfig {
    /// Create a configuration from a bot token.
    ///
    /// A missing or blank token is fatal.
    pub fn new(bot_token: Option<String>) -> Result<Self> {
        let bot_token = bot_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            bot_token,
            guard: AuthorizationGuard::default(),
            public_url: None,
            telegram_api_url: None,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            notify_unauthorized: true,
        })
    }

    /// Sets the allow-list from a comma-separated string.
    pub fn with_authorized_list(mut self, list: &str) -> Self {
        self.guard = AuthorizationGuard::from_list(list);
        self
    }

    /// Sets the public base URL. A bare host (as some platforms export) gets
    /// an `https://` scheme.
    pub fn with_public_url(mut self, url: &str) -> Result<Self> {
        self.public_url = Some(parse_base_url("PUBLIC_URL", url)?);
        Ok(self)
    }

    /// Sets the Bot API base URL override.
    pub fn with_telegram_api_url(mut self, url: &str) -> Result<Self> {
        self.telegram_api_url = Some(parse_base_url("TELEGRAM_API_URL", url)?);
        Ok(self)
    }

    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    pub fn with_notify_unauthorized(mut self, notify: bool) -> Self {
        self.notify_unauthorized = notify;
        self
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    /// Token safe for logs: first 4 and last 4 characters only.
    pub fn masked_token(&self) -> String {
        mask_token(&self.bot_token)
    }

    /// Full webhook URL, if a public URL is configured.
    pub fn webhook_url(&self) -> Option<String> {
        self.public_url.as_ref().map(|base| {
            format!("{}{}", base.as_str().trim_end_matches('/'), WEBHOOK_PATH)
        })
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &self.masked_token())
            .field("authorized_chats", &self.guard.len())
            .field("public_url", &self.public_url.as_ref().map(Url::as_str))
            .field("telegram_api_url", &self.telegram_api_url.as_ref().map(Url::as_str))
            .field("gateway_timeout", &self.gateway_timeout)
            .field("notify_unauthorized", &self.notify_unauthorized)
            .finish()
    }
}

/// Mask a secret for logging. Short values are fully hidden.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

fn parse_base_url(name: &'static str, raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl {
            name,
            reason: "missing host".to_string(),
        });
    }

    Ok(url)
}
