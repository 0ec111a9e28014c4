//! Outbound calls to the Telegram Bot API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode, Recipient, ReplyParameters};
use tracing::{debug, warn};
use url::Url;

use devrelay_core::{Identity, RelayConfig};

use crate::error::{GatewayError, Result};

/// Outcome of a single gateway call: the platform payload or the error.
pub type GatewayResult = Result<Value>;

/// Messaging operations the relay needs from the chat platform.
///
/// Each method performs exactly one outbound request. Implementations must
/// not retry and must report failures through the returned value.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send HTML-formatted text, optionally as a reply to `reply_to`.
    async fn send_text(&self, target: &Identity, body: &str, reply_to: Option<i32>)
        -> GatewayResult;

    /// Send a photo by URL.
    async fn send_photo(&self, target: &Identity, url: &str, caption: &str) -> GatewayResult;

    /// Send a location pin.
    async fn send_location(&self, target: &Identity, latitude: f64, longitude: f64)
        -> GatewayResult;

    /// Acknowledge an inline keyboard button press.
    async fn answer_callback(&self, callback_id: &str) -> GatewayResult;

    /// Point the bot's webhook at `url`.
    async fn set_webhook(&self, url: &str) -> GatewayResult;
}

/// [`MessagingGateway`] backed by a teloxide [`Bot`].
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    /// Create a gateway for `token` with a per-request timeout.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            bot: Bot::with_client(token, client),
        })
    }

    /// Build the gateway described by the relay configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let gateway = Self::new(config.bot_token(), config.gateway_timeout)?;
        Ok(match &config.telegram_api_url {
            Some(url) => gateway.with_api_url(url.clone()),
            None => gateway,
        })
    }

    /// Send requests to a different Bot API server.
    pub fn with_api_url(mut self, url: Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    /// Look up the bot's username (used at startup to validate the token).
    pub async fn username(&self) -> Result<String> {
        let me = self.bot.get_me().await?;
        Ok(me.username().to_string())
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn send_text(
        &self,
        target: &Identity,
        body: &str,
        reply_to: Option<i32>,
    ) -> GatewayResult {
        let mut req = self
            .bot
            .send_message(recipient(target), body)
            .parse_mode(ParseMode::Html);

        if let Some(id) = reply_to {
            req = req.reply_parameters(ReplyParameters::new(MessageId(id)));
        }

        let result = req.await;
        finish("sendMessage", target, result)
    }

    async fn send_photo(&self, target: &Identity, url: &str, caption: &str) -> GatewayResult {
        let photo = parse_url(url)?;
        let result = self
            .bot
            .send_photo(recipient(target), InputFile::url(photo))
            .caption(caption)
            .await;
        finish("sendPhoto", target, result)
    }

    async fn send_location(
        &self,
        target: &Identity,
        latitude: f64,
        longitude: f64,
    ) -> GatewayResult {
        let result = self
            .bot
            .send_location(recipient(target), latitude, longitude)
            .await;
        finish("sendLocation", target, result)
    }

    async fn answer_callback(&self, callback_id: &str) -> GatewayResult {
        match self.bot.answer_callback_query(callback_id.to_string()).await {
            Ok(_) => Ok(Value::Bool(true)),
            Err(e) => {
                warn!(callback_id = %callback_id, error = %e, "answerCallbackQuery failed");
                Err(e.into())
            }
        }
    }

    async fn set_webhook(&self, url: &str) -> GatewayResult {
        let webhook = parse_url(url)?;
        match self.bot.set_webhook(webhook).await {
            Ok(_) => Ok(Value::Bool(true)),
            Err(e) => {
                warn!(url = %url, error = %e, "setWebhook failed");
                Err(e.into())
            }
        }
    }
}

/// Telegram addresses chats by numeric id or by `@channel` username.
fn recipient(target: &Identity) -> Recipient {
    match target.as_str().parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(target.as_str().to_string()),
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| GatewayError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

fn finish<T: Serialize>(
    method: &'static str,
    target: &Identity,
    result: std::result::Result<T, teloxide::RequestError>,
) -> GatewayResult {
    match result {
        Ok(payload) => {
            debug!(method, chat_id = %target, "Bot API call succeeded");
            Ok(serde_json::to_value(payload)?)
        }
        Err(e) => {
            warn!(method, chat_id = %target, error = %e, "Bot API call failed");
            Err(e.into())
        }
    }
}
