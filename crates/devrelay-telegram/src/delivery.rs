//! Delivery of generated replies through a [`MessagingGateway`].

use devrelay_core::{Identity, Outbound};
use tracing::warn;

use crate::gateway::{GatewayResult, MessagingGateway};

/// Send one reply message to `target`.
///
/// `reply_to` is only attached to text marked as a reply.
pub async fn deliver(
    gateway: &dyn MessagingGateway,
    target: &Identity,
    reply_to: Option<i32>,
    message: &Outbound,
) -> GatewayResult {
    match message {
        Outbound::Text { body, reply } => {
            let reply_to = if *reply { reply_to } else { None };
            gateway.send_text(target, body, reply_to).await
        }
        Outbound::Photo { url, caption } => gateway.send_photo(target, url, caption).await,
        Outbound::Location {
            latitude,
            longitude,
        } => gateway.send_location(target, *latitude, *longitude).await,
    }
}

/// Send messages in order, logging failures and continuing with the rest.
///
/// Returns the number of messages the platform accepted.
pub async fn deliver_all(
    gateway: &dyn MessagingGateway,
    target: &Identity,
    reply_to: Option<i32>,
    messages: &[Outbound],
) -> usize {
    let mut delivered = 0;
    for message in messages {
        match deliver(gateway, target, reply_to, message).await {
            Ok(_) => delivered += 1,
            Err(e) => warn!(chat_id = %target, error = %e, "Failed to deliver reply"),
        }
    }
    delivered
}
