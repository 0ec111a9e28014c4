//! Telegram side of DevRelay.
//!
//! - [`MessagingGateway`]: the four messaging operations (plus webhook
//!   registration) the relay performs against the Bot API
//! - [`TelegramGateway`]: implementation over a teloxide `Bot`
//! - [`InboundUpdate`]: the subset of webhook updates the relay reads
//! - [`deliver`] / [`deliver_all`]: send generated replies
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use devrelay_core::Identity;
//! use devrelay_telegram::{MessagingGateway, TelegramGateway};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = TelegramGateway::new("123:token", Duration::from_secs(10))?;
//! gateway
//!     .send_text(&Identity::new("123456"), "<b>hello</b>", None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod error;
pub mod gateway;
pub mod update;

pub use delivery::{deliver, deliver_all};
pub use error::{GatewayError, Result};
pub use gateway::{GatewayResult, MessagingGateway, TelegramGateway};
pub use update::{InboundCallback, InboundMessage, InboundUpdate, UpdateKind};
