//! Core types for DevRelay.
//!
//! DevRelay relays commands between a web dashboard, a Telegram bot and a
//! browser-side device telemetry reporter. This crate holds everything that
//! does not touch the network:
//!
//! - [`AuthorizationGuard`]: static allow-list of chat identities
//! - [`Command`] / [`Interpretation`]: parsing chat text and web requests
//!   into a closed [`Action`] set
//! - [`reply`]: canned and simulated responses for each action
//! - [`telemetry`]: frames exchanged with telemetry reporters
//! - [`RelayConfig`]: startup configuration
//!
//! # Example
//!
//! ```
//! use devrelay_core::{interpret, Action, Interpretation};
//!
//! assert_eq!(
//!     interpret("/call +6281234"),
//!     Interpretation::Action(Action::Call { number: "+6281234".into() })
//! );
//! ```

pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod reply;
pub mod telemetry;

pub use auth::{parse_identity_list, AuthorizationGuard, Identity};
pub use command::{interpret, Action, Command, Interpretation, Origin, UsageHint};
pub use config::{mask_token, RelayConfig, WEBHOOK_PATH};
pub use error::{ConfigError, Result};
pub use reply::{respond, FollowUp, Outbound, Reply};
pub use telemetry::{DeviceCommand, DeviceSnapshot, GeoFix, RelayFrame, ReporterFrame};
