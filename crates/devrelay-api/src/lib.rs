//! HTTP relay endpoint for DevRelay.
//!
//! This crate exposes the relay over HTTP:
//! - `POST /webhook/telegram` receives bot updates and answers commands
//! - `POST /api/command` forwards dashboard commands to an authorized chat
//! - `GET /health` reports liveness and counts
//! - `GET /ws/reporter` carries the real-time channel to device reporters
//!
//! # Example
//!
//! ```ignore
//! use devrelay_api::{serve, ApiConfig, AppState};
//! use devrelay_core::RelayConfig;
//! use devrelay_telegram::TelegramGateway;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let relay = RelayConfig::new(std::env::var("TELEGRAM_BOT_TOKEN").ok())?;
//!     let gateway = TelegramGateway::from_config(&relay)?;
//!     let config = ApiConfig::default();
//!     let state = AppState::new(config.clone(), relay, Arc::new(gateway));
//!
//!     serve(config, state, async { let _ = tokio::signal::ctrl_c().await; }).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod hub;
pub mod router;
pub mod scheduler;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use hub::{ReporterHub, ReporterSession};
pub use router::{create_router, serve};
pub use scheduler::FollowUpScheduler;
pub use state::AppState;
