//! Relay request handlers.

pub mod command;
pub mod health;
pub mod reporter;
pub mod webhook;

pub use command::*;
pub use health::*;
pub use reporter::*;
pub use webhook::*;
