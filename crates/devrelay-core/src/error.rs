//! Error types for relay configuration.

use thiserror::Error;

/// Errors raised while assembling the relay configuration.
///
/// These are fatal: the relay refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    MissingToken,

    /// A configured URL could not be used.
    #[error("Invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        assert!(ConfigError::MissingToken
            .to_string()
            .contains("TELEGRAM_BOT_TOKEN"));
        let err = ConfigError::InvalidUrl {
            name: "PUBLIC_URL",
            reason: "empty host".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid URL for PUBLIC_URL: empty host");
    }
}
