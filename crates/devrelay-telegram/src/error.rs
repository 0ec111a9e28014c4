//! Error types for the messaging gateway.

use thiserror::Error;

/// Errors returned by gateway calls.
///
/// Gateway methods never panic or retry; every failure is surfaced as one of
/// these values and its `Display` text is what callers report upstream.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The Bot API rejected the request or the HTTP call failed.
    #[error("{0}")]
    Request(#[from] teloxide::RequestError),

    /// A URL argument could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),

    /// The platform response could not be converted to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Client(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let err = GatewayError::InvalidUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid URL 'not a url': relative URL without a base"
        );
    }
}
