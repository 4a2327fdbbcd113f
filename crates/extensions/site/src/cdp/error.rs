//! CDP errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Nothing answers on the debugging endpoint.
    #[error("No browser on the debugging endpoint {0}")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Error object the browser returned for a command.
    #[error("CDP error {code}: {message}")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Exception thrown by a page script.
    #[error("Page script failed: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Browser connection closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_display() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "Could not compute box model.".to_string(),
        };
        assert_eq!(err.to_string(), "CDP error -32000: Could not compute box model.");
    }

    #[test]
    fn test_json_error_converts() {
        let err: CdpError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, CdpError::Serialization(_)));
    }
}
