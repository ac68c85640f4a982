//! CDP errors and their mapping onto host and page errors.

use restyle_protocols::{DomError, HostError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Nothing answers on the DevTools HTTP endpoint.
    #[error("No DevTools endpoint at {0}; start the browser with --remote-debugging-port=9222")]
    Unreachable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The browser answered a command with an error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    /// An exception was thrown in the page.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("No reply to {0} in time")]
    Timeout(String),

    /// The socket went away before the reply arrived.
    #[error("Session closed")]
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

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for HostError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(_)
            | CdpError::Unreachable(_)
            | CdpError::WebSocket(_)
            | CdpError::Http(_)
            | CdpError::SessionClosed => HostError::Unavailable(e.to_string()),
            // Host messages are passed through so callers can match on them.
            CdpError::Protocol { message, .. } => HostError::ExecutionFailed(message),
            CdpError::JavaScript(message) => HostError::ExecutionFailed(message),
            other => HostError::ExecutionFailed(other.to_string()),
        }
    }
}

impl From<CdpError> for DomError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::SessionClosed | CdpError::WebSocket(_) => DomError::Closed,
            other => DomError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_message_passes_through() {
        let e = CdpError::Protocol {
            code: -32000,
            message: "Cannot access a chrome:// URL".to_string(),
        };
        let host: HostError = e.into();
        assert!(host.mentions("Cannot access a chrome:// URL"));
    }

    #[test]
    fn test_unavailable() {
        let host: HostError = CdpError::Unreachable("http://localhost:9222".into()).into();
        assert!(matches!(host, HostError::Unavailable(_)));
    }

    #[test]
    fn test_closed_session_is_closed_document() {
        let dom: DomError = CdpError::SessionClosed.into();
        assert!(matches!(dom, DomError::Closed));
    }
}
