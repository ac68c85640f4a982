//! Host (browser) errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Browser unavailable: {0}")]
    Unavailable(String),

    #[error("Tab query failed: {0}")]
    TabQuery(String),

    #[error("{0}")]
    ExecutionFailed(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    /// Whether the failure message contains `phrase`.
    ///
    /// Hosts only describe rejections in free text, so callers classify
    /// failures by substring.
    pub fn mentions(&self, phrase: &str) -> bool {
        self.to_string().contains(phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_failed_keeps_host_message() {
        let err = HostError::ExecutionFailed("Cannot access a chrome:// URL".to_string());
        assert_eq!(err.to_string(), "Cannot access a chrome:// URL");
    }

    #[test]
    fn test_mentions() {
        let err = HostError::ExecutionFailed("Error: Cannot access a chrome:// URL".to_string());
        assert!(err.mentions("Cannot access a chrome:// URL"));
        assert!(!err.mentions("timeout"));
    }

    #[test]
    fn test_unavailable() {
        let err = HostError::Unavailable("http://localhost:9222".to_string());
        assert!(err.to_string().contains("unavailable"));
        assert!(err.to_string().contains("9222"));
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "script.js");
        let err: HostError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }
}
