//! Dispatch errors.

use restyle_protocols::HostError;
use thiserror::Error;

/// Failures that stop a dispatch before any notification can help.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Cannot query the active tab: {0}")]
    TabQuery(#[source] HostError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DispatchError::TabQuery(HostError::Unavailable("connection refused".into()));
        assert!(err.to_string().starts_with("Cannot query the active tab"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
