//! Clipboard capability.

use async_trait::async_trait;

use crate::error::ClipboardError;

/// Writes text to the system clipboard.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}
