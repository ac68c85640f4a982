//! System clipboard.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use restyle_protocols::{Clipboard, ClipboardError};
use tracing::debug;

/// Clipboard backed by the OS clipboard.
///
/// The `arboard` handle is opened on first use and kept, since some
/// platforms drop clipboard contents when the owning handle goes away.
/// Writes run on the blocking pool.
#[derive(Clone, Default)]
pub struct SystemClipboard {
    handle: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self.handle.lock();
        if guard.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            *guard = Some(clipboard);
        }
        let Some(clipboard) = guard.as_mut() else {
            return Err(ClipboardError::Unavailable("no clipboard handle".to_string()));
        };
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::AccessFailed(e.to_string()))
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let this = self.clone();
        let text = text.to_string();
        let len = text.len();
        tokio::task::spawn_blocking(move || this.set_text(&text))
            .await
            .map_err(|e| ClipboardError::AccessFailed(e.to_string()))??;
        debug!(bytes = len, "Clipboard written");
        Ok(())
    }
}
