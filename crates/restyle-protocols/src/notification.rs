//! User-facing notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Presentation style of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Basic,
    Image,
    List,
    Progress,
}

/// Payload of a one-shot notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub icon_url: Option<String>,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Basic,
            icon_url: None,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn with_icon(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }
}

/// Raises a user-visible alert. Fire-and-forget: no acknowledgement or
/// dismissal is tracked.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, id: &str, notification: &Notification) -> Result<(), HostError>;
}
