//! Notifiers.

use std::sync::Arc;

use async_trait::async_trait;
use restyle_config::NotifyChannel;
use restyle_protocols::{HostError, Notification, Notifier};
use tracing::{info, warn};

const APP_NAME: &str = "restyle";

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, id: &str, notification: &Notification) -> Result<(), HostError> {
        warn!(id, "{}: {}", notification.title, notification.message);
        Ok(())
    }
}

/// Shows notifications through the desktop: `notify-send` on Linux,
/// `osascript` on macOS.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, id: &str, notification: &Notification) -> Result<(), HostError> {
        let title = if notification.title.is_empty() {
            APP_NAME
        } else {
            notification.title.as_str()
        };
        let output = desktop_command(title, notification)?
            .output()
            .await
            .map_err(|e| HostError::Notification(e.to_string()))?;

        if !output.status.success() {
            return Err(HostError::Notification(format!(
                "Failed to send desktop notification: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        info!(id, "Desktop notification sent");
        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn desktop_command(
    title: &str,
    notification: &Notification,
) -> Result<tokio::process::Command, HostError> {
    let mut cmd = tokio::process::Command::new("notify-send");
    cmd.args(["--app-name", APP_NAME]);
    if let Some(icon) = &notification.icon_url {
        cmd.args(["--icon", icon]);
    }
    cmd.args([title, notification.message.as_str()]);
    Ok(cmd)
}

#[cfg(target_os = "macos")]
fn desktop_command(
    title: &str,
    notification: &Notification,
) -> Result<tokio::process::Command, HostError> {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        escape_applescript(&notification.message),
        escape_applescript(title)
    );
    let mut cmd = tokio::process::Command::new("osascript");
    cmd.args(["-e", &script]);
    Ok(cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn desktop_command(
    _title: &str,
    _notification: &Notification,
) -> Result<tokio::process::Command, HostError> {
    Err(HostError::Notification(
        "Desktop notifications not supported on this platform".to_string(),
    ))
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape_applescript(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}

/// Notifier for the configured channel.
pub fn notifier_for(channel: NotifyChannel) -> Arc<dyn Notifier> {
    match channel {
        NotifyChannel::Log => Arc::new(LogNotifier),
        NotifyChannel::Desktop => Arc::new(DesktopNotifier::new()),
    }
}
