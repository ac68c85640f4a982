//! # Restyle Desktop
//!
//! Desktop-side host capabilities.
//!
//! - [`LogNotifier`] / [`DesktopNotifier`] - [`restyle_protocols::Notifier`]s
//! - [`SystemClipboard`] - [`restyle_protocols::Clipboard`] over `arboard`

mod clipboard;
mod notify;

pub use clipboard::SystemClipboard;
pub use notify::{DesktopNotifier, LogNotifier, notifier_for};
