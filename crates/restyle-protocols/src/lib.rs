//! # Restyle Protocols
//!
//! Protocol definitions (traits) shared by the restyle crates.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`TabHost`] - Resolves the active browser tab
//! - [`ScriptHost`] - Executes an [`Injection`] inside a tab
//! - [`Notifier`] - Raises one-shot user notifications
//! - [`Clipboard`] - Writes text to the system clipboard
//! - [`Document`] - The page a routine runs against
//! - [`PageRoutine`] - A routine delivered into a page

pub mod clipboard;
pub mod document;
pub mod error;
pub mod host;
pub mod notification;

pub use clipboard::Clipboard;
pub use document::{ClickAction, Document, NodeId, PageEvent, Subscription, SubscriptionId};
pub use error::{ClipboardError, DomError, HostError};
pub use host::{Injection, PageRoutine, ScriptHost, TabHost, TabInfo};
pub use notification::{Notification, NotificationKind, Notifier};

#[cfg(any(test, feature = "mock"))]
pub use clipboard::MockClipboard;
#[cfg(any(test, feature = "mock"))]
pub use host::{MockScriptHost, MockTabHost};
#[cfg(any(test, feature = "mock"))]
pub use notification::MockNotifier;
