//! # Restyle Browser
//!
//! Host integration for Chromium browsers over the DevTools protocol.
//!
//! - [`cdp`] - WebSocket CDP client and page sessions
//! - [`CdpHost`] - [`restyle_protocols::TabHost`] and
//!   [`restyle_protocols::ScriptHost`]
//! - [`CdpDocument`] - [`restyle_protocols::Document`] over a page session

pub mod cdp;
mod document;
mod host;

pub use cdp::{CdpClient, CdpError};
pub use document::CdpDocument;
pub use host::CdpHost;
