//! Error types for the restyle protocol layer.

mod clipboard;
mod dom;
mod host;

pub use clipboard::*;
pub use dom::*;
pub use host::*;
