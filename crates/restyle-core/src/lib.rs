//! # Restyle Core
//!
//! The dispatcher that decides whether and how a routine is delivered
//! to the active tab.
//!
//! - [`Dispatcher`] - resolves the tab, applies [`DispatchRules`] and
//!   requests execution
//! - [`notices`] - the user-facing notifications it raises

pub mod dispatcher;
pub mod error;
pub mod notices;
pub mod rules;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::DispatchError;
pub use rules::DispatchRules;
