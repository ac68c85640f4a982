//! # Restyle Injector
//!
//! The page routine that restyles zhihu pages.
//!
//! - [`stylesheet`] - one-time global stylesheet
//! - [`logo`] - logo detection and replacement
//! - [`pass`] - the idempotent style pass
//! - [`debounce`] - trailing-edge timer for mutation bursts
//! - [`copy`] - copy-answers button, clipboard and side panel
//! - [`SiteStyler`] - ties the above to a live page

pub mod copy;
pub mod debounce;
pub mod logo;
pub mod pass;
mod styler;
pub mod stylesheet;

pub use copy::{CopyOutcome, Extraction};
pub use debounce::Debouncer;
pub use pass::{PassReport, StylePass};
pub use styler::{SiteStyler, StylerStats};
