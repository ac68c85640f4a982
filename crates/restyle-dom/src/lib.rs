//! # Restyle DOM
//!
//! An in-memory page document for running page routines without a
//! browser: offline previews of local HTML files and tests.
//!
//! - [`tree`] - arena DOM tree
//! - [`selector`] - CSS selector subset used by routines
//! - [`parse`] / [`serialize`] - HTML in and out (html5ever)
//! - [`MemoryDocument`] - [`restyle_protocols::Document`] over a tree

mod document;
pub mod parse;
pub mod selector;
pub mod serialize;
pub mod style;
pub mod tree;

pub use document::MemoryDocument;
pub use parse::parse_html;
pub use selector::SelectorList;
pub use tree::DomTree;
