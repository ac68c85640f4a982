//! Page document errors.

use thiserror::Error;

use crate::document::NodeId;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Node {0} has no parent")]
    Detached(NodeId),

    #[error("Document is gone")]
    Closed,

    #[error("Page backend error: {0}")]
    Backend(String),
}
