//! Page document protocol.
//!
//! A [`Document`] is the page a routine runs against. Elements are
//! addressed by opaque [`NodeId`] handles whose meaning belongs to the
//! implementation: an arena index for the in-memory DOM, a registered
//! remote object for a CDP-backed page.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::DomError;

/// Opaque handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a bound element does when the user clicks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    /// Extract answers, copy them and show the side panel.
    CopyAnswers,
    /// Close the side panel.
    ClosePanel,
}

impl ClickAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickAction::CopyAnswers => "copy_answers",
            ClickAction::ClosePanel => "close_panel",
        }
    }
}

impl FromStr for ClickAction {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "copy_answers" => Ok(ClickAction::CopyAnswers),
            "close_panel" => Ok(ClickAction::ClosePanel),
            other => Err(DomError::Backend(format!("Unknown click action: {}", other))),
        }
    }
}

/// Event delivered to an observing routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// Child list of the observed subtree changed.
    Mutated,
    /// A bound element was clicked.
    Clicked(ClickAction),
    /// The page is going away.
    Unloaded,
}

/// Identifier of an active observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// An active observation of a document.
///
/// Events arrive on `events` until [`Document::disconnect`] is called
/// with `id` or the page unloads.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub events: mpsc::UnboundedReceiver<PageEvent>,
}

/// The page a routine runs against.
///
/// Methods mirror the small slice of the DOM the routines need. Reads of
/// missing attributes or unset style properties return `None`/empty
/// rather than errors.
#[async_trait]
pub trait Document: Send + Sync {
    /// The `<html>` element.
    async fn document_element(&self) -> Result<NodeId, DomError>;

    /// The `<head>` element, if any.
    async fn head(&self) -> Result<Option<NodeId>, DomError>;

    /// The `<body>` element, if any.
    async fn body(&self) -> Result<Option<NodeId>, DomError>;

    /// First element whose `id` attribute equals `id`.
    async fn element_by_id(&self, id: &str) -> Result<Option<NodeId>, DomError>;

    /// All elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError>;

    /// Descendants of `scope` matching `selector`, in document order.
    async fn query_within(&self, scope: NodeId, selector: &str)
        -> Result<Vec<NodeId>, DomError>;

    /// Nearest inclusive ancestor of `node` matching `selector`.
    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError>;

    /// Lowercase tag name.
    async fn tag_name(&self, node: NodeId) -> Result<String, DomError>;

    async fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError>;

    async fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError>;

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError>;

    /// Element children of `node`, in order.
    async fn children(&self, node: NodeId) -> Result<Vec<NodeId>, DomError>;

    /// Create a detached element.
    async fn create_element(&self, tag: &str) -> Result<NodeId, DomError>;

    async fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError>;

    /// Replace `old` (a child of `parent`) with `new`.
    async fn replace_child(&self, parent: NodeId, new: NodeId, old: NodeId)
        -> Result<(), DomError>;

    /// Detach `node` from its parent. No-op when already detached.
    async fn remove(&self, node: NodeId) -> Result<(), DomError>;

    /// Rendered text of `node` and its descendants.
    async fn text(&self, node: NodeId) -> Result<String, DomError>;

    /// Replace the content of `node` with a single text node.
    async fn set_text(&self, node: NodeId, text: &str) -> Result<(), DomError>;

    /// Inline style property value; empty when unset.
    async fn style_property(&self, node: NodeId, name: &str) -> Result<String, DomError>;

    async fn set_style_property(&self, node: NodeId, name: &str, value: &str)
        -> Result<(), DomError>;

    /// Deliver `action` to observers whenever `node` is clicked.
    async fn bind_click(&self, node: NodeId, action: ClickAction) -> Result<(), DomError>;

    /// Observe child-list changes in the subtree of `root`.
    async fn observe(&self, root: NodeId) -> Result<Subscription, DomError>;

    /// Stop an observation. No further events reach its receiver.
    async fn disconnect(&self, id: SubscriptionId) -> Result<(), DomError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(42).to_string(), "#42");
    }

    #[test]
    fn test_click_action_from_str() {
        assert_eq!("copy_answers".parse::<ClickAction>().unwrap(), ClickAction::CopyAnswers);
        assert_eq!("close_panel".parse::<ClickAction>().unwrap(), ClickAction::ClosePanel);
        assert!("open_panel".parse::<ClickAction>().is_err());
    }

    #[test]
    fn test_click_action_as_str_matches_serde() {
        for action in [ClickAction::CopyAnswers, ClickAction::ClosePanel] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }
}
