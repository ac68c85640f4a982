//! Messages exchanged with the in-page API.

use restyle_protocols::{ClickAction, DomError, NodeId, SubscriptionId};
use serde::Deserialize;
use serde_json::Value;

use crate::cdp::{BindingCalled, CdpResponse, FrameNavigated};

/// Name of the binding the page reports events through.
pub(crate) const BINDING: &str = "__restyleEvent";

/// The in-page API, evaluated once per document.
pub(crate) const PAGE_API: &str = include_str!("page_api.js");

/// Dispatches one operation on the page API object.
pub(crate) const CALL_OP: &str = "function(op, args) { return this.call(op, args); }";

/// Reply of a page API operation.
#[derive(Debug, Deserialize)]
pub(crate) struct OpReply {
    #[serde(default)]
    ok: Option<Value>,
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    detail: String,
    #[serde(default)]
    node: Option<u64>,
}

impl OpReply {
    pub(crate) fn into_result(self) -> Result<Value, DomError> {
        let Some(code) = self.err else {
            return Ok(self.ok.unwrap_or(Value::Null));
        };
        let node = NodeId(self.node.unwrap_or_default());
        Err(match code.as_str() {
            "not_found" => DomError::NodeNotFound(node),
            "detached" => DomError::Detached(node),
            "selector" => DomError::InvalidSelector(self.detail),
            _ => DomError::Backend(self.detail),
        })
    }
}

/// Payload sent through [`BINDING`].
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BindingPayload {
    Mutated { subscription: u64 },
    Clicked { action: ClickAction },
}

/// Session events a document cares about.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    Mutated(SubscriptionId),
    Clicked(ClickAction),
    Unloaded,
}

/// Map a raw CDP event to a [`SessionEvent`].
pub(crate) fn classify(event: &CdpResponse) -> Option<SessionEvent> {
    match event.method.as_deref()? {
        "Runtime.bindingCalled" => {
            let called: BindingCalled = event.event("Runtime.bindingCalled")?;
            if called.name != BINDING {
                return None;
            }
            match serde_json::from_str(&called.payload).ok()? {
                BindingPayload::Mutated { subscription } => {
                    Some(SessionEvent::Mutated(SubscriptionId(subscription)))
                }
                BindingPayload::Clicked { action } => Some(SessionEvent::Clicked(action)),
            }
        }
        "Page.frameNavigated" => {
            let nav: FrameNavigated = event.event("Page.frameNavigated")?;
            nav.frame.is_main().then_some(SessionEvent::Unloaded)
        }
        "Inspector.detached" | "Inspector.targetCrashed" => Some(SessionEvent::Unloaded),
        _ => None,
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
