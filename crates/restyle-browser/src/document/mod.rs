//! [`Document`] over a live CDP page session.
//!
//! Elements are tracked by a small API object evaluated into the page;
//! every [`NodeId`] is that object's handle for one element. Operations
//! run through `Runtime.callFunctionOn` on it. Mutations and clicks are
//! reported through a `Runtime.addBinding` binding, and main-frame
//! navigation or inspector detach unloads the document.

mod wire;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use restyle_protocols::{
    ClickAction, Document, DomError, NodeId, PageEvent, Subscription, SubscriptionId,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cdp::{CdpClient, CdpError, CdpResponse, PageSession};
use wire::{BINDING, CALL_OP, OpReply, PAGE_API, SessionEvent, classify};

type Subscribers = Arc<Mutex<HashMap<SubscriptionId, mpsc::UnboundedSender<PageEvent>>>>;

/// A live page reached over CDP.
pub struct CdpDocument {
    /// Keeps the connection's receive loop alive.
    _client: Arc<CdpClient>,
    session: PageSession,
    /// Remote object id of the page API.
    api: String,
    subscribers: Subscribers,
    next_subscription: AtomicU64,
    closed: watch::Receiver<bool>,
    pump: JoinHandle<()>,
}

impl CdpDocument {
    /// Install the page API into `session` and start routing its events.
    pub async fn attach(client: Arc<CdpClient>, session: PageSession) -> Result<Self, CdpError> {
        let events = session.take_events().ok_or(CdpError::SessionClosed)?;
        session.add_binding(BINDING).await?;
        let api = session
            .evaluate_handle(PAGE_API)
            .await?
            .object_id
            .ok_or_else(|| CdpError::InvalidResponse("Page API has no object id".to_string()))?;

        let subscribers: Subscribers = Arc::default();
        let (closed_tx, closed) = watch::channel(false);
        let pump = tokio::spawn(pump_events(events, subscribers.clone(), closed_tx));

        debug!(target_id = session.target_id(), "Page document attached");
        Ok(Self {
            _client: client,
            session,
            api,
            subscribers,
            next_subscription: AtomicU64::new(1),
            closed,
            pump,
        })
    }

    /// Flips to `true` once the page unloads.
    pub fn closed(&self) -> watch::Receiver<bool> {
        self.closed.clone()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    async fn op(&self, op: &str, args: Vec<Value>) -> Result<Value, DomError> {
        if self.is_closed() {
            return Err(DomError::Closed);
        }
        let reply = self
            .session
            .call_function_on(&self.api, CALL_OP, vec![json!(op), Value::Array(args)])
            .await?;
        serde_json::from_value::<OpReply>(reply)
            .map_err(|e| DomError::Backend(e.to_string()))?
            .into_result()
    }

    async fn op_as<T: DeserializeOwned>(&self, op: &str, args: Vec<Value>) -> Result<T, DomError> {
        let value = self.op(op, args).await?;
        serde_json::from_value(value).map_err(|e| DomError::Backend(format!("{}: {}", op, e)))
    }
}

impl Drop for CdpDocument {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump_events(
    mut events: mpsc::UnboundedReceiver<CdpResponse>,
    subscribers: Subscribers,
    closed: watch::Sender<bool>,
) {
    while let Some(event) = events.recv().await {
        match classify(&event) {
            Some(SessionEvent::Mutated(id)) => {
                if let Some(tx) = subscribers.lock().get(&id) {
                    let _ = tx.send(PageEvent::Mutated);
                }
            }
            Some(SessionEvent::Clicked(action)) => {
                subscribers
                    .lock()
                    .retain(|_, tx| tx.send(PageEvent::Clicked(action)).is_ok());
            }
            Some(SessionEvent::Unloaded) => break,
            None => {}
        }
    }

    let _ = closed.send(true);
    for (_, tx) in subscribers.lock().drain() {
        let _ = tx.send(PageEvent::Unloaded);
    }
    debug!("Page document unloaded");
}

fn node_arg(node: NodeId) -> Value {
    json!(node.0)
}

#[async_trait]
impl Document for CdpDocument {
    async fn document_element(&self) -> Result<NodeId, DomError> {
        self.op_as::<Option<NodeId>>("documentElement", vec![])
            .await?
            .ok_or(DomError::Closed)
    }

    async fn head(&self) -> Result<Option<NodeId>, DomError> {
        self.op_as("head", vec![]).await
    }

    async fn body(&self) -> Result<Option<NodeId>, DomError> {
        self.op_as("body", vec![]).await
    }

    async fn element_by_id(&self, id: &str) -> Result<Option<NodeId>, DomError> {
        self.op_as("byId", vec![json!(id)]).await
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.op_as("queryAll", vec![json!(selector)]).await
    }

    async fn query_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.op_as("queryWithin", vec![node_arg(scope), json!(selector)])
            .await
    }

    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.op_as("closest", vec![node_arg(node), json!(selector)])
            .await
    }

    async fn tag_name(&self, node: NodeId) -> Result<String, DomError> {
        self.op_as("tagName", vec![node_arg(node)]).await
    }

    async fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        self.op_as("attribute", vec![node_arg(node), json!(name)])
            .await
    }

    async fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.op("setAttribute", vec![node_arg(node), json!(name), json!(value)])
            .await
            .map(|_| ())
    }

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        self.op_as("parent", vec![node_arg(node)]).await
    }

    async fn children(&self, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        self.op_as("children", vec![node_arg(node)]).await
    }

    async fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        self.op_as("create", vec![json!(tag)]).await
    }

    async fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.op("append", vec![node_arg(parent), node_arg(child)])
            .await
            .map(|_| ())
    }

    async fn replace_child(
        &self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        self.op("replace", vec![node_arg(parent), node_arg(new), node_arg(old)])
            .await
            .map(|_| ())
    }

    async fn remove(&self, node: NodeId) -> Result<(), DomError> {
        self.op("remove", vec![node_arg(node)]).await.map(|_| ())
    }

    async fn text(&self, node: NodeId) -> Result<String, DomError> {
        Ok(self
            .op_as::<Option<String>>("text", vec![node_arg(node)])
            .await?
            .unwrap_or_default())
    }

    async fn set_text(&self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.op("setText", vec![node_arg(node), json!(text)])
            .await
            .map(|_| ())
    }

    async fn style_property(&self, node: NodeId, name: &str) -> Result<String, DomError> {
        self.op_as("styleProperty", vec![node_arg(node), json!(name)])
            .await
    }

    async fn set_style_property(
        &self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.op(
            "setStyleProperty",
            vec![node_arg(node), json!(name), json!(value)],
        )
        .await
        .map(|_| ())
    }

    async fn bind_click(&self, node: NodeId, action: ClickAction) -> Result<(), DomError> {
        self.op("bindClick", vec![node_arg(node), json!(action.as_str())])
            .await
            .map(|_| ())
    }

    async fn observe(&self, root: NodeId) -> Result<Subscription, DomError> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        let (tx, events) = mpsc::unbounded_channel();
        self.subscribers.lock().insert(id, tx);
        if let Err(e) = self.op("observe", vec![node_arg(root), json!(id.0)]).await {
            self.subscribers.lock().remove(&id);
            return Err(e);
        }
        Ok(Subscription { id, events })
    }

    async fn disconnect(&self, id: SubscriptionId) -> Result<(), DomError> {
        self.subscribers.lock().remove(&id);
        if self.is_closed() {
            return Ok(());
        }
        self.op("disconnect", vec![json!(id.0)]).await.map(|_| ())
    }
}
