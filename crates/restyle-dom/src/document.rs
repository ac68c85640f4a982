//! In-memory [`Document`] implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use restyle_protocols::{
    ClickAction, Document, DomError, NodeId, PageEvent, Subscription, SubscriptionId,
};
use tokio::sync::mpsc;
use tracing::trace;

use crate::parse::parse_html;
use crate::selector::SelectorList;
use crate::serialize;
use crate::style;
use crate::tree::{DomTree, ElementData, NodeKind};

struct Observer {
    id: SubscriptionId,
    root: usize,
    tx: mpsc::UnboundedSender<PageEvent>,
}

struct Inner {
    tree: DomTree,
    observers: Vec<Observer>,
    bindings: HashMap<usize, ClickAction>,
    next_subscription: u64,
}

impl Inner {
    fn element(&self, node: NodeId) -> Result<&ElementData, DomError> {
        self.tree.element(index(node)).ok_or(DomError::NodeNotFound(node))
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData, DomError> {
        self.tree
            .element_mut(index(node))
            .ok_or(DomError::NodeNotFound(node))
    }

    fn select(&self, scope: usize, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let list = SelectorList::parse(selector)
            .map_err(|e| DomError::InvalidSelector(e.to_string()))?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .filter(|id| list.matches(&self.tree, *id))
            .map(node_id)
            .collect())
    }

    /// Report a child-list change under `parent` to observers whose root
    /// contains it.
    fn child_list_changed(&mut self, parent: usize) {
        let tree = &self.tree;
        self.observers.retain(|obs| {
            if !tree.is_inclusive_ancestor(obs.root, parent) {
                return true;
            }
            obs.tx.send(PageEvent::Mutated).is_ok()
        });
    }

    fn broadcast(&mut self, event: PageEvent) {
        self.observers.retain(|obs| obs.tx.send(event.clone()).is_ok());
    }
}

fn index(node: NodeId) -> usize {
    node.0 as usize
}

fn node_id(index: usize) -> NodeId {
    NodeId(index as u64)
}

/// A page document held in memory.
///
/// Behaves like a live page for routines: child-list changes reach
/// observers, bound elements can be clicked and the page can be unloaded.
pub struct MemoryDocument {
    inner: Mutex<Inner>,
}

impl MemoryDocument {
    pub fn new(tree: DomTree) -> Self {
        Self {
            inner: Mutex::new(Inner {
                tree,
                observers: Vec::new(),
                bindings: HashMap::new(),
                next_subscription: 1,
            }),
        }
    }

    pub fn from_html(html: &str) -> Self {
        Self::new(parse_html(html))
    }

    /// Serialize the current document.
    pub fn to_html(&self) -> String {
        serialize::to_html(&self.inner.lock().tree)
    }

    /// Serialize `node` and its subtree.
    pub fn outer_html(&self, node: NodeId) -> String {
        serialize::outer_html(&self.inner.lock().tree, index(node))
    }

    /// Simulate a user click. Returns the bound action, if any.
    pub fn click(&self, node: NodeId) -> Option<ClickAction> {
        let mut inner = self.inner.lock();
        let action = inner.bindings.get(&index(node)).copied()?;
        trace!(%node, ?action, "click");
        inner.broadcast(PageEvent::Clicked(action));
        Some(action)
    }

    /// Simulate the page unloading.
    pub fn unload(&self) {
        self.inner.lock().broadcast(PageEvent::Unloaded);
    }

    /// Number of live observations.
    pub fn observer_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.observers.retain(|obs| !obs.tx.is_closed());
        inner.observers.len()
    }

    /// Synchronous selector query, for inspection.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.inner.lock().select(DomTree::ROOT, selector)
    }

    /// Synchronous text read, for inspection.
    pub fn text_of(&self, node: NodeId) -> String {
        self.inner.lock().tree.text(index(node))
    }

    /// Append `html`'s body content to the element `parent`, as a page
    /// script inserting markup would.
    pub fn insert_html(&self, parent: NodeId, html: &str) -> Result<(), DomError> {
        let fragment = parse_html(html);
        let mut inner = self.inner.lock();
        inner.element(parent)?;
        let Some(body) = fragment.find_by_tag("body") else {
            return Ok(());
        };
        for child in fragment.children(body) {
            let copied = copy_subtree(&fragment, *child, &mut inner.tree);
            inner.tree.append(index(parent), copied);
        }
        inner.child_list_changed(index(parent));
        Ok(())
    }
}

fn copy_subtree(from: &DomTree, node: usize, to: &mut DomTree) -> usize {
    let Some(n) = from.get(node) else {
        return to.create_text("");
    };
    let id = match &n.kind {
        NodeKind::Element(el) => to.create_element(el.clone()),
        NodeKind::Text(t) => to.create_text(t.clone()),
        NodeKind::Comment(t) => to.create_comment(t.clone()),
        NodeKind::Document => to.create_text(""),
    };
    for child in &n.children {
        let c = copy_subtree(from, *child, to);
        to.append(id, c);
    }
    id
}

#[async_trait]
impl Document for MemoryDocument {
    async fn document_element(&self) -> Result<NodeId, DomError> {
        let inner = self.inner.lock();
        inner
            .tree
            .element_children(DomTree::ROOT)
            .first()
            .copied()
            .map(node_id)
            .ok_or(DomError::Closed)
    }

    async fn head(&self) -> Result<Option<NodeId>, DomError> {
        Ok(self.inner.lock().tree.find_by_tag("head").map(node_id))
    }

    async fn body(&self) -> Result<Option<NodeId>, DomError> {
        Ok(self.inner.lock().tree.find_by_tag("body").map(node_id))
    }

    async fn element_by_id(&self, id: &str) -> Result<Option<NodeId>, DomError> {
        Ok(self.inner.lock().tree.element_by_id(id).map(node_id))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.inner.lock().select(DomTree::ROOT, selector)
    }

    async fn query_within(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let inner = self.inner.lock();
        inner.element(scope)?;
        inner.select(index(scope), selector)
    }

    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let inner = self.inner.lock();
        inner.element(node)?;
        let list = SelectorList::parse(selector)
            .map_err(|e| DomError::InvalidSelector(e.to_string()))?;
        let mut cur = Some(index(node));
        while let Some(id) = cur {
            if list.matches(&inner.tree, id) {
                return Ok(Some(node_id(id)));
            }
            cur = inner.tree.parent(id);
        }
        Ok(None)
    }

    async fn tag_name(&self, node: NodeId) -> Result<String, DomError> {
        Ok(self.inner.lock().element(node)?.tag.to_ascii_lowercase())
    }

    async fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self
            .inner
            .lock()
            .element(node)?
            .attr(name)
            .map(str::to_string))
    }

    async fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.inner.lock().element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        let inner = self.inner.lock();
        inner.element(node)?;
        Ok(inner.tree.parent(index(node)).map(node_id))
    }

    async fn children(&self, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        let inner = self.inner.lock();
        inner.element(node)?;
        Ok(inner
            .tree
            .element_children(index(node))
            .into_iter()
            .map(node_id)
            .collect())
    }

    async fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        let mut inner = self.inner.lock();
        let id = inner
            .tree
            .create_element(ElementData::new(tag.to_ascii_lowercase()));
        Ok(node_id(id))
    }

    async fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.element(parent)?;
        inner.element(child)?;
        let old_parent = inner.tree.parent(index(child));
        inner.tree.append(index(parent), index(child));
        if let Some(old) = old_parent {
            inner.child_list_changed(old);
        }
        inner.child_list_changed(index(parent));
        Ok(())
    }

    async fn replace_child(
        &self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.element(parent)?;
        inner.element(new)?;
        inner.element(old)?;
        if !inner.tree.replace(index(parent), index(new), index(old)) {
            return Err(DomError::Detached(old));
        }
        inner.child_list_changed(index(parent));
        Ok(())
    }

    async fn remove(&self, node: NodeId) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.element(node)?;
        if let Some(parent) = inner.tree.detach(index(node)) {
            inner.bindings.retain(|bound, _| *bound != index(node));
            inner.child_list_changed(parent);
        }
        Ok(())
    }

    async fn text(&self, node: NodeId) -> Result<String, DomError> {
        let inner = self.inner.lock();
        inner.element(node)?;
        Ok(inner.tree.text(index(node)))
    }

    async fn set_text(&self, node: NodeId, text: &str) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.element(node)?;
        inner.tree.set_text(index(node), text);
        inner.child_list_changed(index(node));
        Ok(())
    }

    async fn style_property(&self, node: NodeId, name: &str) -> Result<String, DomError> {
        let inner = self.inner.lock();
        let el = inner.element(node)?;
        Ok(style::get_property(el.attr("style").unwrap_or(""), name))
    }

    async fn set_style_property(
        &self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        let el = inner.element_mut(node)?;
        let updated = style::set_property(el.attr("style").unwrap_or(""), name, value);
        el.set_attr("style", &updated);
        Ok(())
    }

    async fn bind_click(&self, node: NodeId, action: ClickAction) -> Result<(), DomError> {
        let mut inner = self.inner.lock();
        inner.element(node)?;
        inner.bindings.insert(index(node), action);
        Ok(())
    }

    async fn observe(&self, root: NodeId) -> Result<Subscription, DomError> {
        let mut inner = self.inner.lock();
        inner.element(root)?;
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        let (tx, rx) = mpsc::unbounded_channel();
        inner.observers.push(Observer {
            id,
            root: index(root),
            tx,
        });
        Ok(Subscription { id, events: rx })
    }

    async fn disconnect(&self, id: SubscriptionId) -> Result<(), DomError> {
        self.inner.lock().observers.retain(|obs| obs.id != id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
