//! Arena-backed DOM tree.
//!
//! Nodes live in a `Vec` and refer to each other by index. Removed nodes
//! stay in the arena detached, so indices handed out as `NodeId`s never
//! dangle.

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Tag name and attributes of an element.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase for HTML elements; foreign elements keep their case.
    pub tag: String,
    /// Attributes in source order.
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    /// Attribute lookup, ASCII case-insensitive on the name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// An arena of nodes rooted at the document node (index 0).
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn push(&mut self, kind: NodeKind) -> usize {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn create_element(&mut self, data: ElementData) -> usize {
        self.push(NodeKind::Element(data))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> usize {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> usize {
        self.push(NodeKind::Comment(text.into()))
    }

    pub fn element(&self, id: usize) -> Option<&ElementData> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: usize) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn parent(&self, id: usize) -> Option<usize> {
        self.nodes.get(id)?.parent
    }

    pub fn children(&self, id: usize) -> &[usize] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_children(&self, id: usize) -> Vec<usize> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
            .collect()
    }

    /// Detach `id` from its parent. Returns the former parent.
    pub fn detach(&mut self, id: usize) -> Option<usize> {
        let parent = self.nodes.get(id)?.parent?;
        self.nodes[parent].children.retain(|c| *c != id);
        self.nodes[id].parent = None;
        Some(parent)
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append(&mut self, parent: usize, child: usize) {
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Put `new` where `old` is under `parent`. Returns false when `old`
    /// is not a child of `parent`.
    pub fn replace(&mut self, parent: usize, new: usize, old: usize) -> bool {
        if self.nodes[old].parent != Some(parent) {
            return false;
        }
        self.detach(new);
        let Some(pos) = self.nodes[parent].children.iter().position(|c| *c == old) else {
            return false;
        };
        self.nodes[parent].children[pos] = new;
        self.nodes[new].parent = Some(parent);
        self.nodes[old].parent = None;
        true
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: usize) -> bool {
        self.is_inclusive_ancestor(Self::ROOT, node)
    }

    /// Element descendants of `scope` in document (pre-)order, excluding `scope`.
    pub fn descendants(&self, scope: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.element(id).is_some() {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<usize> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|id| self.element(*id).is_some_and(|e| e.tag.eq_ignore_ascii_case(tag)))
    }

    pub fn element_by_id(&self, value: &str) -> Option<usize> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|id| self.element(*id).and_then(|e| e.attr("id")) == Some(value))
    }

    /// Rendered text of `id`: descendant text with `<br>` as a newline;
    /// `<style>`, `<script>` and comments contribute nothing.
    pub fn text(&self, id: usize) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: usize, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Comment(_) => {}
            NodeKind::Element(e) => {
                let tag = e.tag.to_ascii_lowercase();
                if tag == "style" || tag == "script" {
                    return;
                }
                if tag == "br" {
                    out.push('\n');
                    return;
                }
                for child in &self.nodes[id].children {
                    self.collect_text(*child, out);
                }
            }
            NodeKind::Document => {
                for child in &self.nodes[id].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replace the children of `id` with one text node (none for "").
    pub fn set_text(&mut self, id: usize, text: &str) {
        for child in std::mem::take(&mut self.nodes[id].children) {
            self.nodes[child].parent = None;
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append(id, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div(tree: &mut DomTree, class: &str) -> usize {
        let mut data = ElementData::new("div");
        data.set_attr("class", class);
        tree.create_element(data)
    }

    #[test]
    fn test_append_and_detach() {
        let mut tree = DomTree::new();
        let a = div(&mut tree, "a");
        let b = div(&mut tree, "b");
        tree.append(DomTree::ROOT, a);
        tree.append(a, b);
        assert_eq!(tree.parent(b), Some(a));
        assert!(tree.is_connected(b));

        assert_eq!(tree.detach(b), Some(a));
        assert!(!tree.is_connected(b));
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.detach(b), None);
    }

    #[test]
    fn test_append_moves_node() {
        let mut tree = DomTree::new();
        let a = div(&mut tree, "a");
        let b = div(&mut tree, "b");
        let c = div(&mut tree, "c");
        tree.append(DomTree::ROOT, a);
        tree.append(DomTree::ROOT, b);
        tree.append(a, c);
        tree.append(b, c);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut tree = DomTree::new();
        let a = div(&mut tree, "a");
        let b = div(&mut tree, "b");
        let c = div(&mut tree, "c");
        let n = div(&mut tree, "n");
        tree.append(DomTree::ROOT, a);
        tree.append(DomTree::ROOT, b);
        tree.append(DomTree::ROOT, c);

        assert!(tree.replace(DomTree::ROOT, n, b));
        assert_eq!(tree.children(DomTree::ROOT), &[a, n, c]);
        assert_eq!(tree.parent(b), None);
        assert!(!tree.replace(DomTree::ROOT, b, b));
    }

    #[test]
    fn test_descendants_document_order() {
        let mut tree = DomTree::new();
        let a = div(&mut tree, "a");
        let a1 = div(&mut tree, "a1");
        let b = div(&mut tree, "b");
        tree.append(DomTree::ROOT, a);
        tree.append(a, a1);
        tree.append(DomTree::ROOT, b);
        assert_eq!(tree.descendants(DomTree::ROOT), vec![a, a1, b]);
    }

    #[test]
    fn test_text_and_set_text() {
        let mut tree = DomTree::new();
        let p = div(&mut tree, "p");
        let t1 = tree.create_text("hello");
        let br = tree.create_element(ElementData::new("br"));
        let t2 = tree.create_text("world");
        let style = tree.create_element(ElementData::new("style"));
        let css = tree.create_text(".x{}");
        tree.append(p, t1);
        tree.append(p, br);
        tree.append(p, t2);
        tree.append(p, style);
        tree.append(style, css);
        assert_eq!(tree.text(p), "hello\nworld");

        tree.set_text(p, "replaced");
        assert_eq!(tree.text(p), "replaced");
        assert_eq!(tree.children(p).len(), 1);

        tree.set_text(p, "");
        assert!(tree.children(p).is_empty());
    }

    #[test]
    fn test_attr_case_insensitive() {
        let mut data = ElementData::new("svg");
        data.set_attr("viewBox", "0 0 64 30");
        assert_eq!(data.attr("viewbox"), Some("0 0 64 30"));
        data.set_attr("VIEWBOX", "0 0 1 1");
        assert_eq!(data.attrs.len(), 1);
        assert_eq!(data.attr("viewBox"), Some("0 0 1 1"));
    }
}
