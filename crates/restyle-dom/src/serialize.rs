//! HTML serialization of a [`DomTree`].

use crate::tree::{DomTree, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Serialize the whole document, prefixed with an HTML5 doctype.
pub fn to_html(tree: &DomTree) -> String {
    let mut out = String::from("<!DOCTYPE html>");
    for child in tree.children(DomTree::ROOT) {
        write_node(tree, *child, false, &mut out);
    }
    out
}

/// Serialize `node` and its subtree.
pub fn outer_html(tree: &DomTree, node: usize) -> String {
    let mut out = String::new();
    write_node(tree, node, false, &mut out);
    out
}

fn write_node(tree: &DomTree, node: usize, raw_text: bool, out: &mut String) {
    let Some(n) = tree.get(node) else {
        return;
    };
    match &n.kind {
        NodeKind::Document => {
            for child in &n.children {
                write_node(tree, *child, false, out);
            }
        }
        NodeKind::Text(text) if raw_text => out.push_str(text),
        NodeKind::Text(text) => escape(text, false, out),
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape(value, true, out);
                out.push('"');
            }
            out.push('>');
            let tag = el.tag.to_ascii_lowercase();
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
            for child in &n.children {
                write_node(tree, *child, raw, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}

fn escape(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
