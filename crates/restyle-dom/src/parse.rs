//! HTML parsing into a [`DomTree`] via html5ever.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::tree::{DomTree, ElementData};

/// Parse a full HTML document. html5ever recovers from any input, so
/// this never fails; missing `<html>`, `<head>` and `<body>` are implied.
pub fn parse_html(html: &str) -> DomTree {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let mut tree = DomTree::new();
    for child in dom.document.children.borrow().iter() {
        convert(child, &mut tree, DomTree::ROOT);
    }
    tree
}

fn convert(handle: &Handle, tree: &mut DomTree, parent: usize) {
    let id = match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut data = ElementData::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                data.attrs
                    .push((attr.name.local.to_string(), attr.value.to_string()));
            }
            tree.create_element(data)
        }
        NodeData::Text { contents } => tree.create_text(contents.borrow().to_string()),
        NodeData::Comment { contents } => tree.create_comment(contents.to_string()),
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            return;
        }
    };
    tree.append(parent, id);
    for child in handle.children.borrow().iter() {
        convert(child, tree, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_structure() {
        let tree = parse_html("<p>hi</p>");
        let html = tree.find_by_tag("html").unwrap();
        let head = tree.find_by_tag("head").unwrap();
        let body = tree.find_by_tag("body").unwrap();
        assert_eq!(tree.parent(head), Some(html));
        assert_eq!(tree.parent(body), Some(html));
        let p = tree.find_by_tag("p").unwrap();
        assert_eq!(tree.text(p), "hi");
    }

    #[test]
    fn test_svg_keeps_view_box() {
        let tree = parse_html(r#"<body><svg viewBox="0 0 64 30"></svg></body>"#);
        let svg = tree.find_by_tag("svg").unwrap();
        assert_eq!(tree.element(svg).unwrap().attr("viewBox"), Some("0 0 64 30"));
    }

    #[test]
    fn test_attributes_in_order() {
        let tree = parse_html(r#"<div id="a" class="x y" data-k="v"></div>"#);
        let div = tree.element_by_id("a").unwrap();
        let names: Vec<_> = tree
            .element(div)
            .unwrap()
            .attrs
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(names, vec!["id", "class", "data-k"]);
    }
}
