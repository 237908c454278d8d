//! Re-rendering a tree as markup.
//!
//! Tag names are written lowercase, attributes as `name="value"` in stored
//! order (single-quoted when the value holds a `"`), text verbatim. Void
//! elements get no end tag and their children, if a caller forced any in,
//! are not visited.

use std::fmt::Write;

use crate::{DomTree, NodeId, NodeType};

impl DomTree {
    /// The markup of `id` including its own tags.
    ///
    /// For the Document this is the markup of all its children.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// The markup of the children of `id`.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => {
                for &child in &node.children {
                    self.write_node(child, out);
                }
            }
            NodeType::Text(text) => out.push_str(text),
            NodeType::Element(data) => {
                let tag = data.tag_name().to_ascii_lowercase();
                out.push('<');
                out.push_str(&tag);
                for attr in &data.attributes {
                    let quote = attribute_quote(&attr.value);
                    let _ = write!(out, " {}={quote}{}{quote}", attr.name, attr.value);
                }
                out.push('>');
                if data.is_void() {
                    return;
                }
                for &child in &node.children {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

/// Values are written raw, so a value holding `"` is wrapped in `'` instead.
/// A value holding both quotes cannot come out of the tokenizer and keeps
/// the double quotes.
fn attribute_quote(value: &str) -> char {
    if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    }
}

#[cfg(test)]
mod tests {
    use crate::DomTree;

    #[test]
    fn test_serializes_attributes_in_order() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let div = tree.append_child(tree.root(), div).unwrap();
        let element = tree.as_element_mut(div).unwrap();
        let _ = element.attributes.set("z", "1");
        let _ = element.attributes.set("a", "");
        let text = tree.create_text("hi");
        let _ = tree.append_child(div, text).unwrap();

        assert_eq!(tree.outer_html(div), r#"<div z="1" a="">hi</div>"#);
        assert_eq!(tree.inner_html(div), "hi");
    }

    #[test]
    fn test_value_with_double_quotes_uses_single_quotes() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let p = tree.append_child(tree.root(), p).unwrap();
        let element = tree.as_element_mut(p).unwrap();
        let _ = element.attributes.set("title", r#"say "hi""#);
        let _ = element.attributes.set("alt", "it's");

        assert_eq!(
            tree.outer_html(p),
            r#"<p title='say "hi"' alt="it's"></p>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let mut tree = DomTree::new();
        let img = tree.create_element("img");
        let img = tree.append_child(tree.root(), img).unwrap();
        let stray = tree.create_text("ignored");
        let _ = tree.append_child(img, stray).unwrap();

        assert_eq!(tree.outer_html(img), "<img>");
        let html = tree.document_element().unwrap();
        assert_eq!(tree.outer_html(html), "<html><body><img></body></html>");
    }
}
