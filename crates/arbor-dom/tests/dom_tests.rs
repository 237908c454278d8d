//! Tests for tree construction invariants and mutation methods:
//! append_child wrapping, insert_before, remove, attributes, class lists.

use arbor_dom::{DomError, DomTree, NodeId, NodeType};

/// Append a fresh element and return the ID it landed at.
fn append_element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_element(tag);
    tree.append_child(parent, id).unwrap()
}

/// Assert the parent/children relation is consistent for every attached node.
fn assert_links_consistent(tree: &DomTree, id: NodeId) {
    for &child in tree.children(id) {
        assert_eq!(tree.parent(child), Some(id));
        assert_links_consistent(tree, child);
    }
}

// ========== append_child ==========

#[test]
fn test_tag_names_are_uppercased() {
    let mut tree = DomTree::new();
    let id = tree.create_element("dIv");
    assert_eq!(tree.tag_name(id), Some("DIV"));
    assert_eq!(tree.node_name(id), Some("DIV"));
    assert_eq!(tree.node_name(NodeId::ROOT), Some("#document"));
}

#[test]
fn test_html_root_is_not_wrapped() {
    let mut tree = DomTree::new();
    let html = append_element(&mut tree, NodeId::ROOT, "html");
    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.children(NodeId::ROOT), &[html]);
}

#[test]
fn test_non_html_root_gets_html_and_body_wrappers() {
    let mut tree = DomTree::new();
    let div = append_element(&mut tree, NodeId::ROOT, "div");

    let html = tree.document_element().unwrap();
    assert_eq!(tree.tag_name(html), Some("HTML"));
    let body = tree.body().unwrap();
    assert_eq!(tree.parent(body), Some(html));
    assert_eq!(tree.parent(div), Some(body));
    assert_links_consistent(&tree, NodeId::ROOT);
}

#[test]
fn test_head_and_body_go_directly_under_html() {
    let mut tree = DomTree::new();
    let html = append_element(&mut tree, NodeId::ROOT, "html");
    let head = append_element(&mut tree, html, "head");
    let body = append_element(&mut tree, html, "body");
    assert_eq!(tree.children(html), &[head, body]);
    assert_eq!(tree.head(), Some(head));
}

#[test]
fn test_content_under_html_is_wrapped_in_body() {
    let mut tree = DomTree::new();
    let html = append_element(&mut tree, NodeId::ROOT, "html");
    let p = append_element(&mut tree, html, "p");

    let wrapper = tree.parent(p).unwrap();
    assert_eq!(tree.tag_name(wrapper), Some("BODY"));
    assert_eq!(tree.parent(wrapper), Some(html));
}

#[test]
fn test_text_is_never_wrapped() {
    let mut tree = DomTree::new();
    let html = append_element(&mut tree, NodeId::ROOT, "html");
    let text = tree.create_text("\n  ");
    let _ = tree.append_child(html, text).unwrap();
    assert_eq!(tree.children(html), &[text]);
}

#[test]
fn test_second_root_element_is_rejected() {
    let mut tree = DomTree::new();
    let _ = append_element(&mut tree, NodeId::ROOT, "html");
    let second = tree.create_element("html");
    assert_eq!(
        tree.append_child(NodeId::ROOT, second),
        Err(DomError::DocumentStructure)
    );
    assert_eq!(tree.parent(second), None);
}

#[test]
fn test_text_nodes_cannot_have_children() {
    let mut tree = DomTree::new();
    let text = tree.create_text("x");
    let span = tree.create_element("span");
    assert!(matches!(
        tree.append_child(text, span),
        Err(DomError::HierarchyRequest { .. })
    ));
}

#[test]
fn test_cannot_append_ancestor_into_descendant() {
    let mut tree = DomTree::new();
    let outer = append_element(&mut tree, NodeId::ROOT, "div");
    let inner = append_element(&mut tree, outer, "span");
    assert!(matches!(
        tree.append_child(inner, outer),
        Err(DomError::HierarchyRequest { .. })
    ));
}

#[test]
fn test_append_moves_attached_node() {
    let mut tree = DomTree::new();
    let body = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, body, "a");
    let b = append_element(&mut tree, body, "b");

    let _ = tree.append_child(b, a).unwrap();

    assert_eq!(tree.children(body), &[b]);
    assert_eq!(tree.children(b), &[a]);
    assert_links_consistent(&tree, NodeId::ROOT);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_positions_node() {
    let mut tree = DomTree::new();
    let ul = append_element(&mut tree, NodeId::ROOT, "ul");
    let first = append_element(&mut tree, ul, "li");
    let last = append_element(&mut tree, ul, "li");

    let middle = tree.create_element("li");
    assert_eq!(tree.insert_before(ul, middle, last), Ok(middle));
    assert_eq!(tree.children(ul), &[first, middle, last]);
    assert_eq!(tree.parent(middle), Some(ul));
}

#[test]
fn test_insert_before_missing_reference_fails() {
    let mut tree = DomTree::new();
    let ul = append_element(&mut tree, NodeId::ROOT, "ul");
    let stray = tree.create_element("li");
    let node = tree.create_element("li");

    assert_eq!(
        tree.insert_before(ul, node, stray),
        Err(DomError::ChildNotFound {
            parent: ul,
            child: stray
        })
    );
    assert!(tree.children(ul).is_empty());
}

// ========== remove ==========

#[test]
fn test_remove_detaches_and_clears_parent() {
    let mut tree = DomTree::new();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, div, "a");
    let b = append_element(&mut tree, div, "b");

    tree.remove(a);

    assert_eq!(tree.children(div), &[b]);
    // A removed node no longer points at its former parent.
    assert_eq!(tree.parent(a), None);
    assert_links_consistent(&tree, NodeId::ROOT);
}

#[test]
fn test_removed_node_can_be_reinserted() {
    let mut tree = DomTree::new();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, div, "a");
    let b = append_element(&mut tree, div, "b");

    tree.remove(a);
    tree.remove(a);
    let _ = tree.insert_before(div, a, b).unwrap();

    assert_eq!(tree.children(div), &[a, b]);
}

// ========== attributes and class list ==========

#[test]
fn test_attribute_access_by_name_and_index() {
    let mut tree = DomTree::new();
    let a = append_element(&mut tree, NodeId::ROOT, "a");
    let element = tree.as_element_mut(a).unwrap();
    let _ = element.attributes.set("href", "/x");
    let _ = element.attributes.set("id", "home");

    let element = tree.as_element(a).unwrap();
    assert_eq!(element.id(), Some("home"));
    assert_eq!(element.attributes.item(0).map(|attr| attr.name.as_str()), Some("href"));
    assert_eq!(element.attributes.get("href"), Some("/x"));
}

#[test]
fn test_class_list_round_trip() {
    let mut tree = DomTree::new();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let element = tree.as_element_mut(div).unwrap();
    let _ = element.attributes.set("class", "a b");

    element.class_list().add(&["c"]);
    assert_eq!(element.attributes.get("class"), Some("a b c"));

    element.class_list().remove(&["a"]);
    assert_eq!(element.attributes.get("class"), Some("b c"));

    element.class_list().add(&["b"]);
    assert_eq!(element.class_list().len(), 2);
    assert_eq!(element.classes(), ["b", "c"]);
}

#[test]
fn test_class_list_tracks_attribute_writes() {
    let mut tree = DomTree::new();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let element = tree.as_element_mut(div).unwrap();

    assert!(element.class_list().is_empty());
    let _ = element.attributes.set("class", "x y x");
    assert!(element.class_list().contains("y"));
    assert_eq!(element.classes(), ["x", "y"]);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let p = append_element(&mut tree, NodeId::ROOT, "p");
    let hello = tree.create_text("Hello ");
    let _ = tree.append_child(p, hello).unwrap();
    let b = append_element(&mut tree, p, "b");
    let world = tree.create_text("World");
    let _ = tree.append_child(b, world).unwrap();

    assert_eq!(tree.text_content(p), "Hello World");
    assert!(matches!(
        tree.get(world).map(|node| &node.node_type),
        Some(NodeType::Text(text)) if text == "World"
    ));
}
