//! Integration tests for the HTML parser.

use std::cell::RefCell;
use std::rc::Rc;

use arbor_dom::{DomTree, NodeId};
use arbor_html::{EventKind, HtmlParser, format_tree, parse};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Helper to parse HTML that is expected to parse cleanly
fn parse_ok(html: &str) -> DomTree {
    parse(html).expect("input should parse")
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if tree.tag_name(from) == Some(tag) {
        return Some(from);
    }
    tree.children(from)
        .iter()
        .find_map(|&child| find_element(tree, child, tag))
}

fn child_names(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.node_name(child).map(str::to_string))
        .collect()
}

fn root_elements(tree: &DomTree) -> Vec<NodeId> {
    tree.children(NodeId::ROOT)
        .iter()
        .copied()
        .filter(|&id| tree.as_element(id).is_some())
        .collect()
}

/// Record `kind:NAME` for every hook call, in order.
fn record_events(parser: &mut HtmlParser) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::ElementStarted,
        EventKind::ElementEnded,
        EventKind::TextCreated,
    ] {
        let sink = Rc::clone(&log);
        parser.on(kind, move |tree, id| {
            let name = match tree.as_text(id) {
                Some(text) => text.to_string(),
                None => tree.node_name(id).unwrap_or_default().to_string(),
            };
            sink.borrow_mut().push(format!("{kind}:{name}"));
        });
    }
    log
}

#[test]
fn test_document_structure_is_synthesized() {
    let tree = parse_ok("<p>Hello</p>");
    let html = tree.document_element().unwrap();
    assert_eq!(tree.tag_name(html), Some("HTML"));
    assert_eq!(child_names(&tree, html), vec!["BODY"]);
    let body = tree.body().unwrap();
    assert_eq!(child_names(&tree, body), vec!["P"]);
    assert_eq!(tree.text_content(body), "Hello");
}

#[test]
fn test_explicit_document_structure() {
    let tree = parse_ok("<html><head><title>T</title></head><body><p>x</p></body></html>");
    let html = tree.document_element().unwrap();
    assert_eq!(child_names(&tree, html), vec!["HEAD", "BODY"]);
    let head = tree.head().unwrap();
    assert_eq!(child_names(&tree, head), vec!["TITLE"]);
}

#[test]
fn test_children_are_kept_in_order() {
    let tree = parse_ok(r#"<div class="c"><h1>t</h1><p>p</p><img href="u"></div>"#);
    let div = find_element(&tree, NodeId::ROOT, "DIV").unwrap();
    assert_eq!(child_names(&tree, div), vec!["H1", "P", "IMG"]);
    let img = find_element(&tree, div, "IMG").unwrap();
    assert!(tree.children(img).is_empty());
}

#[test]
fn test_void_element_has_no_children() {
    let tree = parse_ok(r#"<img src="x">"#);
    let img = find_element(&tree, NodeId::ROOT, "IMG").unwrap();
    assert!(tree.children(img).is_empty());
    assert_eq!(tree.as_element(img).unwrap().attributes.get("src"), Some("x"));
}

#[test]
fn test_void_element_ignores_end_tag() {
    let mut parser = HtmlParser::new();
    let tree = parser.parse("<p><br>text</br></p>").unwrap();
    let p = find_element(&tree, NodeId::ROOT, "P").unwrap();
    assert_eq!(child_names(&tree, p), vec!["BR", "#text"]);
    assert!(parser.issues().is_empty());
}

#[test]
fn test_invalid_tag_fails_at_index() {
    let err = parse("<tag->").unwrap_err();
    assert_eq!(err.index, 4);
    assert_eq!(err.input_window, "<tag->");
}

#[test]
fn test_error_window_is_bounded() {
    let html = format!("{}<a -x>{}", "a".repeat(50), "b".repeat(50));
    let err = parse(&html).unwrap_err();
    assert_eq!(err.index, 53);
    assert_eq!(err.input_window.chars().count(), 40);
    assert!(err.input_window.contains("<a -"));
}

#[test]
fn test_script_content_is_one_text_node() {
    let mut parser = HtmlParser::new();
    let log = record_events(&mut parser);
    let tree = parser
        .parse("<script>var x=1;\n<html></html>\n</script>")
        .unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "elementStarted:SCRIPT".to_string(),
            "textCreated:var x=1;\n<html></html>\n".to_string(),
            "elementEnded:SCRIPT".to_string(),
        ]
    );
    let script = find_element(&tree, NodeId::ROOT, "SCRIPT").unwrap();
    assert_eq!(child_names(&tree, script), vec!["#text"]);
}

#[test]
fn test_end_tag_closes_open_descendants() {
    let mut parser = HtmlParser::new();
    let log = record_events(&mut parser);
    let tree = parser.parse("<div><p>x</div>y").unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "elementStarted:DIV",
            "elementStarted:P",
            "textCreated:x",
            "elementEnded:P",
            "elementEnded:DIV",
            "textCreated:y",
        ]
    );
    let body = tree.body().unwrap();
    assert_eq!(child_names(&tree, body), vec!["DIV", "#text"]);
    assert_eq!(parser.issues().len(), 1);
    assert_eq!(parser.issues()[0].message, "<p> closed implicitly");
}

#[test]
fn test_unmatched_end_tag_is_ignored() {
    let mut parser = HtmlParser::new();
    let tree = parser.parse("<div>a</span>b</div>").unwrap();
    let div = find_element(&tree, NodeId::ROOT, "DIV").unwrap();
    assert_eq!(tree.text_content(div), "ab");
    assert_eq!(parser.issues()[0].message, "unmatched end tag </span> ignored");
}

#[test]
fn test_same_name_nesting_closes_innermost() {
    let tree = parse_ok("<div><div>inner</div>outer</div>");
    let outer = find_element(&tree, NodeId::ROOT, "DIV").unwrap();
    assert_eq!(child_names(&tree, outer), vec!["DIV", "#text"]);
}

#[test]
fn test_unclosed_elements_end_at_end_of_input() {
    let mut parser = HtmlParser::new();
    let log = record_events(&mut parser);
    let _ = parser.parse("<ul><li>one").unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            "elementStarted:UL",
            "elementStarted:LI",
            "textCreated:one",
            "elementEnded:LI",
            "elementEnded:UL",
        ]
    );
}

#[test]
fn test_content_after_root_goes_into_body() {
    let mut parser = HtmlParser::new();
    let tree = parser.parse("<html><body></body></html><p>late</p>").unwrap();
    assert_eq!(root_elements(&tree).len(), 1);
    let body = tree.body().unwrap();
    assert_eq!(child_names(&tree, body), vec!["P"]);
    assert_eq!(
        parser.issues()[0].message,
        "<p> after the root element moved into the document element"
    );
}

#[test]
fn test_text_only_input_gets_a_root() {
    let tree = parse_ok("just text");
    assert_eq!(root_elements(&tree).len(), 1);
    assert_eq!(tree.text_content(NodeId::ROOT), "just text");
}

#[test]
fn test_hooks_see_attributes_on_start() {
    let mut parser = HtmlParser::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    parser.on(EventKind::ElementStarted, move |tree, id| {
        let element = tree.as_element(id).unwrap();
        if let Some(href) = element.attributes.get("href") {
            sink.borrow_mut().push(href.to_string());
        }
    });

    let _ = parser
        .parse(r#"<a href="/a">a</a><p><a href='/b'>b</a></p>"#)
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["/a".to_string(), "/b".to_string()]);
}

#[test]
fn test_hook_can_remove_element_while_parsing() {
    let mut parser = HtmlParser::new();
    parser.on(EventKind::ElementStarted, |tree, id| {
        if tree.tag_name(id) == Some("SPAN") {
            tree.remove(id);
        }
    });

    let tree = parser.parse("<p>a<span>b<i>c</i></span>d</p>").unwrap();
    let p = find_element(&tree, NodeId::ROOT, "P").unwrap();
    assert_eq!(tree.outer_html(p), "<p>ad</p>");
}

#[test]
fn test_hook_can_rewrite_attributes() {
    let mut parser = HtmlParser::new();
    parser.on(EventKind::ElementEnded, |tree, id| {
        if let Some(element) = tree.as_element_mut(id) {
            let _ = element.attributes.remove_named_item("style");
            element.class_list().add(&["seen"]);
        }
    });

    let tree = parser.parse(r#"<div style="x"><br></div>"#).unwrap();
    let div = find_element(&tree, NodeId::ROOT, "DIV").unwrap();
    assert_eq!(tree.outer_html(div), r#"<div class="seen"><br class="seen"></div>"#);
}

#[test]
fn test_parser_is_reusable() {
    let mut parser = HtmlParser::new();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    parser.on(EventKind::ElementStarted, move |_, _| *sink.borrow_mut() += 1);

    let first = parser.parse("<b>one</b>").unwrap();
    assert!(parser.parse("<tag->").is_err());
    let second = parser.parse("<i>two</i>").unwrap();

    assert_eq!(*count.borrow(), 2);
    assert!(find_element(&first, NodeId::ROOT, "I").is_none());
    assert_eq!(second.text_content(NodeId::ROOT), "two");
}

#[test]
fn test_structural_round_trip() {
    for html in [
        r#"<div class="c"><h1>t</h1><p>p</p></div>"#,
        "<ul id='list'><li>one</li><li data-x=2>two</li></ul>",
        "<html><head><title>T</title></head><body><p>a <b>b</b> c</p></body></html>",
        "<section><script>if (a < b) { x = '</p>'; }</script></section>",
        r#"<p title='say "hi"' alt="it's">x</p>"#,
    ] {
        let first = parse_ok(html);
        let markup = first.outer_html(first.document_element().unwrap());
        let second = parse_ok(&markup);
        assert_eq!(
            format_tree(&first, NodeId::ROOT),
            format_tree(&second, NodeId::ROOT),
            "round trip changed the structure of {html}"
        );
    }
}

#[quickcheck]
fn prop_exactly_one_html_root(input: String) -> bool {
    parse(&input).map_or(true, |tree| {
        let roots = root_elements(&tree);
        roots.len() == 1 && tree.tag_name(roots[0]) == Some("HTML")
    })
}

#[quickcheck]
fn prop_text_without_tags_is_preserved(input: String) -> TestResult {
    if input.contains('<') {
        return TestResult::discard();
    }
    let tree = parse_ok(&input);
    TestResult::from_bool(tree.text_content(NodeId::ROOT) == input)
}
