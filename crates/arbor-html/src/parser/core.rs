use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::rc::Rc;

use arbor_common::warning::warn_once;
use arbor_dom::{Attr, DomError, DomTree, NodeId, NodeType, is_void_element};

use crate::error::ParseError;
use crate::tokenizer::{EventKind, HtmlTokenizer, Token};

/// Something in the input the tree builder had to work around.
///
/// Issues never stop parsing. They are also reported once per message
/// through [`warn_once`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What happened.
    pub message: String,
    /// Character index at which the offending token was completed.
    pub index: usize,
}

/// Callback run after the tree builder has handled a token, with the node
/// the token produced or closed.
pub type NodeHook = Box<dyn FnMut(&mut DomTree, NodeId)>;

#[derive(Default)]
struct Hooks(HashMap<EventKind, Vec<NodeHook>>);

impl Hooks {
    fn run(&mut self, kind: EventKind, tree: &mut DomTree, id: NodeId) {
        if let Some(hooks) = self.0.get_mut(&kind) {
            for hook in hooks {
                hook(tree, id);
            }
        }
    }
}

/// An entry on the stack of open elements.
///
/// `announced` is false for the `HTML` and `BODY` wrappers the tree
/// synthesizes on its own: no start tag produced them, so no hook sees them
/// start or end.
struct OpenElement {
    id: NodeId,
    announced: bool,
}

/// Builds a [`DomTree`] from tokens, one at a time.
///
/// The stack of open elements mirrors the chain of ancestors of the current
/// insertion point. It is kept explicitly rather than recovered from parent
/// links, so hooks may detach nodes while the parser is still inside them.
struct TreeBuilder {
    tree: DomTree,
    open: Vec<OpenElement>,
    issues: Vec<ParseIssue>,
    index: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            tree: DomTree::new(),
            open: Vec::new(),
            issues: Vec::new(),
            index: 0,
        }
    }

    fn insertion_point(&self) -> NodeId {
        self.open.last().map_or(NodeId::ROOT, |open| open.id)
    }

    fn parse_warning(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            index: self.index,
        });
    }

    fn process(&mut self, token: Token, hooks: &mut Hooks) {
        match token {
            Token::TextCreated { text } => self.insert_text(text, hooks),
            Token::ElementStarted {
                tag_name,
                attributes,
            } => self.start_element(&tag_name, attributes, hooks),
            Token::ElementEnded { tag_name } => self.end_element(&tag_name, hooks),
        }
    }

    fn insert_text(&mut self, text: String, hooks: &mut Hooks) {
        let id = self.tree.create_text(text);
        if let Err(err) = self.tree.append_child(self.insertion_point(), id) {
            self.parse_warning(&format!("text dropped: {err}"));
            return;
        }
        hooks.run(EventKind::TextCreated, &mut self.tree, id);
    }

    fn start_element(&mut self, tag_name: &str, attributes: Vec<Attr>, hooks: &mut Hooks) {
        let id = self.tree.create_element(tag_name);
        if let Some(element) = self.tree.as_element_mut(id) {
            for attr in attributes {
                let _ = element.attributes.set_named_item(attr);
            }
        }

        if !self.insert_element(id) {
            return;
        }
        self.open_wrappers(id);
        hooks.run(EventKind::ElementStarted, &mut self.tree, id);

        if is_void_element(tag_name) {
            hooks.run(EventKind::ElementEnded, &mut self.tree, id);
        } else {
            self.open.push(OpenElement { id, announced: true });
        }
    }

    /// Append a new element at the insertion point. A second root element
    /// goes into the existing `BODY` (or `HTML`) instead.
    fn insert_element(&mut self, id: NodeId) -> bool {
        match self.tree.append_child(self.insertion_point(), id) {
            Ok(_) => true,
            Err(DomError::DocumentStructure) => {
                let Some(fallback) = self.tree.body().or_else(|| self.tree.document_element())
                else {
                    return false;
                };
                let name = self.tree.tag_name(id).unwrap_or_default().to_ascii_lowercase();
                self.parse_warning(&format!(
                    "<{name}> after the root element moved into the document element"
                ));
                match self.tree.append_child(fallback, id) {
                    Ok(_) => true,
                    Err(err) => {
                        self.parse_warning(&format!("<{name}> dropped: {err}"));
                        false
                    }
                }
            }
            Err(err) => {
                self.parse_warning(&format!("element dropped: {err}"));
                false
            }
        }
    }

    /// Push any elements the tree synthesized between the insertion point and
    /// `id`, outermost first.
    fn open_wrappers(&mut self, id: NodeId) {
        let top = self.insertion_point();
        let mut wrappers = Vec::new();
        let mut cursor = self.tree.parent(id);
        while let Some(ancestor) = cursor {
            if ancestor == top {
                break;
            }
            wrappers.push(ancestor);
            cursor = self.tree.parent(ancestor);
        }
        self.open
            .extend(wrappers.into_iter().rev().map(|id| OpenElement {
                id,
                announced: false,
            }));
    }

    /// Close the innermost open element named `tag_name` and everything
    /// opened after it, deepest first. Unmatched end tags are ignored.
    fn end_element(&mut self, tag_name: &str, hooks: &mut Hooks) {
        // Void elements were closed when they started.
        if is_void_element(tag_name) {
            return;
        }

        let Some(position) = self
            .open
            .iter()
            .rposition(|open| self.tree.tag_name(open.id) == Some(tag_name))
        else {
            self.parse_warning(&format!(
                "unmatched end tag </{}> ignored",
                tag_name.to_ascii_lowercase()
            ));
            return;
        };

        let closed = self.open.split_off(position);
        for (depth, open) in closed.into_iter().enumerate().rev() {
            if !open.announced {
                continue;
            }
            if depth > 0 {
                let name = self
                    .tree
                    .tag_name(open.id)
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                self.parse_warning(&format!("<{name}> closed implicitly"));
            }
            hooks.run(EventKind::ElementEnded, &mut self.tree, open.id);
        }
    }

    /// Close what is still open and make sure the document has its root.
    fn finish(mut self, hooks: &mut Hooks) -> (DomTree, Vec<ParseIssue>) {
        while let Some(open) = self.open.pop() {
            if open.announced {
                hooks.run(EventKind::ElementEnded, &mut self.tree, open.id);
            }
        }
        if self.tree.document_element().is_none() {
            let html = self.tree.create_element("HTML");
            if let Err(err) = self.tree.append_child(NodeId::ROOT, html) {
                self.parse_warning(&format!("could not create the root element: {err}"));
            }
        }
        (self.tree, self.issues)
    }
}

/// Parses markup into a [`DomTree`].
///
/// Tokens from the [`HtmlTokenizer`] are turned into nodes as they arrive:
///
/// - text is appended at the insertion point;
/// - a start tag appends a new element with its attributes, then becomes the
///   insertion point unless it is void;
/// - an end tag closes the innermost open element of that name, together with
///   any elements still open inside it.
///
/// Hooks registered with [`HtmlParser::on`] run right after each of those
/// steps, so they can inspect or rewrite the tree while it is being built.
///
/// # Example
///
/// ```
/// use arbor_html::HtmlParser;
///
/// let mut parser = HtmlParser::new();
/// let tree = parser.parse("<p>Hello</p>").unwrap();
/// let body = tree.body().unwrap();
/// assert_eq!(tree.text_content(body), "Hello");
/// ```
pub struct HtmlParser {
    tokenizer: HtmlTokenizer,
    tokens: Rc<RefCell<VecDeque<Token>>>,
    hooks: Hooks,
    issues: Vec<ParseIssue>,
}

impl HtmlParser {
    /// A parser with no hooks.
    #[must_use]
    pub fn new() -> Self {
        let tokens = Rc::new(RefCell::new(VecDeque::new()));
        let mut tokenizer = HtmlTokenizer::new();
        for kind in [
            EventKind::TextCreated,
            EventKind::ElementStarted,
            EventKind::ElementEnded,
        ] {
            let queue = Rc::clone(&tokens);
            tokenizer.on(kind, move |token| queue.borrow_mut().push_back(token.clone()));
        }
        Self {
            tokenizer,
            tokens,
            hooks: Hooks::default(),
            issues: Vec::new(),
        }
    }

    /// Run `hook` after every node event of `kind`.
    ///
    /// - `TextCreated`: the new text node, already attached.
    /// - `ElementStarted`: the new element, attached and carrying its
    ///   attributes, before any of its content.
    /// - `ElementEnded`: the element, after all of its content. Fires for
    ///   void elements right after `ElementStarted`.
    ///
    /// Hooks run in registration order and persist across calls to
    /// [`HtmlParser::parse`].
    pub fn on(&mut self, kind: EventKind, hook: impl FnMut(&mut DomTree, NodeId) + 'static) {
        self.hooks.0.entry(kind).or_default().push(Box::new(hook));
    }

    /// Parse `html` into a fresh tree.
    ///
    /// The result always has exactly one root element, `HTML`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] at the first character the tokenizer rejects.
    /// Nothing after it is parsed.
    pub fn parse(&mut self, html: &str) -> Result<DomTree, ParseError> {
        self.tokenizer.reset();
        self.tokens.borrow_mut().clear();
        self.issues.clear();

        let chars: Vec<char> = html.chars().collect();
        let mut builder = TreeBuilder::new();
        for (index, &c) in chars.iter().enumerate() {
            builder.index = index;
            if let Err(source) = self.tokenizer.dispatch(c) {
                self.issues = builder.issues;
                return Err(ParseError::new(index, &chars, source));
            }
            self.drain(&mut builder);
        }
        builder.index = chars.len();
        self.tokenizer.finish();
        self.drain(&mut builder);

        let (tree, issues) = builder.finish(&mut self.hooks);
        self.issues = issues;
        Ok(tree)
    }

    /// Issues recorded by the last call to [`HtmlParser::parse`].
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    fn drain(&mut self, builder: &mut TreeBuilder) {
        loop {
            let next = self.tokens.borrow_mut().pop_front();
            let Some(token) = next else {
                break;
            };
            builder.process(token, &mut self.hooks);
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `html` with a hook-free parser.
///
/// # Errors
///
/// See [`HtmlParser::parse`].
pub fn parse(html: &str) -> Result<DomTree, ParseError> {
    HtmlParser::new().parse(html)
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(&mut out, tree, id, 0);
    out
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}

fn write_node(out: &mut String, tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => {
            let _ = writeln!(out, "{prefix}#document");
        }
        NodeType::Element(data) => {
            let tag = data.tag_name().to_ascii_lowercase();
            if data.attributes.is_empty() {
                let _ = writeln!(out, "{prefix}<{tag}>");
            } else {
                let attrs: Vec<String> = data
                    .attributes
                    .iter()
                    .map(|attr| {
                        if attr.value.is_empty() {
                            attr.name.clone()
                        } else {
                            format!("{}=\"{}\"", attr.name, attr.value)
                        }
                    })
                    .collect();
                let _ = writeln!(out, "{prefix}<{tag} {}>", attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
    for &child in tree.children(id) {
        write_node(out, tree, child, indent + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tree_outline() {
        let tree = parse("<p class=\"x\">a b</p>").unwrap();
        assert_eq!(
            format_tree(&tree, NodeId::ROOT),
            "#document\n  <html>\n    <body>\n      <p class=\"x\">\n        \"a\u{00B7}b\"\n"
        );
    }

    #[test]
    fn test_issue_records_index() {
        let mut parser = HtmlParser::new();
        let _ = parser.parse("<p></div></p>").unwrap();
        assert_eq!(
            parser.issues(),
            &[ParseIssue {
                message: "unmatched end tag </div> ignored".to_string(),
                index: 8,
            }]
        );
    }

    #[test]
    fn test_empty_input_still_has_a_root() {
        let tree = parse("").unwrap();
        assert_eq!(tree.document_element().map(|id| tree.tag_name(id)), Some(Some("HTML")));
    }
}
