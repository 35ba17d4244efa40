use std::fmt::{self, Write};

use mdfence_common::warning::warn_once;
use mdfence_dom::{DomTree, ElementData, Location, NodeId, NodeType, Span};
use strum_macros::Display;

use crate::elements::is_void_element;
use crate::tokenizer::{Token, split_attributes};

/// What kind of malformed markup the tree builder tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    /// An end tag matching no open element. The tag was dropped.
    UnmatchedCloseTag,
    /// An open element closed by the end tag of one of its ancestors.
    ImplicitlyClosed,
    /// An element still open when the input ran out.
    UnclosedElement,
}

/// A recoverable problem found while building the tree.
///
/// Parsing never fails; issues are how the parser reports what it had to
/// paper over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Category of the problem.
    pub kind: IssueKind,
    /// Human readable description.
    pub message: String,
    /// The tag the issue is about.
    pub span: Span,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.kind, self.span.start, self.span.end, self.message
        )
    }
}

/// The tree builder.
///
/// Consumes tokens left to right and appends nodes under the *current node*,
/// which is the top of an explicit stack of open elements (or the document
/// when the stack is empty). Text is not tokenized: before each token, the
/// input between the previous token and this one becomes a text node.
///
/// The builder is deliberately lenient. It never fails and never reorders
/// content; see [`IssueKind`] for what it tolerates.
pub struct HTMLParser<'a> {
    /// The text the tokens were produced from.
    input: &'a str,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Elements opened and not closed yet, innermost last.
    stack_of_open_elements: Vec<NodeId>,

    /// The element created most recently, open or not.
    last_created_element: Option<NodeId>,

    /// End of the previous token; start of pending text.
    last_index: usize,

    /// Tree under construction. `NodeId::ROOT` is the Document node.
    tree: DomTree,

    /// Parse issues encountered so far.
    issues: Vec<ParseIssue>,
}

impl<'a> HTMLParser<'a> {
    /// Create a parser over `input` and the tokens the tokenizer found in it.
    #[must_use]
    pub fn new(input: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            input,
            tokens,
            stack_of_open_elements: Vec::new(),
            last_created_element: None,
            last_index: 0,
            tree: DomTree::new(),
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        if let Some(document) = self.tree.get_mut(NodeId::ROOT) {
            document.location = Location::leaf(Span::new(0, self.input.len()));
        }

        for token in std::mem::take(&mut self.tokens) {
            self.process_token(token);
        }
        self.finish();

        (self.tree, self.issues)
    }

    /// The node new children are appended to.
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn process_token(&mut self, token: Token) {
        let span = token.span();
        self.flush_text(span.start);

        match token {
            Token::StartTag {
                name,
                attributes,
                self_closing,
                span,
            } => self.insert_element(name, &attributes, self_closing, span),
            Token::EndTag { name, span } => self.close_element(&name, span),
            Token::Comment { data, span } => {
                let parent = self.current_node();
                let _ = self
                    .tree
                    .append(parent, NodeType::Comment(data), Location::leaf(span));
            }
            Token::Doctype { data, span } => {
                let parent = self.current_node();
                let _ = self
                    .tree
                    .append(parent, NodeType::Doctype(data), Location::leaf(span));
            }
        }

        self.last_index = span.end;
    }

    /// Append the input between the previous token and `until` as a text node
    /// of the current node. Nothing happens for an empty gap.
    fn flush_text(&mut self, until: usize) {
        if until <= self.last_index {
            return;
        }
        let span = Span::new(self.last_index, until);
        if let Some(text) = span.slice(self.input) {
            let parent = self.current_node();
            let _ = self.tree.append(
                parent,
                NodeType::Text(text.to_string()),
                Location::leaf(span),
            );
        }
        self.last_index = until;
    }

    /// Void elements and `<tag/>` are complete as soon as they are created.
    /// Everything else becomes the current node.
    fn insert_element(&mut self, name: String, attributes: &str, self_closing: bool, span: Span) {
        let self_closing = self_closing || is_void_element(&name);
        let element = ElementData {
            tag_name: name,
            attrs: split_attributes(attributes),
            self_closing,
            render_override: None,
        };

        let parent = self.current_node();
        let id = self
            .tree
            .append(parent, NodeType::Element(element), Location::leaf(span));
        self.last_created_element = Some(id);

        if !self_closing {
            self.stack_of_open_elements.push(id);
        }
    }

    fn close_element(&mut self, name: &str, span: Span) {
        let current = self.current_node();
        if self.is_element_named(current, name) {
            let _ = self.stack_of_open_elements.pop();
            self.finish_element(current, span);
            return;
        }

        // `<br></br>`, `<path/></path>`: the end tag belongs to the element
        // just created, which never became the current node.
        if let Some(last) = self.last_created_element
            && self
                .tree
                .as_element(last)
                .is_some_and(|e| e.self_closing && e.tag_name == name)
        {
            if let Some(node) = self.tree.get_mut(last) {
                node.location.close = span;
            }
            log::debug!("attached </{name}> to self-closing element");
            return;
        }

        let matching = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.is_element_named(id, name));

        let Some(position) = matching else {
            self.parse_issue(
                IssueKind::UnmatchedCloseTag,
                format!("ignored </{name}> with no open <{name}>"),
                span,
            );
            return;
        };

        for id in self.stack_of_open_elements.split_off(position + 1) {
            let (tag, open) = self.element_summary(id);
            self.parse_issue(
                IssueKind::ImplicitlyClosed,
                format!("<{tag}> implicitly closed by </{name}>"),
                open,
            );
        }
        if let Some(element) = self.stack_of_open_elements.pop() {
            self.finish_element(element, span);
        }
    }

    /// Record the end tag of a popped element. An element that ends up with no
    /// children gets its raw interior as a single text child, so that content
    /// swallowed by ignored tags is still reachable and still rendered.
    fn finish_element(&mut self, id: NodeId, close: Span) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        node.location.close = close;
        if !node.children.is_empty() {
            return;
        }

        let inner = node.location.inner();
        if inner.is_empty() {
            return;
        }
        if let Some(text) = inner.slice(self.input) {
            let _ = self.tree.append(
                id,
                NodeType::Text(text.to_string()),
                Location::leaf(inner),
            );
        }
    }

    /// Trailing text goes to the current node, which is the document unless
    /// something was left open.
    fn finish(&mut self) {
        self.flush_text(self.input.len());

        for id in std::mem::take(&mut self.stack_of_open_elements) {
            let (tag, open) = self.element_summary(id);
            self.parse_issue(
                IssueKind::UnclosedElement,
                format!("<{tag}> is never closed"),
                open,
            );
        }
    }

    fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.tree.as_element(id).is_some_and(|e| e.tag_name == name)
    }

    fn element_summary(&self, id: NodeId) -> (String, Span) {
        let tag = self
            .tree
            .as_element(id)
            .map(|e| e.tag_name.clone())
            .unwrap_or_default();
        let open = self.tree.location(id).unwrap_or_default().open;
        (tag, open)
    }

    /// Record a parse issue.
    ///
    /// Logs via mdfence-common's warning system and stores the issue for later retrieval.
    fn parse_issue(&mut self, kind: IssueKind, message: String, span: Span) {
        warn_once("HTML Parser", &message);
        self.issues.push(ParseIssue {
            kind,
            message,
            span,
        });
    }
}

/// Format a tree as an indented outline, one node per line.
///
/// Meant for debugging: text shows `\n` escaped and spaces as `·`, self-closing
/// elements end in `/>`. Indentation stops growing after 32 levels; deeper
/// lines are prefixed with their depth, as in `(40) <div>`.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, &mut out);
    out
}

/// Print a tree to stdout, as formatted by [`format_tree`].
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}

/// Deeper levels keep this indentation and print their depth instead.
const MAX_INDENT: usize = 32;

fn write_tree(tree: &DomTree, root: NodeId, out: &mut String) {
    let mut stack = vec![(root, 0)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };

        // Writing into a String cannot fail.
        let mut prefix = "  ".repeat(depth.min(MAX_INDENT));
        if depth > MAX_INDENT {
            let _ = write!(prefix, "({depth}) ");
        }

        let _ = match &node.node_type {
            NodeType::Document => writeln!(out, "{prefix}Document"),
            NodeType::Element(data) => {
                let attrs: String = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            format!(" {k}")
                        } else {
                            format!(" {k}=\"{v}\"")
                        }
                    })
                    .collect();
                let end = if data.self_closing { "/>" } else { ">" };
                writeln!(out, "{prefix}<{}{attrs}{end}", data.tag_name)
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                writeln!(out, "{prefix}\"{display}\"")
            }
            NodeType::Comment(data) => writeln!(out, "{prefix}<!--{data}-->"),
            NodeType::Doctype(data) => writeln!(out, "{prefix}<!{data}>"),
        };

        stack.extend(
            tree.children(id)
                .iter()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
    }
}
