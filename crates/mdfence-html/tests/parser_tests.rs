//! Integration tests for the tree builder.

use mdfence_dom::{DomTree, Location, Node, NodeId, NodeType, Span, descendants};
use mdfence_html::{HTMLParser, HTMLTokenizer, IssueKind, format_tree, parse, parse_with_issues};
use pretty_assertions::assert_eq;

/// Helper to get element by tag name (first match, document order)
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    descendants(tree, NodeId::ROOT)
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
}

/// Helper to get a node reference
fn get_node(tree: &DomTree, id: NodeId) -> &Node {
    tree.get(id).expect("Node not found")
}

fn tag_name(tree: &DomTree, id: NodeId) -> &str {
    &tree.as_element(id).expect("not an element").tag_name
}

#[test]
fn test_document_root() {
    let input = "<p>a</p>";
    let tree = parse(input);
    let root = get_node(&tree, NodeId::ROOT);
    assert!(matches!(root.node_type, NodeType::Document));
    assert_eq!(root.parent, None);
    assert_eq!(root.location, Location::leaf(Span::new(0, input.len())));
}

#[test]
fn test_empty_input() {
    let (tree, issues) = parse_with_issues("");
    assert_eq!(tree.len(), 1);
    assert!(tree.children(NodeId::ROOT).is_empty());
    assert!(issues.is_empty());
}

#[test]
fn test_text_only() {
    let tree = parse("just text");
    let children = tree.children(NodeId::ROOT);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.as_text(children[0]), Some("just text"));
}

#[test]
fn test_heading_structure_and_locations() {
    let tree = parse("<h1>Hello world!</h1>");
    let h1 = find_element(&tree, "h1").expect("h1");
    assert_eq!(tree.parent(h1), Some(NodeId::ROOT));

    let location = tree.location(h1).expect("location");
    assert_eq!(location.open, Span::new(0, 4));
    assert_eq!(location.close, Span::new(16, 21));
    assert_eq!(location.inner(), Span::new(4, 16));

    let text = tree.children(h1)[0];
    assert_eq!(tree.as_text(text), Some("Hello world!"));
    assert_eq!(tree.location(text), Some(Location::leaf(Span::new(4, 16))));
}

#[test]
fn test_nesting_and_order() {
    let tree = parse("<ul><li>one</li><li>two</li></ul>tail");
    let ul = find_element(&tree, "ul").expect("ul");
    let items: Vec<_> = tree
        .children(ul)
        .iter()
        .map(|&li| tree.text_content(li))
        .collect();
    assert_eq!(items, ["one", "two"]);

    let root_children = tree.children(NodeId::ROOT);
    assert_eq!(root_children.len(), 2);
    assert_eq!(tree.as_text(root_children[1]), Some("tail"));
}

#[test]
fn test_attributes_in_source_order() {
    let tree = parse(r#"<a href="https://x" title='y'>link</a>"#);
    let a = find_element(&tree, "a").expect("a");
    let attrs: Vec<_> = tree
        .as_element(a)
        .expect("element")
        .attrs
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(attrs, [("href", "https://x"), ("title", "y")]);
}

#[test]
fn test_void_elements_have_no_children() {
    let tree = parse("<p>a<br>b<img src=\"x\">c</p>");
    let p = find_element(&tree, "p").expect("p");
    let kinds: Vec<_> = tree
        .children(p)
        .iter()
        .map(|&c| {
            tree.as_element(c)
                .map_or_else(|| tree.as_text(c).unwrap_or("?").to_string(), |e| format!("<{}>", e.tag_name))
        })
        .collect();
    assert_eq!(kinds, ["a", "<br>", "b", "<img>", "c"]);

    let br = find_element(&tree, "br").expect("br");
    assert!(tree.children(br).is_empty());
    assert!(tree.as_element(br).expect("br").self_closing);
    let location = tree.location(br).expect("location");
    assert_eq!(location.open, location.close);
}

#[test]
fn test_void_membership_ignores_case() {
    let tree = parse("<BR>text");
    let br = find_element(&tree, "BR").expect("BR");
    assert!(tree.children(br).is_empty());
    assert_eq!(tree.children(NodeId::ROOT).len(), 2);
}

#[test]
fn test_self_closing_syntax() {
    let tree = parse(r#"<svg><path d="0 0 0" /><g></g></svg>"#);
    let svg = find_element(&tree, "svg").expect("svg");
    let children: Vec<_> = tree
        .children(svg)
        .iter()
        .map(|&c| tag_name(&tree, c))
        .collect();
    assert_eq!(children, ["path", "g"]);
    let path = find_element(&tree, "path").expect("path");
    assert!(tree.as_element(path).expect("path").self_closing);
}

#[test]
fn test_script_body_is_single_text_child() {
    let tree = parse("<script>if (a < b) {}</script>");
    let script = find_element(&tree, "script").expect("script");
    let children = tree.children(script);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.as_text(children[0]), Some("if (a < b) {}"));
}

#[test]
fn test_style_body_with_markup_lookalikes() {
    let tree = parse("<style>a > b { content: '<p>'; }</style><p>x</p>");
    let style = find_element(&tree, "style").expect("style");
    assert_eq!(tree.text_content(style), "a > b { content: '<p>'; }");
    assert_eq!(tree.parent(find_element(&tree, "p").expect("p")), Some(NodeId::ROOT));
}

#[test]
fn test_unclosed_script_keeps_rest_as_text() {
    let (tree, issues) = parse_with_issues("<script>let a = '<b>';");
    let script = find_element(&tree, "script").expect("script");
    assert_eq!(tree.text_content(script), "let a = '<b>';");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::UnclosedElement);
}

#[test]
fn test_comment_and_doctype_leaves() {
    let tree = parse("<!DOCTYPE html><div><!-- note --></div>");
    let root_children = tree.children(NodeId::ROOT);
    assert!(matches!(
        &get_node(&tree, root_children[0]).node_type,
        NodeType::Doctype(data) if data == "DOCTYPE html"
    ));
    let div = find_element(&tree, "div").expect("div");
    let comment = tree.children(div)[0];
    assert!(matches!(
        &get_node(&tree, comment).node_type,
        NodeType::Comment(data) if data == " note "
    ));
    assert_eq!(tree.location(comment), Some(Location::leaf(Span::new(20, 33))));
}

#[test]
fn test_stray_close_tag_is_ignored() {
    let (tree, issues) = parse_with_issues("<p>a</div>b</p>");
    let p = find_element(&tree, "p").expect("p");
    assert_eq!(tree.text_content(p), "ab");
    assert_eq!(tree.children(p).len(), 2);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::UnmatchedCloseTag);
    assert_eq!(issues[0].span, Span::new(4, 10));
}

#[test]
fn test_element_emptied_by_stray_close_keeps_interior_as_text() {
    let (tree, issues) = parse_with_issues("<p></div></p>");
    let p = find_element(&tree, "p").expect("p");

    let children = tree.children(p);
    assert_eq!(children.len(), 1);
    assert_eq!(tree.as_text(children[0]), Some("</div>"));
    assert_eq!(
        get_node(&tree, children[0]).location,
        Location::leaf(Span::new(3, 9))
    );
    assert_eq!(get_node(&tree, p).location.close, Span::new(9, 13));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::UnmatchedCloseTag);
    assert_eq!(issues[0].span, Span::new(3, 9));
}

#[test]
fn test_stray_close_tag_at_top_level() {
    let (tree, issues) = parse_with_issues("</div>");
    assert_eq!(tree.len(), 1);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::UnmatchedCloseTag);
    assert!(issues[0].to_string().starts_with("unmatched-close-tag at 0..6"));
}

#[test]
fn test_close_tag_for_ancestor_closes_intermediates() {
    let (tree, issues) = parse_with_issues("<div><span>a</div>b");
    let div = find_element(&tree, "div").expect("div");
    let span = find_element(&tree, "span").expect("span");

    assert_eq!(tree.location(div).expect("div").close, Span::new(12, 18));
    let span_location = tree.location(span).expect("span");
    assert_eq!(span_location.close, span_location.open);

    let root_children = tree.children(NodeId::ROOT);
    assert_eq!(tree.as_text(root_children[1]), Some("b"));

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::ImplicitlyClosed);
    assert_eq!(issues[0].span, Span::new(5, 11));
}

#[test]
fn test_close_tag_attaches_to_self_closing_element() {
    let (tree, issues) = parse_with_issues("<p><br></br>x</p>");
    assert!(issues.is_empty());
    let br = find_element(&tree, "br").expect("br");
    let location = tree.location(br).expect("br");
    assert_eq!(location.open, Span::new(3, 7));
    assert_eq!(location.close, Span::new(7, 12));
    assert!(tree.children(br).is_empty());

    let p = find_element(&tree, "p").expect("p");
    assert_eq!(tree.text_content(p), "x");
}

#[test]
fn test_unclosed_elements_reported() {
    let (tree, issues) = parse_with_issues("<div><p>text");
    let p = find_element(&tree, "p").expect("p");
    assert_eq!(tree.text_content(p), "text");
    let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, [IssueKind::UnclosedElement, IssueKind::UnclosedElement]);
}

#[test]
fn test_tag_names_match_case_sensitively() {
    let (tree, issues) = parse_with_issues("<Foo>a</foo></Foo>");
    let foo = find_element(&tree, "Foo").expect("Foo");
    assert_eq!(tree.location(foo).expect("Foo").close, Span::new(12, 18));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::UnmatchedCloseTag);
}

#[test]
fn test_every_child_has_matching_parent() {
    let tree = parse("<div><p>a<b>b</b></p><!--c--><br>d</div>e");
    for id in descendants(&tree, NodeId::ROOT) {
        for (index, &child) in tree.children(id).iter().enumerate() {
            assert_eq!(tree.parent(child), Some(id));
            assert_eq!(tree.index_in_parent(child), Some(index));
        }
    }
}

#[test]
fn test_parser_with_explicit_tokenizer() {
    let input = "<b>x</b>";
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    let tree = HTMLParser::new(input, tokenizer.into_tokens()).run();
    assert!(find_element(&tree, "b").is_some());
}

#[test]
fn test_format_tree() {
    let tree = parse("<div id=\"a\"><br>hi there</div>");
    assert_eq!(
        format_tree(&tree, NodeId::ROOT),
        "Document\n  <div id=\"a\">\n    <br/>\n    \"hi\u{00B7}there\"\n"
    );
}

#[test]
fn test_format_tree_deep_nesting() {
    let depth = 50_000;
    let tree = parse(&"<div>".repeat(depth));
    let outline = format_tree(&tree, NodeId::ROOT);

    let lines: Vec<_> = outline.lines().collect();
    assert_eq!(lines.len(), depth + 1);
    assert_eq!(lines[1], "  <div>");
    assert_eq!(lines[32], format!("{}<div>", "  ".repeat(32)));
    assert_eq!(lines[33], format!("{}(33) <div>", "  ".repeat(32)));
    assert_eq!(lines[depth], format!("{}({depth}) <div>", "  ".repeat(32)));
}
