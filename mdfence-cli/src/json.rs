//! Tree to JSON conversion for `mdfence tree --json`.
//!
//! The tree is written out node by node from an explicit stack rather than
//! built as one nested `serde_json::Value`, since serializing or dropping a
//! `Value` recurses once per nesting level.

use mdfence_dom::{DomTree, NodeId, NodeType, Span};
use mdfence_html::ParseIssue;
use serde_json::{Map, Value, json};

fn span(span: Span) -> Value {
    json!([span.start, span.end])
}

enum Frame {
    Open { id: NodeId, first: bool },
    Close,
}

/// The fields of one node, without its children.
fn node_fields(tree: &DomTree, id: NodeId) -> Option<(Map<String, Value>, bool)> {
    let node = tree.get(id)?;
    let mut fields = Map::new();
    let mut has_children = true;

    let (kind, content) = match &node.node_type {
        NodeType::Document => ("document", None),
        NodeType::Element(_) => ("element", None),
        NodeType::Text(text) => ("text", Some(text)),
        NodeType::Comment(text) => ("comment", Some(text)),
        NodeType::Doctype(text) => ("doctype", Some(text)),
    };
    let _ = fields.insert("type".to_string(), json!(kind));

    if let NodeType::Element(data) = &node.node_type {
        let attributes: Map<String, Value> = data
            .attrs
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let _ = fields.insert("tagName".to_string(), json!(data.tag_name));
        let _ = fields.insert("attributes".to_string(), Value::Object(attributes));
        let _ = fields.insert("selfClosing".to_string(), json!(data.self_closing));
    }
    if let Some(content) = content {
        let _ = fields.insert("content".to_string(), json!(content));
        has_children = false;
    }
    let _ = fields.insert(
        "location".to_string(),
        json!({
            "open": span(node.location.open),
            "close": span(node.location.close),
        }),
    );

    Some((fields, has_children))
}

/// Write the subtree at `id` as nested JSON objects. With `issues`, the top
/// object gets an extra `"issues"` array.
///
/// # Errors
///
/// Only if `serde_json` fails to serialize a plain value, which it does not
/// do for strings, numbers and maps.
pub fn write_tree_json(
    tree: &DomTree,
    id: NodeId,
    issues: Option<&[ParseIssue]>,
    out: &mut String,
) -> serde_json::Result<()> {
    let mut stack = vec![Frame::Open { id, first: true }];
    let mut depth = 0usize;

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Open { id, first } => {
                if !first {
                    out.push(',');
                }
                let Some((fields, has_children)) = node_fields(tree, id) else {
                    out.push_str("null");
                    continue;
                };

                out.push('{');
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&serde_json::to_string(key)?);
                    out.push(':');
                    out.push_str(&serde_json::to_string(value)?);
                }

                if has_children {
                    out.push_str(",\"children\":[");
                    depth += 1;
                    stack.push(Frame::Close);
                    stack.extend(
                        tree.children(id)
                            .iter()
                            .enumerate()
                            .rev()
                            .map(|(i, &child)| Frame::Open {
                                id: child,
                                first: i == 0,
                            }),
                    );
                } else if depth == 0 {
                    write_issues(issues, out)?;
                    out.push('}');
                } else {
                    out.push('}');
                }
            }
            Frame::Close => {
                out.push(']');
                depth -= 1;
                if depth == 0 {
                    write_issues(issues, out)?;
                }
                out.push('}');
            }
        }
    }
    Ok(())
}

fn write_issues(issues: Option<&[ParseIssue]>, out: &mut String) -> serde_json::Result<()> {
    if let Some(issues) = issues {
        out.push_str(",\"issues\":");
        out.push_str(&serde_json::to_string(&issues_to_json(issues))?);
    }
    Ok(())
}

/// Parse issues as a JSON array.
#[must_use]
pub fn issues_to_json(issues: &[ParseIssue]) -> Value {
    issues
        .iter()
        .map(|issue| {
            json!({
                "kind": issue.kind.to_string(),
                "message": issue.message,
                "span": span(issue.span),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree_json(html: &str, with_issues: bool) -> Value {
        let (tree, issues) = mdfence_html::parse_with_issues(html);
        let mut out = String::new();
        write_tree_json(&tree, NodeId::ROOT, with_issues.then_some(&issues[..]), &mut out)
            .unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_element_json() {
        let value = tree_json(r#"<a href="x" id="y">hi</a><!--c-->"#, false);
        assert_eq!(value["type"], "document");
        assert!(value.get("issues").is_none());

        let a = &value["children"][0];
        assert_eq!(a["type"], "element");
        assert_eq!(a["tagName"], "a");
        assert_eq!(a["selfClosing"], false);
        assert_eq!(a["location"]["open"], json!([0, 19]));
        assert_eq!(a["location"]["close"], json!([21, 25]));
        assert_eq!(a["children"][0]["content"], "hi");
        assert!(a["children"][0].get("children").is_none());
        assert_eq!(value["children"][1]["type"], "comment");
        assert_eq!(value["children"][1]["content"], "c");

        let keys: Vec<_> = a["attributes"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["href", "id"]);
    }

    #[test]
    fn test_empty_children_array() {
        let value = tree_json("<br>", false);
        assert_eq!(value["children"][0]["children"], json!([]));
        assert_eq!(tree_json("", false)["children"], json!([]));
    }

    #[test]
    fn test_issues_json() {
        let value = tree_json("<div></p>", true);
        assert_eq!(value["issues"][0]["kind"], "unmatched-close-tag");
        assert_eq!(value["issues"][0]["span"], json!([5, 9]));
        assert_eq!(value["issues"][1]["kind"], "unclosed-element");
    }

    #[test]
    fn test_issues_on_leaf_root() {
        let (tree, issues) = mdfence_html::parse_with_issues("text</p>");
        let text = tree.children(NodeId::ROOT)[0];
        let mut out = String::new();
        write_tree_json(&tree, text, Some(&issues), &mut out).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["content"], "text");
        assert_eq!(value["issues"][0]["kind"], "unmatched-close-tag");
    }

    #[test]
    fn test_deep_tree_is_written_without_recursion() {
        let depth = 50_000;
        let tree = mdfence_html::parse(&"<div>".repeat(depth));
        let mut out = String::new();
        write_tree_json(&tree, NodeId::ROOT, None, &mut out).unwrap();
        assert!(out.starts_with("{\"type\":\"document\""));
        assert_eq!(out.matches("\"tagName\":\"div\"").count(), depth);
        assert!(out.ends_with(&"]}".repeat(depth + 1)));
    }
}
