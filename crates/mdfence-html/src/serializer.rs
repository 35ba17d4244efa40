//! Rendering a tree back into markup.
//!
//! For well-formed input, rendering is the inverse of parsing:
//! `render(&parse(s), NodeId::ROOT) == s`. Text, comments and doctypes are
//! written back verbatim, attributes are written as ` name="value"` in source
//! order, and the tag form is chosen per element:
//!
//! - an element without children inside an `<svg>` is written `<tag />`
//! - a void element is written `<tag />`
//! - anything else gets an explicit end tag, even if the source said `<tag/>`

use std::borrow::Cow;

use mdfence_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType, RenderOutput};

use crate::elements::is_void_element;

/// HTML-escape text for use as element content (`&`, `<`, `>`).
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Render a node and everything under it.
#[must_use]
pub fn render(tree: &DomTree, id: NodeId) -> String {
    let mut renderer = Renderer {
        tree,
        out: String::new(),
    };
    renderer.run(id);
    renderer.out
}

/// Work left to do. The renderer keeps these on an explicit stack instead of
/// recursing, so nesting depth is bounded only by memory.
enum Step<'t> {
    /// Render this node.
    Enter(NodeId),
    /// Write `</tag>`.
    Close(&'t str),
    /// Every child of an overridden element has been written after `start`:
    /// take that output back and hand it to the override.
    Override {
        element: &'t ElementData,
        start: usize,
    },
}

struct Renderer<'t> {
    tree: &'t DomTree,
    out: String,
}

impl<'t> Renderer<'t> {
    fn run(&mut self, root: NodeId) {
        let mut steps = vec![Step::Enter(root)];

        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(id) => self.enter(id, &mut steps),
                Step::Close(tag) => {
                    self.out.push_str("</");
                    self.out.push_str(tag);
                    self.out.push('>');
                }
                Step::Override { element, start } => {
                    let children = self.out.split_off(start);
                    if let Some(render_override) = &element.render_override {
                        match render_override.render(&element.attrs, &children) {
                            RenderOutput::Markup(markup) => self.out.push_str(&markup),
                            RenderOutput::Plain(text) => self.out.push_str(&escape_text(&text)),
                        }
                    }
                }
            }
        }
    }

    fn enter(&mut self, id: NodeId, steps: &mut Vec<Step<'t>>) {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return;
        };
        let children = node.children.as_slice();

        match &node.node_type {
            NodeType::Document => push_children(steps, children),
            NodeType::Text(text) => self.out.push_str(text),
            NodeType::Comment(data) => {
                self.out.push_str("<!--");
                self.out.push_str(data);
                self.out.push_str("-->");
            }
            NodeType::Doctype(data) => {
                self.out.push_str("<!");
                self.out.push_str(data);
                self.out.push('>');
            }
            NodeType::Element(element) if element.render_override.is_some() => {
                steps.push(Step::Override {
                    element,
                    start: self.out.len(),
                });
                push_children(steps, children);
            }
            NodeType::Element(element) => {
                self.out.push('<');
                self.out.push_str(&element.tag_name);
                write_attributes(&element.attrs, &mut self.out);

                if self.renders_self_closing(id, element, children) {
                    self.out.push_str(" />");
                    return;
                }

                self.out.push('>');
                steps.push(Step::Close(&element.tag_name));
                push_children(steps, children);
            }
        }
    }

    fn renders_self_closing(&self, id: NodeId, element: &ElementData, children: &[NodeId]) -> bool {
        (children.is_empty() && self.tree.has_ancestor_named(id, "svg"))
            || is_void_element(&element.tag_name)
    }
}

fn push_children(steps: &mut Vec<Step<'_>>, children: &[NodeId]) {
    steps.extend(children.iter().rev().map(|&child| Step::Enter(child)));
}

/// Write ` name="value"` for each attribute. A `"` inside a value becomes
/// `&quot;`; nothing else is touched, so values that were already escaped in
/// the source are not escaped twice.
fn write_attributes(attrs: &AttributesMap, out: &mut String) {
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        if value.contains('"') {
            out.push_str(&value.replace('"', "&quot;"));
        } else {
            out.push_str(value);
        }
        out.push('"');
    }
}
