//! Selector matching over a tree.
//!
//! Matching is structural and deliberately small: type selectors compare tag
//! names exactly (case-sensitive), `*` matches every element, and every other
//! kind of selector is rejected before the tree is touched.

use std::borrow::Cow;
use std::ops::ControlFlow;

use mdfence_dom::{DomTree, ElementData, NodeId, walk};

use crate::error::SelectError;
use crate::selector::{Selector, parse_selector};

/// A selector given either as text or already parsed.
#[derive(Debug, Clone, Copy)]
pub enum SelectorInput<'s> {
    /// Selector text, parsed on use.
    Text(&'s str),
    /// A parsed selector.
    Parsed(&'s Selector),
}

impl<'s> From<&'s str> for SelectorInput<'s> {
    fn from(text: &'s str) -> Self {
        Self::Text(text)
    }
}

impl<'s> From<&'s String> for SelectorInput<'s> {
    fn from(text: &'s String) -> Self {
        Self::Text(text)
    }
}

impl<'s> From<&'s Selector> for SelectorInput<'s> {
    fn from(selector: &'s Selector) -> Self {
        Self::Parsed(selector)
    }
}

impl<'s> SelectorInput<'s> {
    /// Parse if needed, then check that the matcher can evaluate the result.
    fn resolve(self) -> Result<Cow<'s, Selector>, SelectError> {
        let selector = match self {
            Self::Text(text) => Cow::Owned(parse_selector(text)?),
            Self::Parsed(selector) => Cow::Borrowed(selector),
        };
        ensure_supported(&selector)?;
        Ok(selector)
    }
}

/// Reject selector kinds the matcher does not evaluate.
///
/// # Errors
///
/// [`SelectError::UnhandledSelector`] for anything but a type selector or `*`.
pub fn ensure_supported(selector: &Selector) -> Result<(), SelectError> {
    match selector {
        Selector::Type(_) | Selector::Universal => Ok(()),
        other => Err(SelectError::UnhandledSelector { kind: other.kind() }),
    }
}

/// Whether a supported selector matches an element.
///
/// Unsupported selectors never match; use [`ensure_supported`] to tell them
/// apart from a plain miss.
#[must_use]
pub fn matches(selector: &Selector, element: &ElementData) -> bool {
    match selector {
        Selector::Universal => true,
        Selector::Type(name) => element.tag_name == *name,
        _ => false,
    }
}

/// Find the first element under `root` (inclusive) matching `selector`, in
/// document order.
///
/// Returns `Ok(None)` when nothing matches.
///
/// # Errors
///
/// [`SelectError::Syntax`] when selector text does not parse, and
/// [`SelectError::UnhandledSelector`] when it is not a type selector or `*`.
pub fn query_selector<'s>(
    tree: &DomTree,
    root: NodeId,
    selector: impl Into<SelectorInput<'s>>,
) -> Result<Option<NodeId>, SelectError> {
    let selector = selector.into().resolve()?;

    let found = walk(tree, root, |id, _, _| {
        if tree.as_element(id).is_some_and(|e| matches(&selector, e)) {
            ControlFlow::Break(id)
        } else {
            ControlFlow::Continue(())
        }
    });

    Ok(match found {
        ControlFlow::Break(id) => Some(id),
        ControlFlow::Continue(()) => None,
    })
}

/// Find every element under `root` (inclusive) matching `selector`, in
/// document order.
///
/// # Errors
///
/// Same as [`query_selector`].
pub fn query_selector_all<'s>(
    tree: &DomTree,
    root: NodeId,
    selector: impl Into<SelectorInput<'s>>,
) -> Result<Vec<NodeId>, SelectError> {
    let selector = selector.into().resolve()?;

    let mut found = Vec::new();
    let _ = walk::<(), _>(tree, root, |id, _, _| {
        if tree.as_element(id).is_some_and(|e| matches(&selector, e)) {
            found.push(id);
        }
        ControlFlow::Continue(())
    });
    log::debug!("selector `{selector}` matched {} element(s)", found.len());
    Ok(found)
}
