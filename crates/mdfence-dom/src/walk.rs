//! Depth-first, pre-order traversal.
//!
//! [`walk`] calls a visitor for every node under (and including) a root, in
//! document order. The visitor returns a [`ControlFlow`]: `Continue(())` keeps
//! going, `Break(value)` stops the traversal on the spot and hands `value`
//! back to the caller. That is the only way to stop early, and it is how the
//! selector engine implements first-match queries.
//!
//! Both traversals keep an explicit stack, so deeply nested input cannot
//! exhaust the call stack.

use std::ops::ControlFlow;

use crate::{DomTree, NodeId};

/// Visit `root` and its descendants in document order.
///
/// The visitor receives `(node, parent, index)`, where `index` is the node's
/// position among `parent`'s children. Both are `None` for `root` itself, the
/// walk having been started there rather than reached from a parent.
///
/// Returns the first `Break` the visitor produced, or `Continue(())` once every
/// node has been visited.
pub fn walk<B, F>(tree: &DomTree, root: NodeId, mut visitor: F) -> ControlFlow<B>
where
    F: FnMut(NodeId, Option<NodeId>, Option<usize>) -> ControlFlow<B>,
{
    let mut stack: Vec<(NodeId, Option<NodeId>, Option<usize>)> = vec![(root, None, None)];

    while let Some((id, parent, index)) = stack.pop() {
        visitor(id, parent, index)?;

        // Reverse so the first child is popped first.
        stack.extend(
            tree.children(id)
                .iter()
                .enumerate()
                .rev()
                .map(|(i, &child)| (child, Some(id), Some(i))),
        );
    }

    ControlFlow::Continue(())
}

/// Iterate over `root` and its descendants in document order.
#[must_use]
pub fn descendants(tree: &DomTree, root: NodeId) -> Descendants<'_> {
    Descendants {
        tree,
        stack: vec![root],
    }
}

/// Pre-order iterator returned by [`descendants`].
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
