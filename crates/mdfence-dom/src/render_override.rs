//! Caller-supplied element rendering.
//!
//! An element can carry a [`RenderOverride`]: a callback the serializer invokes
//! instead of writing the element's own tags. The callback receives the
//! element's attributes and its already-rendered children and answers with a
//! [`RenderOutput`], which states whether the result is markup to trust as-is
//! or plain text that still needs escaping.

use std::fmt;
use std::sync::Arc;

use crate::AttributesMap;

/// Output of a [`RenderOverride`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    /// Pre-escaped markup, written verbatim.
    Markup(String),
    /// Plain text, HTML-escaped before it is written.
    Plain(String),
}

impl RenderOutput {
    /// The wrapped string, regardless of kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Markup(s) | Self::Plain(s) => s,
        }
    }
}

type RenderFn = dyn Fn(&AttributesMap, &str) -> RenderOutput + Send + Sync;

/// A rendering callback attached to an element.
///
/// Cloning is cheap: clones share the same callback.
#[derive(Clone)]
pub struct RenderOverride(Arc<RenderFn>);

impl RenderOverride {
    /// Wrap a callback taking `(attributes, rendered_children)`.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&AttributesMap, &str) -> RenderOutput + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    /// Invoke the callback.
    #[must_use]
    pub fn render(&self, attrs: &AttributesMap, children: &str) -> RenderOutput {
        (self.0)(attrs, children)
    }
}

impl fmt::Debug for RenderOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderOverride(..)")
    }
}
