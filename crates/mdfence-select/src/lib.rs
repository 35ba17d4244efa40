//! Selector parsing and matching for mdfence trees.
//!
//! [`parse_selector`] understands most selector syntax. The matcher behind
//! [`query_selector`] and [`query_selector_all`] evaluates only type selectors
//! and `*`; anything else fails with [`SelectError::UnhandledSelector`] rather
//! than silently matching nothing.

mod error;
mod matcher;
mod selector;

pub use error::SelectError;
pub use matcher::{SelectorInput, ensure_supported, matches, query_selector, query_selector_all};
pub use selector::{
    AttributeMatcher, AttributeOperator, AttributeSelector, Combinator, Selector, SelectorKind,
    parse_selector,
};
