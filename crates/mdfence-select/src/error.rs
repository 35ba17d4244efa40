use thiserror::Error;

use crate::selector::SelectorKind;

/// Errors from parsing or matching a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The selector text is not valid selector syntax.
    #[error("invalid selector `{selector}`: {reason}")]
    Syntax {
        /// The selector as given.
        selector: String,
        /// What the parser expected.
        reason: String,
    },

    /// The selector parsed, but the matcher does not evaluate this kind.
    /// Only type selectors and `*` are matched.
    #[error("unhandled selector type: {kind}")]
    UnhandledSelector {
        /// The first unsupported kind found.
        kind: SelectorKind,
    },
}
