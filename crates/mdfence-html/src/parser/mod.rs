//! Tree construction from the token stream.

mod core;

pub use self::core::{HTMLParser, IssueKind, ParseIssue, format_tree, print_tree};
