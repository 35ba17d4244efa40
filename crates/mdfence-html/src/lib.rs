//! Lenient HTML tokenizer, tree builder and serializer for mdfence.
//!
//! # Scope
//!
//! This crate handles the HTML found inside Markdown documents: fragments,
//! directive comments, inline SVG. It implements:
//! - **Tag scanner**: a single regex applied from a cursor, yielding start
//!   tags, end tags, comments and doctypes with byte spans. `script` and
//!   `style` bodies are never tokenized.
//! - **Attribute splitter**: raw attribute text to an ordered map.
//! - **Tree builder**: an explicit stack of open elements, void and
//!   self-closing handling, and tolerant recovery from stray or missing end
//!   tags, reported as [`ParseIssue`]s.
//! - **Serializer**: renders a tree back to markup. For well-formed input,
//!   `render(&parse(s), NodeId::ROOT) == s`.
//!
//! # Not Implemented
//!
//! - The WHATWG tree construction algorithm (insertion modes, implicit end
//!   tags, foster parenting, adoption agency)
//! - Character reference decoding
//! - Foreign content beyond self-closing tags under `<svg>`

/// Void and raw text element sets.
pub mod elements;
/// Tree construction.
pub mod parser;
/// Rendering trees back to markup.
pub mod serializer;
/// Tag scanner and attribute splitter.
pub mod tokenizer;

use mdfence_dom::DomTree;

pub use parser::{HTMLParser, IssueKind, ParseIssue, format_tree, print_tree};
pub use serializer::{escape_text, render};
pub use tokenizer::{HTMLTokenizer, Token, split_attributes};

/// Parse markup into a tree. Never fails.
#[must_use]
pub fn parse(input: &str) -> DomTree {
    parse_with_issues(input).0
}

/// Parse markup into a tree, also returning the problems the parser recovered
/// from.
#[must_use]
pub fn parse_with_issues(input: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    HTMLParser::new(input, tokenizer.into_tokens()).run_with_issues()
}
