//! Tag scanner and attribute splitter.
//!
//! The tokenizer only recognises tags, comments and doctypes; the text between
//! them is implicit. Raw attribute strings are split into maps separately, by
//! the tree builder, through [`split_attributes`].

/// Splitting a start tag's raw attribute text into an ordered map.
pub mod attributes;
/// The regex-driven tokenizer.
pub mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use attributes::split_attributes;
pub use scanner::{HTMLTokenizer, TokenizerState};
pub use token::Token;
