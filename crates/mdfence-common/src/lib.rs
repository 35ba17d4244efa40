//! Common utilities for the mdfence crates.
//!
//! This crate provides shared infrastructure used by the parser, the selector
//! engine and the Markdown extractor:
//! - **Warning System** - deduplicated diagnostics routed through `log`
//! - **Line Index** - byte offset to line/column conversion

pub mod line_index;
pub mod warning;

pub use line_index::{LineIndex, Position};
