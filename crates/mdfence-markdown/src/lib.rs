//! Fenced code block extraction for mdfence.
//!
//! Finds the fenced code blocks of a Markdown document, collects the
//! directive comments written above them, presents each block as a virtual
//! file and maps positions in that file back to the document.
//!
//! ```
//! use mdfence_common::Position;
//! use mdfence_markdown::{CommentStyle, ExtractOptions, Remapper, extract_code_blocks};
//!
//! let markdown = "# Title\n\n<!-- eslint-disable -->\n```js\nlet a = 1;\n```\n";
//! let blocks = extract_code_blocks(markdown, &ExtractOptions::default());
//! let file = blocks[0].virtual_file(&CommentStyle::Block);
//! assert_eq!(file.text, "/* eslint-disable */\nlet a = 1;\n");
//!
//! let remapper = Remapper::new(markdown, &blocks[0], file.prefix_lines);
//! assert_eq!(remapper.map_position(Position::new(2, 5)), Position::new(5, 5));
//! ```

mod extract;
mod options;
mod remap;
mod virtual_file;

pub use extract::{CodeBlock, LineOffset, extract_code_blocks};
pub use options::ExtractOptions;
pub use remap::Remapper;
pub use virtual_file::{CommentStyle, VirtualFile};
