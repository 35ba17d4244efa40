//! Mapping positions in extracted code back to the Markdown document.

use mdfence_common::{LineIndex, Position};

use crate::extract::{CodeBlock, LineOffset};

/// Maps positions in a block's virtual file to positions in the Markdown
/// document it was extracted from.
#[derive(Debug, Clone)]
pub struct Remapper<'b> {
    markdown: LineIndex,
    block_lines: LineIndex,
    line_offsets: &'b [LineOffset],
    fence: Position,
    /// Markdown offset just past the block text.
    text_end: usize,
    content_start_line: usize,
    prefix_lines: usize,
}

impl<'b> Remapper<'b> {
    /// Build a remapper for `block`, whose virtual file starts with
    /// `prefix_lines` directive lines.
    #[must_use]
    pub fn new(markdown: &str, block: &'b CodeBlock, prefix_lines: usize) -> Self {
        let markdown = LineIndex::new(markdown);
        let fence = markdown.position(block.fence_span.start);
        let block_lines = LineIndex::new(&block.text);
        let text_end = block
            .line_offsets
            .last()
            .zip(block_lines.line_start(block.line_offsets.len()))
            .map_or(block.fence_span.start, |(last, start)| {
                last.markdown_offset + block.text.len() - start
            });
        Self {
            markdown,
            block_lines,
            line_offsets: &block.line_offsets,
            fence,
            text_end,
            content_start_line: block.content_start_line,
            prefix_lines,
        }
    }

    /// Map a 1-based position in the virtual file to the Markdown document.
    ///
    /// Positions on directive lines map to the opening fence. Positions past
    /// the last content line keep the indentation of the last line.
    #[must_use]
    pub fn map_position(&self, position: Position) -> Position {
        if position.line <= self.prefix_lines {
            return self.fence;
        }
        let index = position.line - self.prefix_lines - 1;
        let stripped = self
            .line_offsets
            .get(index)
            .or_else(|| self.line_offsets.last())
            .map_or(0, |offset| offset.stripped);
        Position::new(
            self.content_start_line + index,
            position.column + stripped,
        )
    }

    /// Map a byte offset into the block's text to a byte offset into the
    /// Markdown document.
    #[must_use]
    pub fn map_offset(&self, offset: usize) -> usize {
        let Position { line, column } = self.block_lines.position(offset);
        self.line_offsets
            .get(line - 1)
            .map_or(self.text_end, |line_offset| {
                line_offset.markdown_offset + column - 1
            })
    }

    /// Map a byte offset into the block's text to a Markdown position.
    #[must_use]
    pub fn offset_position(&self, offset: usize) -> Position {
        self.markdown.position(self.map_offset(offset))
    }
}
