//! Fenced code block extraction.
//!
//! A line-oriented scan, not a Markdown parser: it recognises fences and the
//! HTML comments directly above them, and nothing else. Blocks inside block
//! quotes are not found.

use std::sync::LazyLock;

use mdfence_dom::{NodeId, NodeType, Span, descendants};
use regex::Regex;

use crate::options::ExtractOptions;

/// Indentation, then a run of three or more backticks or tildes, then the
/// info string.
static OPEN_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)(`{3,}|~{3,})(.*)$").expect("Invalid fence regex"));

/// A fence run with nothing but whitespace after it.
static CLOSE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *(`{3,}|~{3,})[ \t]*$").expect("Invalid fence regex"));

/// Where one line of block content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOffset {
    /// Byte offset in the Markdown document of the first byte kept from the
    /// line, after indentation was stripped.
    pub markdown_offset: usize,
    /// Number of leading spaces removed from the line.
    pub stripped: usize,
}

/// A fenced code block found in a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Position among the extracted blocks, from 0.
    pub index: usize,
    /// First word of the info string, lower-cased. Empty when there is none.
    pub lang: String,
    /// The whole info string, trimmed.
    pub info: String,
    /// The content, with fence indentation removed from every line.
    pub text: String,
    /// From the first fence character to the end of the closing fence, or to
    /// the end of the document for an unclosed block.
    pub fence_span: Span,
    /// 1-based Markdown line of the first content line.
    pub content_start_line: usize,
    /// One entry per content line.
    pub line_offsets: Vec<LineOffset>,
    /// Directive comments above the block, trimmed, in document order.
    pub directives: Vec<String>,
}

impl CodeBlock {
    /// 1-based Markdown line of the opening fence.
    #[must_use]
    pub const fn fence_line(&self) -> usize {
        self.content_start_line - 1
    }
}

/// A line of the document, without its line ending.
struct Line<'a> {
    start: usize,
    text: &'a str,
    /// Including the line ending.
    full: &'a str,
}

fn split_lines(markdown: &str) -> Vec<Line<'_>> {
    let mut start = 0;
    markdown
        .split_inclusive('\n')
        .map(|full| {
            let line = Line {
                start,
                text: full.trim_end_matches(['\n', '\r']),
                full,
            };
            start += full.len();
            line
        })
        .collect()
}

struct OpenFence {
    marker: char,
    len: usize,
    indent: usize,
    info: String,
    /// Byte offset of the first fence character.
    start: usize,
}

fn open_fence(line: &Line<'_>) -> Option<OpenFence> {
    let captures = OPEN_FENCE.captures(line.text)?;
    let indent = captures.get(1)?.as_str().len();
    let run = captures.get(2)?.as_str();
    let info = captures.get(3).map_or("", |m| m.as_str()).trim();
    let marker = run.chars().next()?;

    // An info string after backticks may not contain backticks; otherwise
    // "```foo```" inline code would open a block.
    if marker == '`' && info.contains('`') {
        return None;
    }

    Some(OpenFence {
        marker,
        len: run.len(),
        indent,
        info: info.to_string(),
        start: line.start + indent,
    })
}

fn closes(fence: &OpenFence, line: &Line<'_>) -> bool {
    CLOSE_FENCE
        .captures(line.text)
        .and_then(|captures| captures.get(1))
        .is_some_and(|run| {
            let run = run.as_str();
            run.starts_with(fence.marker) && run.len() >= fence.len
        })
}

/// Find the fenced code blocks of `markdown` that `options` asks for, in
/// document order.
#[must_use]
pub fn extract_code_blocks(markdown: &str, options: &ExtractOptions) -> Vec<CodeBlock> {
    let lines = split_lines(markdown);
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(fence) = open_fence(&lines[i]) else {
            i += 1;
            continue;
        };

        let content = i + 1;
        let close = (content..lines.len())
            .find(|&j| closes(&fence, &lines[j]))
            .unwrap_or(lines.len());
        let end = lines
            .get(close)
            .map_or(markdown.len(), |line| line.start + line.text.len());
        if close == lines.len() {
            log::debug!("unclosed fence on line {} runs to end of document", i + 1);
        }

        let lang = fence
            .info
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        if options.wants(&lang) {
            let mut text = String::new();
            let mut line_offsets = Vec::new();
            for line in &lines[content..close] {
                let stripped = line
                    .full
                    .bytes()
                    .take(fence.indent)
                    .take_while(|&b| b == b' ')
                    .count();
                line_offsets.push(LineOffset {
                    markdown_offset: line.start + stripped,
                    stripped,
                });
                text.push_str(&line.full[stripped..]);
            }

            blocks.push(CodeBlock {
                index: blocks.len(),
                lang,
                info: fence.info,
                text,
                fence_span: Span::new(fence.start, end),
                content_start_line: content + 1,
                line_offsets,
                directives: directives_before(markdown, &lines[..i], options),
            });
        }

        i = close + 1;
    }

    blocks
}

/// Directive comments in the lines directly above a fence. Blank lines may
/// separate the comments from each other and from the fence; anything else
/// ends the search.
fn directives_before(markdown: &str, above: &[Line<'_>], options: &ExtractOptions) -> Vec<String> {
    let Some(fence_start) = above.last().map(|line| line.start + line.full.len()) else {
        return Vec::new();
    };

    let mut region_start = None;
    let mut k = above.len();
    while k > 0 {
        let line = &above[k - 1];
        let trimmed = line.text.trim();
        if trimmed.is_empty() {
            k -= 1;
            continue;
        }
        if !trimmed.ends_with("-->") {
            break;
        }

        // The comment may span lines: back up to the line it opens on.
        let line_end = line.start + line.text.len();
        let Some(open) = markdown[..line_end].rfind("<!--") else {
            break;
        };
        let open_line = above[..k].partition_point(|l| l.start <= open) - 1;
        if !above[open_line].text.trim_start().starts_with("<!--") {
            break;
        }
        region_start = Some(above[open_line].start);
        k = open_line;
    }

    let Some(region_start) = region_start else {
        return Vec::new();
    };

    let tree = mdfence_html::parse(&markdown[region_start..fence_start]);
    descendants(&tree, NodeId::ROOT)
        .filter_map(|id| match &tree.get(id)?.node_type {
            NodeType::Comment(data) => Some(data.trim()),
            _ => None,
        })
        .filter(|comment| options.is_directive(comment))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_offsets() {
        let lines = split_lines("a\r\nbc\n\nd");
        let starts: Vec<_> = lines.iter().map(|l| l.start).collect();
        let texts: Vec<_> = lines.iter().map(|l| l.text).collect();
        assert_eq!(starts, [0, 3, 6, 7]);
        assert_eq!(texts, ["a", "bc", "", "d"]);
    }

    #[test]
    fn test_open_fence() {
        let line = Line {
            start: 10,
            text: "  ~~~~ JS title=\"x\" ",
            full: "  ~~~~ JS title=\"x\" \n",
        };
        let fence = open_fence(&line).expect("fence");
        assert_eq!(fence.marker, '~');
        assert_eq!(fence.len, 4);
        assert_eq!(fence.indent, 2);
        assert_eq!(fence.info, "JS title=\"x\"");
        assert_eq!(fence.start, 12);
    }

    #[test]
    fn test_backtick_info_may_not_contain_backtick() {
        let line = Line {
            start: 0,
            text: "```js`",
            full: "```js`",
        };
        assert!(open_fence(&line).is_none());
    }

    #[test]
    fn test_closing_fence_rules() {
        let fence = OpenFence {
            marker: '`',
            len: 4,
            indent: 0,
            info: String::new(),
            start: 0,
        };
        let line = |text| Line {
            start: 0,
            text,
            full: text,
        };
        assert!(closes(&fence, &line("````")));
        assert!(closes(&fence, &line("   `````  ")));
        assert!(!closes(&fence, &line("```")));
        assert!(!closes(&fence, &line("~~~~")));
        assert!(!closes(&fence, &line("```` js")));
    }
}
