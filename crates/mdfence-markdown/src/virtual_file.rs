use crate::extract::CodeBlock;

/// How directives are written at the top of a virtual file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* directive */`
    Block,
    /// The prefix, a space, then the directive: `// directive`, `# directive`.
    Line(String),
    /// `<!-- directive -->`
    Html,
}

impl CommentStyle {
    fn comment(&self, directive: &str) -> String {
        match self {
            Self::Block => format!("/* {directive} */"),
            Self::Line(prefix) => format!("{prefix} {directive}"),
            Self::Html => format!("<!-- {directive} -->"),
        }
    }
}

/// A code block presented as a file of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    /// `<index>.<lang>`, or just `<index>` for a block without a language.
    pub filename: String,
    /// Directive lines followed by the block text.
    pub text: String,
    /// Number of directive lines before the block text.
    pub prefix_lines: usize,
    /// Byte length of the directive lines, newlines included.
    pub prefix_len: usize,
}

impl VirtualFile {
    /// Convert an offset into [`text`](Self::text) to an offset into the
    /// block's own text. `None` for offsets inside the directive lines.
    #[must_use]
    pub fn block_offset(&self, offset: usize) -> Option<usize> {
        offset.checked_sub(self.prefix_len)
    }
}

impl CodeBlock {
    /// The block as a virtual file, with one comment line per directive.
    #[must_use]
    pub fn virtual_file(&self, style: &CommentStyle) -> VirtualFile {
        let mut text = String::new();
        for directive in &self.directives {
            text.push_str(&style.comment(directive));
            text.push('\n');
        }
        let prefix_len = text.len();
        text.push_str(&self.text);

        let filename = if self.lang.is_empty() {
            self.index.to_string()
        } else {
            format!("{}.{}", self.index, self.lang)
        };

        VirtualFile {
            filename,
            text,
            prefix_lines: self.directives.len(),
            prefix_len,
        }
    }
}
