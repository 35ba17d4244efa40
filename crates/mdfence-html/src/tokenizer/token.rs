use mdfence_dom::Span;

/// A markup construct found by the tokenizer.
///
/// Only tags, comments and doctypes are tokens. Text is whatever lies between
/// two consecutive token spans; the tree builder slices it out of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name attributes>` or `<name attributes/>`.
    StartTag {
        /// The tag name, as written.
        name: String,
        /// Everything between the tag name and `>`, minus a trailing `/`.
        attributes: String,
        /// The tag ended with `/>`.
        self_closing: bool,
        /// Bytes from `<` to `>` inclusive.
        span: Span,
    },

    /// `</name>`.
    EndTag {
        /// The tag name, as written.
        name: String,
        /// Bytes from `<` to `>` inclusive.
        span: Span,
    },

    /// `<!--data-->`.
    Comment {
        /// Everything between `<!--` and `-->`.
        data: String,
        /// Bytes from `<` to `>` inclusive.
        span: Span,
    },

    /// `<!data>`, which covers `<!DOCTYPE html>` and other declarations.
    Doctype {
        /// Everything between `<!` and `>`.
        data: String,
        /// Bytes from `<` to `>` inclusive.
        span: Span,
    },
}

impl Token {
    /// Where the token sits in the input.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::StartTag { span, .. }
            | Self::EndTag { span, .. }
            | Self::Comment { span, .. }
            | Self::Doctype { span, .. } => *span,
        }
    }

    /// The tag name of a start or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => Some(name),
            Self::Comment { .. } | Self::Doctype { .. } => None,
        }
    }

    /// Returns true if this is a start tag token.
    #[must_use]
    pub const fn is_start_tag(&self) -> bool {
        matches!(self, Self::StartTag { .. })
    }

    /// Returns true if this is an end tag token.
    #[must_use]
    pub const fn is_end_tag(&self) -> bool {
        matches!(self, Self::EndTag { .. })
    }
}
