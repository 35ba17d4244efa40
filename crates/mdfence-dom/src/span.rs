//! Source locations.

/// Byte span into the parsed source text.
///
/// Invariant: `start <= end`, and both lie on UTF-8 boundaries of the text the
/// tree was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// The slice of `source` this span covers, if it is in bounds.
    #[must_use]
    pub fn slice(self, source: &str) -> Option<&str> {
        source.get(self.start..self.end)
    }
}

/// Where a node came from: an opening span and a closing span.
///
/// For elements, `open` is the start tag and `close` the end tag. Self-closing,
/// void and never-closed elements have `close == open`. Leaves (text, comments,
/// doctypes) carry their own span in both slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Span of the start tag (or of the whole leaf).
    pub open: Span,
    /// Span of the end tag (or a copy of `open`).
    pub close: Span,
}

impl Location {
    /// Location of a leaf node, or of an element not closed yet.
    #[must_use]
    pub const fn leaf(span: Span) -> Self {
        Self {
            open: span,
            close: span,
        }
    }

    /// The full source extent, from the start of `open` to the end of `close`.
    #[must_use]
    pub const fn outer(self) -> Span {
        Span {
            start: self.open.start,
            end: self.close.end,
        }
    }

    /// The bytes between the end of `open` and the start of `close`.
    #[must_use]
    pub const fn inner(self) -> Span {
        if self.close.start < self.open.end {
            Span {
                start: self.open.end,
                end: self.open.end,
            }
        } else {
            Span {
                start: self.open.end,
                end: self.close.start,
            }
        }
    }
}
