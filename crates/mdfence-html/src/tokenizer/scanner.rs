use std::sync::LazyLock;

use mdfence_dom::Span;
use regex::{Captures, Regex};
use strum_macros::Display;

use super::token::Token;
use crate::elements::is_raw_text_element;

/// One composite pattern for every construct the tokenizer recognises, tried
/// in this order at each position:
///
/// 1. `<!--data-->` (data may span lines)
/// 2. `<!data>`
/// 3. `<name attrs>`, `</name>` and `<name attrs/>`, where quoted attribute
///    values may contain `>`
///
/// The `regex` crate matches in linear time, so there is no pathological input.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--(.*?)-->|<!([^>]*)>|<(/?)([A-Za-z][A-Za-z0-9:._\-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#,
    )
    .expect("Invalid tag regex")
});

/// The tokenizer state machine.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Scanning for the next tag, comment or doctype.
    Data,
    /// Inside a raw text element (`script`, `style`). Nothing is a token
    /// until the end tag with this exact name.
    RawText(String),
}

/// Regex-driven tokenizer over a borrowed input.
///
/// A single cursor moves forward through the input, one token at a time. The
/// tokenizer never fails: input that matches nothing is left for the tree
/// builder to treat as text.
pub struct HTMLTokenizer<'a> {
    state: TokenizerState,
    input: &'a str,
    current_pos: usize,
    token_stream: Vec<Token>,
}

impl<'a> HTMLTokenizer<'a> {
    /// Create a tokenizer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            state: TokenizerState::Data,
            input,
            current_pos: 0,
            token_stream: Vec::new(),
        }
    }

    /// Tokenize the rest of the input into the internal token stream.
    pub fn run(&mut self) {
        while let Some(token) = self.next_token() {
            self.token_stream.push(token);
        }
    }

    /// Tokens collected by [`run`](Self::run).
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.token_stream
    }

    /// Consume the tokenizer, returning the tokens collected by [`run`](Self::run).
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// The input being tokenized.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &TokenizerState {
        &self.state
    }

    /// Produce the next token, or `None` once the input holds no more.
    pub fn next_token(&mut self) -> Option<Token> {
        match std::mem::replace(&mut self.state, TokenizerState::Data) {
            TokenizerState::Data => self.scan_data(),
            TokenizerState::RawText(name) => self.scan_raw_text(&name),
        }
    }

    fn scan_data(&mut self) -> Option<Token> {
        let captures = TAG_PATTERN.captures_at(self.input, self.current_pos)?;
        let whole = captures.get(0)?;
        let span = Span::new(whole.start(), whole.end());
        self.current_pos = whole.end();

        if let Some(data) = captures.get(1) {
            return Some(Token::Comment {
                data: data.as_str().to_string(),
                span,
            });
        }
        if let Some(data) = captures.get(2) {
            return Some(Token::Doctype {
                data: data.as_str().to_string(),
                span,
            });
        }
        Some(self.tag_token(&captures, span))
    }

    fn tag_token(&mut self, captures: &Captures<'_>, span: Span) -> Token {
        let group = |i| captures.get(i).map_or("", |m| m.as_str());
        let name = group(4).to_string();

        if !group(3).is_empty() {
            return Token::EndTag { name, span };
        }

        let (attributes, self_closing) = split_self_closing(group(5));
        if !self_closing && is_raw_text_element(&name) {
            log::trace!("entering raw text for <{name}> at {}", span.end);
            self.state = TokenizerState::RawText(name.clone());
        }

        Token::StartTag {
            name,
            attributes: attributes.to_string(),
            self_closing,
            span,
        }
    }

    /// Find the end tag of the raw text element `name`: `</name`, optional
    /// ASCII whitespace, then `>`. The name must match exactly.
    ///
    /// Without one, the rest of the input is the element's text.
    fn scan_raw_text(&mut self, name: &str) -> Option<Token> {
        let needle = format!("</{name}");
        let mut from = self.current_pos;

        while let Some(found) = self.input.get(from..).and_then(|rest| rest.find(&needle)) {
            let start = from + found;
            let after_name = start + needle.len();
            let rest = &self.input[after_name..];
            let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());

            if trimmed.starts_with('>') {
                let end = after_name + (rest.len() - trimmed.len()) + 1;
                self.current_pos = end;
                return Some(Token::EndTag {
                    name: name.to_string(),
                    span: Span::new(start, end),
                });
            }
            from = after_name;
        }

        log::trace!("raw text element <{name}> runs to end of input");
        self.current_pos = self.input.len();
        None
    }
}

impl Iterator for HTMLTokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Strip a trailing `/` (self-closing syntax) from a raw attribute string.
fn split_self_closing(raw: &str) -> (&str, bool) {
    raw.trim_end()
        .strip_suffix('/')
        .map_or((raw, false), |attributes| (attributes, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_self_closing() {
        assert_eq!(split_self_closing(r#" d="0" /"#), (r#" d="0" "#, true));
        assert_eq!(split_self_closing("/"), ("", true));
        assert_eq!(split_self_closing(r#" href="a/b""#), (r#" href="a/b""#, false));
        assert_eq!(split_self_closing(""), ("", false));
    }

    #[test]
    fn test_state_returns_to_data_after_raw_text() {
        let mut tokenizer = HTMLTokenizer::new("<style>a > b {}</style><p>");
        assert!(matches!(tokenizer.next_token(), Some(Token::StartTag { .. })));
        assert_eq!(
            tokenizer.state(),
            &TokenizerState::RawText("style".to_string())
        );
        assert!(matches!(tokenizer.next_token(), Some(Token::EndTag { .. })));
        assert_eq!(tokenizer.state(), &TokenizerState::Data);
        assert_eq!(
            tokenizer.next_token().as_ref().and_then(Token::tag_name),
            Some("p")
        );
        assert_eq!(tokenizer.next_token(), None);
    }
}
