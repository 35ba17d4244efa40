//! Selector syntax tree and parser.
//!
//! The parser accepts most of [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//! syntax so that a selector can be inspected and reported on even when the
//! matcher cannot evaluate it.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use strum_macros::{Display, IntoStaticStr};

use crate::error::SelectError;

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `h1`, `my-element`
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    ///
    /// Example: `*`
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Example: `.highlight`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Example: `#main`
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[lang|=en]`, `[src$=".png"]`
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Name and parenthesised argument as written, without the colon.
    /// Examples: `hover`, `nth-child(2n+1)`
    PseudoClass(String),

    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Name as written, without the colons. Example: `before`
    PseudoElement(String),

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// Two or more simple selectors on the same element: `a.external[href]`.
    Compound(Vec<Selector>),

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Chains associate to the left: `a > b c` is `(a > b) c`.
    Complex {
        /// Everything before the combinator.
        left: Box<Selector>,
        /// How `right` relates to `left`.
        combinator: Combinator,
        /// The compound after the combinator; the subject of the selector.
        right: Box<Selector>,
    },

    /// [§ 4.4 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// Two or more comma-separated selectors.
    List(Vec<Selector>),
}

/// The kind of a [`Selector`], used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SelectorKind {
    /// [`Selector::Type`]
    Type,
    /// [`Selector::Universal`]
    Universal,
    /// [`Selector::Class`]
    Class,
    /// [`Selector::Id`]
    Id,
    /// [`Selector::Attribute`]
    Attribute,
    /// [`Selector::PseudoClass`]
    PseudoClass,
    /// [`Selector::PseudoElement`]
    PseudoElement,
    /// [`Selector::Compound`]
    Compound,
    /// [`Selector::Complex`]
    Complex,
    /// [`Selector::List`]
    List,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Combinator {
    /// `A B`: B is a descendant of A.
    #[strum(serialize = " ")]
    Descendant,
    /// `A > B`: B is a child of A.
    #[strum(serialize = " > ")]
    Child,
    /// `A + B`: B immediately follows A.
    #[strum(serialize = " + ")]
    NextSibling,
    /// `A ~ B`: B follows A.
    #[strum(serialize = " ~ ")]
    SubsequentSibling,
}

/// An attribute selector: a name and an optional value test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// The attribute name.
    pub name: String,
    /// The value test; `None` for a bare `[name]`.
    pub matcher: Option<AttributeMatcher>,
}

/// The value part of an attribute selector: `=value`, `~=value`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatcher {
    /// How the value is compared.
    pub operator: AttributeOperator,
    /// The value, unquoted.
    pub value: String,
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AttributeOperator {
    /// `[attr=val]`: exactly `val`.
    #[strum(serialize = "=")]
    Equals,
    /// `[attr~=val]`: a whitespace-separated list containing `val`.
    #[strum(serialize = "~=")]
    Includes,
    /// `[attr|=val]`: exactly `val` or starting with `val-`.
    #[strum(serialize = "|=")]
    DashMatch,
    /// `[attr^=val]`: starting with `val`.
    #[strum(serialize = "^=")]
    Prefix,
    /// `[attr$=val]`: ending with `val`.
    #[strum(serialize = "$=")]
    Suffix,
    /// `[attr*=val]`: containing `val`.
    #[strum(serialize = "*=")]
    Substring,
}

impl Selector {
    /// What kind of selector this is.
    #[must_use]
    pub const fn kind(&self) -> SelectorKind {
        match self {
            Self::Type(_) => SelectorKind::Type,
            Self::Universal => SelectorKind::Universal,
            Self::Class(_) => SelectorKind::Class,
            Self::Id(_) => SelectorKind::Id,
            Self::Attribute(_) => SelectorKind::Attribute,
            Self::PseudoClass(_) => SelectorKind::PseudoClass,
            Self::PseudoElement(_) => SelectorKind::PseudoElement,
            Self::Compound(_) => SelectorKind::Compound,
            Self::Complex { .. } => SelectorKind::Complex,
            Self::List(_) => SelectorKind::List,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Universal => f.write_str("*"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Attribute(attribute) => match &attribute.matcher {
                None => write!(f, "[{}]", attribute.name),
                Some(m) => write!(f, "[{}{}\"{}\"]", attribute.name, m.operator, m.value),
            },
            Self::PseudoClass(name) => write!(f, ":{name}"),
            Self::PseudoElement(name) => write!(f, "::{name}"),
            Self::Compound(parts) => parts.iter().try_for_each(|part| write!(f, "{part}")),
            Self::Complex {
                left,
                combinator,
                right,
            } => write!(f, "{left}{combinator}{right}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Parse selector text into a [`Selector`].
///
/// Supports type, universal, class, ID, attribute and pseudo selectors,
/// compounds, the four combinators and comma-separated lists. A single simple
/// selector parses to itself, not to a one-element compound.
///
/// # Errors
///
/// Returns [`SelectError::Syntax`] when `raw` is empty or malformed.
pub fn parse_selector(raw: &str) -> Result<Selector, SelectError> {
    SelectorParser::new(raw).parse()
}

/// Recursive-descent parser over a peekable character stream.
struct SelectorParser<'a> {
    raw: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> SelectorParser<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            chars: raw.char_indices().peekable(),
        }
    }

    fn parse(mut self) -> Result<Selector, SelectError> {
        let mut items = Vec::new();
        loop {
            let _ = self.skip_whitespace();
            items.push(self.parse_complex()?);
            let _ = self.skip_whitespace();
            match self.chars.next() {
                None => break,
                Some((_, ',')) => {}
                Some((_, c)) => return Err(self.error(format!("unexpected `{c}`"))),
            }
        }

        Ok(if items.len() == 1 {
            items.swap_remove(0)
        } else {
            Selector::List(items)
        })
    }

    /// compound (combinator compound)*
    fn parse_complex(&mut self) -> Result<Selector, SelectError> {
        let mut selector = self.parse_compound()?;

        while let Some(combinator) = self.parse_combinator() {
            let right = self.parse_compound()?;
            selector = Selector::Complex {
                left: Box::new(selector),
                combinator,
                right: Box::new(right),
            };
        }
        Ok(selector)
    }

    /// Consume a combinator and the whitespace around it. Whitespace alone is
    /// a descendant combinator only when another compound follows.
    fn parse_combinator(&mut self) -> Option<Combinator> {
        let had_whitespace = self.skip_whitespace();
        let combinator = match self.peek() {
            Some('>') => Combinator::Child,
            Some('+') => Combinator::NextSibling,
            Some('~') => Combinator::SubsequentSibling,
            Some(',') | None => return None,
            Some(_) if had_whitespace => return Some(Combinator::Descendant),
            Some(_) => return None,
        };
        let _ = self.chars.next();
        let _ = self.skip_whitespace();
        Some(combinator)
    }

    fn parse_compound(&mut self) -> Result<Selector, SelectError> {
        let mut parts = Vec::new();
        while let Some(part) = self.parse_simple()? {
            parts.push(part);
        }

        match parts.len() {
            0 => {
                let reason = match self.peek() {
                    Some(c) => format!("expected a selector, found `{c}`"),
                    None => "expected a selector".to_string(),
                };
                Err(self.error(reason))
            }
            1 => Ok(parts.swap_remove(0)),
            _ => Ok(Selector::Compound(parts)),
        }
    }

    /// One simple selector, or `None` at anything that cannot start one.
    fn parse_simple(&mut self) -> Result<Option<Selector>, SelectError> {
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let selector = match c {
            '*' => {
                let _ = self.chars.next();
                Selector::Universal
            }
            '.' => {
                let _ = self.chars.next();
                Selector::Class(self.expect_ident("class name")?)
            }
            '#' => {
                let _ = self.chars.next();
                Selector::Id(self.expect_ident("id")?)
            }
            '[' => {
                let _ = self.chars.next();
                Selector::Attribute(self.parse_attribute()?)
            }
            ':' => {
                let _ = self.chars.next();
                if self.peek() == Some(':') {
                    let _ = self.chars.next();
                    Selector::PseudoElement(self.expect_ident("pseudo-element name")?)
                } else {
                    let mut name = self.expect_ident("pseudo-class name")?;
                    if self.peek() == Some('(') {
                        name.push_str(&self.parse_parenthesized()?);
                    }
                    Selector::PseudoClass(name)
                }
            }
            c if is_ident_char(c) => Selector::Type(self.ident()),
            _ => return Ok(None),
        };
        Ok(Some(selector))
    }

    /// `[` already consumed: `name]` or `name op value]`.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectError> {
        let _ = self.skip_whitespace();
        let name = self.expect_ident("attribute name")?;
        let _ = self.skip_whitespace();

        let operator = match self.chars.next() {
            Some((_, ']')) => return Ok(AttributeSelector { name, matcher: None }),
            Some((_, '=')) => AttributeOperator::Equals,
            Some((_, c @ ('~' | '|' | '^' | '$' | '*'))) => {
                if self.chars.next().map(|(_, c)| c) != Some('=') {
                    return Err(self.error(format!("expected `=` after `{c}`")));
                }
                match c {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    _ => AttributeOperator::Substring,
                }
            }
            Some((_, c)) => return Err(self.error(format!("unexpected `{c}` in attribute selector"))),
            None => return Err(self.error("unterminated attribute selector")),
        };

        let _ = self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let _ = self.chars.next();
                self.quoted(quote)?
            }
            _ => self.expect_ident("attribute value")?,
        };
        let _ = self.skip_whitespace();

        if self.chars.next().map(|(_, c)| c) != Some(']') {
            return Err(self.error("expected `]`"));
        }
        Ok(AttributeSelector {
            name,
            matcher: Some(AttributeMatcher { operator, value }),
        })
    }

    /// A balanced `( ... )` group, returned with its parentheses.
    fn parse_parenthesized(&mut self) -> Result<String, SelectError> {
        let mut text = String::new();
        let mut depth = 0u32;
        for (_, c) in self.chars.by_ref() {
            text.push(c);
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(text);
                    }
                }
                _ => {}
            }
        }
        Err(self.error("unbalanced parentheses"))
    }

    /// The opening quote already consumed. `\` escapes the next character.
    fn quoted(&mut self, quote: char) -> Result<String, SelectError> {
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = self.chars.next() {
                        value.push(escaped);
                    }
                }
                c if c == quote => return Ok(value),
                c => value.push(c),
            }
        }
        Err(self.error("unterminated string"))
    }

    fn ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_char(c)) {
            ident.push(c);
            let _ = self.chars.next();
        }
        ident
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, SelectError> {
        let ident = self.ident();
        if ident.is_empty() {
            return Err(self.error(format!("expected {what}")));
        }
        Ok(ident)
    }

    /// Returns whether anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            let _ = self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn error(&self, reason: impl Into<String>) -> SelectError {
        SelectError::Syntax {
            selector: self.raw.to_string(),
            reason: reason.into(),
        }
    }
}
