use serde::Deserialize;

/// Which blocks to extract and which comments count as directives.
///
/// Deserializes from the `[extract]` table of the configuration file; missing
/// keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// Languages to extract, compared case-insensitively. Empty means every
    /// block, including blocks without a language.
    pub languages: Vec<String>,

    /// A comment before a block is a directive when its trimmed text starts
    /// with one of these.
    pub directive_prefixes: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            directive_prefixes: vec!["eslint".to_string(), "global".to_string()],
        }
    }
}

impl ExtractOptions {
    /// Whether a block tagged `lang` (already lower-cased) is extracted.
    #[must_use]
    pub fn wants(&self, lang: &str) -> bool {
        self.languages.is_empty()
            || self
                .languages
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(lang))
    }

    /// Whether comment text (trimmed) is a directive.
    #[must_use]
    pub fn is_directive(&self, comment: &str) -> bool {
        self.directive_prefixes
            .iter()
            .any(|prefix| comment.starts_with(prefix.as_str()))
    }
}
