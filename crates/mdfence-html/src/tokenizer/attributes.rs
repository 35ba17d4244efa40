use mdfence_dom::AttributesMap;
use strum_macros::Display;

/// States of the attribute splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum SplitState {
    /// Between attributes.
    Idle,
    /// Inside an attribute name.
    Key,
    /// After `=`, before or inside the value.
    Value,
}

/// Characters allowed in attribute names. Wider than HTML on purpose, so that
/// framework syntax like `@click`, `:value` and `v-on:input` survives.
const fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | ':' | '-' | '_')
}

/// Split the raw attribute text of a start tag into an ordered map.
///
/// Best effort, never fails:
/// - names are runs of letters, digits and `@ . : - _`; anything else ends one
/// - `name=value`, `name="value"` and `name='value'` all work, with optional
///   whitespace around `=`
/// - a quote preceded by `\` does not close a quoted value
/// - a name without `=` gets the empty string
/// - an unterminated quoted value runs to the end of the input
/// - a repeated name overwrites the earlier value
///
/// Values are stored as written: no entity decoding, no unescaping.
#[must_use]
pub fn split_attributes(raw: &str) -> AttributesMap {
    let mut attrs = AttributesMap::new();
    let mut state = SplitState::Idle;
    let mut key = String::new();
    let mut value = String::new();
    // A finished name still waiting to learn whether a value follows.
    let mut pending: Option<String> = None;
    let mut quote: Option<char> = None;
    let mut value_started = false;
    let mut previous: Option<char> = None;

    for c in raw.chars() {
        match state {
            SplitState::Key => {
                if is_key_char(c) {
                    key.push(c);
                } else {
                    // The key ends here; `c` is either `=` or a separator.
                    pending = Some(std::mem::take(&mut key));
                    state = if c == '=' {
                        value_started = false;
                        quote = None;
                        SplitState::Value
                    } else {
                        SplitState::Idle
                    };
                }
            }
            SplitState::Idle => {
                if is_key_char(c) {
                    if let Some(bare) = pending.take() {
                        let _ = attrs.insert(bare, String::new());
                    }
                    key.push(c);
                    state = SplitState::Key;
                } else if c == '=' && pending.is_some() {
                    state = SplitState::Value;
                    value_started = false;
                    quote = None;
                }
            }
            SplitState::Value => match quote {
                Some(q) => {
                    if c == q && previous != Some('\\') {
                        finish_value(&mut attrs, &mut pending, &mut value);
                        state = SplitState::Idle;
                    } else {
                        value.push(c);
                    }
                }
                None if !value_started => {
                    if c == '"' || c == '\'' {
                        quote = Some(c);
                        value_started = true;
                    } else if !c.is_whitespace() {
                        value.push(c);
                        value_started = true;
                    }
                }
                None => {
                    if c.is_whitespace() {
                        finish_value(&mut attrs, &mut pending, &mut value);
                        state = SplitState::Idle;
                    } else {
                        value.push(c);
                    }
                }
            },
        }
        previous = Some(c);
    }

    match state {
        SplitState::Key => {
            let _ = attrs.insert(key, String::new());
        }
        SplitState::Value => finish_value(&mut attrs, &mut pending, &mut value),
        SplitState::Idle => {
            if let Some(bare) = pending {
                let _ = attrs.insert(bare, String::new());
            }
        }
    }

    attrs
}

fn finish_value(attrs: &mut AttributesMap, pending: &mut Option<String>, value: &mut String) {
    if let Some(name) = pending.take() {
        let _ = attrs.insert(name, std::mem::take(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &str) -> Vec<(String, String)> {
        split_attributes(raw).into_iter().collect()
    }

    fn owned(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_quoted_values_keep_order() {
        assert_eq!(
            pairs(r#" href="https://x" title='y'"#),
            owned(&[("href", "https://x"), ("title", "y")])
        );
    }

    #[test]
    fn test_unquoted_and_bare() {
        assert_eq!(
            pairs(" type=checkbox checked disabled"),
            owned(&[("type", "checkbox"), ("checked", ""), ("disabled", "")])
        );
    }

    #[test]
    fn test_spaces_around_equals() {
        assert_eq!(pairs(r#" a = "1"  b= 2"#), owned(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        assert_eq!(
            pairs(r#" data-x="say \"hi\"""#),
            owned(&[("data-x", r#"say \"hi\""#)])
        );
    }

    #[test]
    fn test_framework_names() {
        assert_eq!(
            pairs(r#" @click="go" :value="v" v-on:input="f""#),
            owned(&[("@click", "go"), (":value", "v"), ("v-on:input", "f")])
        );
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        assert_eq!(
            pairs(r#" a="1" b="2" a="3""#),
            owned(&[("a", "3"), ("b", "2")])
        );
    }

    #[test]
    fn test_unterminated_quote_takes_rest() {
        assert_eq!(pairs(r#" alt="broken"#), owned(&[("alt", "broken")]));
    }

    #[test]
    fn test_stray_characters_are_skipped() {
        assert_eq!(pairs(r#" = "x" ok"#), owned(&[("x", ""), ("ok", "")]));
        assert!(split_attributes("").is_empty());
    }

    #[test]
    fn test_empty_quoted_value() {
        assert_eq!(pairs(r#" alt="""#), owned(&[("alt", "")]));
    }

    #[test]
    fn test_key_ends_at_separator_or_equals() {
        assert_eq!(
            pairs(r#"a=1 b/c="x"d"#),
            owned(&[("a", "1"), ("b", ""), ("c", "x"), ("d", "")])
        );
        assert_eq!(pairs("lang"), owned(&[("lang", "")]));
    }
}
