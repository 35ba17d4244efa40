//! Property tests: the parser is total and well-formed markup round-trips.

use mdfence_dom::{NodeId, descendants};
use mdfence_html::{parse, parse_with_issues, render};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Markup-heavy alphabet so that random strings actually contain tags.
fn markupish(seed: &[u8]) -> String {
    const PIECES: &[&str] = &[
        "<", ">", "/", "</", "<!--", "-->", "<!", "=", "\"", "'", " ", "\n", "a", "b", "p",
        "div", "br", "svg", "path", "script", "style", "<p>", "</p>", "<div>", "</div>",
        "<br>", "<svg>", "</svg>", "<script>", "</script>", "x=\"1\"", "é", "&",
    ];
    seed.iter()
        .map(|&b| PIECES[usize::from(b) % PIECES.len()])
        .collect()
}

/// Well-formed markup driven by `seed`: every opened tag is closed, void
/// elements use ` />`, and text never contains `<`.
fn well_formed(seed: &[u8]) -> String {
    const TAGS: &[&str] = &["div", "p", "span", "b", "my-el"];
    let mut out = String::new();
    let mut open: Vec<&str> = Vec::new();

    for &b in seed {
        match b % 5 {
            0 => {
                let tag = TAGS[usize::from(b / 5) % TAGS.len()];
                out.push('<');
                out.push_str(tag);
                if b % 2 == 0 {
                    out.push_str(" class=\"c\"");
                }
                out.push('>');
                open.push(tag);
            }
            1 => {
                if let Some(tag) = open.pop() {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
            2 => out.push_str("text & more"),
            3 => out.push_str("<br />"),
            _ => out.push_str("<!-- note -->"),
        }
    }
    while let Some(tag) = open.pop() {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
    out
}

#[quickcheck]
fn parse_never_panics(input: String) -> bool {
    let tree = parse(&input);
    !tree.is_empty()
}

#[quickcheck]
fn parse_never_panics_on_markup(seed: Vec<u8>) -> bool {
    let input = markupish(&seed);
    let (tree, _issues) = parse_with_issues(&input);
    descendants(&tree, NodeId::ROOT).count() == tree.len()
}

#[quickcheck]
fn text_without_tags_round_trips(input: String) -> TestResult {
    if input.contains('<') {
        return TestResult::discard();
    }
    TestResult::from_bool(render(&parse(&input), NodeId::ROOT) == input)
}

#[quickcheck]
fn well_formed_markup_round_trips(seed: Vec<u8>) -> bool {
    let input = well_formed(&seed);
    let (tree, issues) = parse_with_issues(&input);
    issues.is_empty() && render(&tree, NodeId::ROOT) == input
}

#[quickcheck]
fn spans_lie_on_char_boundaries(seed: Vec<u8>) -> bool {
    let input = markupish(&seed);
    let tree = parse(&input);
    descendants(&tree, NodeId::ROOT).all(|id| {
        tree.location(id).is_some_and(|location| {
            location.open.slice(&input).is_some() && location.close.slice(&input).is_some()
        })
    })
}
