//! mdfence CLI
//!
//! Inspect how embedded HTML is parsed, rendered and queried, and which
//! fenced code blocks a Markdown document contains.

mod config;
mod json;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use mdfence_common::LineIndex;
use mdfence_dom::{DomTree, NodeId};
use mdfence_html::{parse, parse_with_issues, print_tree, render};
use mdfence_markdown::{Remapper, extract_code_blocks};
use mdfence_select::{query_selector, query_selector_all};
use owo_colors::OwoColorize;

use config::{Config, DEFAULT_CONFIG_PATH};

/// mdfence: embedded HTML and fenced code block inspector
#[derive(Parser, Debug)]
#[command(name = "mdfence")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the parsed tree of a fragment
    mdfence tree --html '<svg><path d="0 0 0" /></svg>'

    # Check that a file survives a parse/render round trip
    mdfence render --check page.html

    # Find every <img> with its line and column
    mdfence query img --all page.html

    # List the js blocks of a README
    mdfence blocks README.md --lang js
"#)]
struct Cli {
    /// Configuration file [default: mdfence.toml, if present]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log builder decisions and parse warnings
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed tree
    Tree {
        #[command(flatten)]
        input: Input,

        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,

        /// Also print the problems the parser recovered from
        #[arg(long)]
        issues: bool,
    },

    /// Parse, then render back to markup
    Render {
        #[command(flatten)]
        input: Input,

        /// Fail if the output differs from the input
        #[arg(long)]
        check: bool,
    },

    /// Print the elements matching a selector
    Query {
        /// Type selector or `*`
        selector: String,

        #[command(flatten)]
        input: Input,

        /// Print every match, not just the first
        #[arg(long)]
        all: bool,
    },

    /// List the fenced code blocks of a Markdown file
    Blocks {
        /// Markdown file
        markdown: PathBuf,

        /// Only blocks in this language (repeatable; overrides the config)
        #[arg(long = "lang", value_name = "LANG")]
        languages: Vec<String>,

        /// Parse each block as HTML and print the matches of this selector
        #[arg(long, value_name = "SELECTOR")]
        query: Option<String>,
    },
}

/// Where the HTML comes from.
#[derive(Args, Debug)]
struct Input {
    /// Path to an HTML file
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,
}

impl Input {
    fn read(&self) -> Result<String> {
        if let Some(ref html) = self.html {
            Ok(html.clone())
        } else if let Some(ref path) = self.path {
            read_file(path)
        } else {
            bail!("No input: give a file path or --html")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path, true)?,
        None => Config::load_from_path(Path::new(DEFAULT_CONFIG_PATH), false)?,
    };

    match cli.command {
        Command::Tree {
            input,
            json,
            issues,
        } => tree(&input.read()?, json, issues),
        Command::Render { input, check } => render_input(&input.read()?, check),
        Command::Query {
            selector,
            input,
            all,
        } => query(&input.read()?, &selector, all),
        Command::Blocks {
            markdown,
            languages,
            query,
        } => {
            let mut options = config.extract;
            if !languages.is_empty() {
                options.languages = languages;
            }
            blocks(&markdown, &options, query.as_deref())
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Error reading '{}'", path.display()))
}

fn tree(html: &str, as_json: bool, show_issues: bool) -> Result<()> {
    let (tree, issues) = parse_with_issues(html);

    if as_json {
        let mut out = String::new();
        json::write_tree_json(&tree, NodeId::ROOT, show_issues.then_some(&issues[..]), &mut out)?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", format!("=== Tree ({} nodes) ===", tree.len()).bold());
    print_tree(&tree, NodeId::ROOT);

    if show_issues {
        let index = LineIndex::new(html);
        println!();
        println!("{}", format!("=== Issues ({}) ===", issues.len()).bold());
        for issue in &issues {
            println!(
                "{} {} {}",
                index.position(issue.span.start).cyan(),
                issue.kind.yellow(),
                issue.message
            );
        }
    }
    Ok(())
}

fn render_input(html: &str, check: bool) -> Result<()> {
    let rendered = render(&parse(html), NodeId::ROOT);
    if check {
        if rendered != html {
            let index = LineIndex::new(html);
            let first_difference = html
                .bytes()
                .zip(rendered.bytes())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| html.len().min(rendered.len()));
            bail!(
                "Rendered output differs from the input at {}",
                index.position(first_difference)
            );
        }
        println!("{}", "round trip ok".green());
        return Ok(());
    }
    print!("{rendered}");
    Ok(())
}

fn query(html: &str, selector: &str, all: bool) -> Result<()> {
    let tree = parse(html);
    let index = LineIndex::new(html);
    let matches = find(&tree, selector, all)?;
    if matches.is_empty() {
        log::info!("no element matches `{selector}`");
    }
    print_matches(&tree, &matches, |offset| index.position(offset).to_string());
    Ok(())
}

/// Every match with `all`, otherwise only the first, found with an early exit.
fn find(tree: &DomTree, selector: &str, all: bool) -> Result<Vec<NodeId>> {
    Ok(if all {
        query_selector_all(tree, NodeId::ROOT, selector)?
    } else {
        query_selector(tree, NodeId::ROOT, selector)?
            .into_iter()
            .collect()
    })
}

fn blocks(
    markdown_path: &Path,
    options: &mdfence_markdown::ExtractOptions,
    selector: Option<&str>,
) -> Result<()> {
    let markdown = read_file(markdown_path)?;
    let blocks = extract_code_blocks(&markdown, options);

    for block in &blocks {
        let lang = if block.lang.is_empty() { "-" } else { &block.lang };
        println!(
            "{} {} {}",
            block.index.to_string().bold(),
            lang.cyan(),
            format!("line {}", block.fence_line()).dimmed(),
        );
        for directive in &block.directives {
            println!("  {} {directive}", "directive".yellow());
        }

        let Some(selector) = selector else {
            for line in block.text.lines() {
                println!("  | {line}");
            }
            continue;
        };

        let tree = parse(&block.text);
        let matches = query_selector_all(&tree, NodeId::ROOT, selector)?;
        let remapper = Remapper::new(&markdown, block, 0);
        print_matches(&tree, &matches, |offset| {
            format!("{}:{}", markdown_path.display(), remapper.offset_position(offset))
        });
    }
    Ok(())
}

fn print_matches(tree: &DomTree, matches: &[NodeId], locate: impl Fn(usize) -> String) {
    for &id in matches {
        let start = tree.location(id).unwrap_or_default().open.start;
        println!("{}  {}", locate(start).cyan(), render(tree, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_lang_is_repeatable() {
        let cli = Cli::try_parse_from(["mdfence", "blocks", "README.md", "--lang", "js", "--lang", "html"])
            .expect("valid arguments");
        let Command::Blocks { languages, .. } = cli.command else {
            panic!("expected blocks");
        };
        assert_eq!(languages, ["js", "html"]);
    }

    #[test]
    fn test_find_first_or_all() {
        let tree = parse("<ul><li>a</li><li>b</li></ul>");
        let first = find(&tree, "li", false).expect("supported");
        assert_eq!(first.len(), 1);
        assert_eq!(tree.text_content(first[0]), "a");
        assert_eq!(find(&tree, "li", true).expect("supported").len(), 2);
        assert!(find(&tree, "p", false).expect("supported").is_empty());
        assert!(find(&tree, ".x", false).is_err());
    }

    #[test]
    fn test_path_and_html_conflict() {
        assert!(Cli::try_parse_from(["mdfence", "tree", "a.html", "--html", "<p>"]).is_err());
    }
}
