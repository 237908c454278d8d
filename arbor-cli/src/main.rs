//! Arbor CLI
//!
//! Inspect, query and rewrite HTML from the terminal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arbor_css::ParsedSelector;
use arbor_dom::{DomTree, NodeId};
use arbor_html::{HtmlParser, ParseIssue, format_tree};
use arbor_pipeline::HtmlPipeline;
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;

/// Arbor: parse, query and rewrite HTML without a browser
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the DOM tree of a file
    arbor tree ./index.html

    # Print every element matching a selector
    arbor match 'ul > li.active' --html '<ul><li class="active">x</li></ul>'

    # Rewrite a document through a pipeline configuration
    arbor render --pipeline strip.json ./index.html
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed DOM tree and any parse issues
    Tree {
        #[command(flatten)]
        input: Input,
    },

    /// Print the serialized document, optionally rewritten by a pipeline
    Render {
        /// JSON list of `{ "processor": ..., "params": ... }` entries
        #[arg(short, long, value_name = "CONFIG")]
        pipeline: Option<PathBuf>,

        #[command(flatten)]
        input: Input,
    },

    /// Print every element matching a selector
    Match {
        /// Selector to evaluate against each element
        selector: ParsedSelector,

        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args, Debug)]
struct Input {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,
}

impl Input {
    fn read(&self) -> Result<String> {
        match (&self.html, &self.path) {
            (Some(html), _) => Ok(html.clone()),
            (None, Some(path)) => read_file(path),
            (None, None) => bail!("expected a FILE or --html"),
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tree { input } => print_document(&input.read()?),
        Command::Render { pipeline, input } => render(&input.read()?, pipeline.as_deref()),
        Command::Match { selector, input } => print_matches(&input.read()?, &selector),
    }
}

fn print_document(html: &str) -> Result<()> {
    let mut parser = HtmlParser::new();
    let tree = parser.parse(html).context("failed to parse input")?;

    println!("{}", "=== DOM Tree ===".bold());
    print!("{}", format_tree(&tree, tree.root()));
    print_issues(parser.issues());
    Ok(())
}

fn render(html: &str, config: Option<&Path>) -> Result<()> {
    let mut pipeline = match config {
        Some(path) => HtmlPipeline::from_json(&read_file(path)?)
            .with_context(|| format!("invalid pipeline '{}'", path.display()))?,
        None => HtmlPipeline::new(),
    };
    let output = pipeline.process(html).context("pipeline failed")?;
    println!("{output}");
    Ok(())
}

fn print_matches(html: &str, selector: &ParsedSelector) -> Result<()> {
    let tree = arbor_html::parse(html).context("failed to parse input")?;

    let mut matches = Vec::new();
    for id in elements(&tree) {
        if selector.matches_in_tree(&tree, id)? {
            matches.push(id);
        }
    }

    println!(
        "{}",
        format!("=== {} match(es) for {selector} ===", matches.len()).bold()
    );
    for id in matches {
        println!("{}", tree.outer_html(id));
    }
    Ok(())
}

/// Every element of the tree in document order.
fn elements(tree: &DomTree) -> Vec<NodeId> {
    fn walk(tree: &DomTree, id: NodeId, out: &mut Vec<NodeId>) {
        if tree.as_element(id).is_some() {
            out.push(id);
        }
        for &child in tree.children(id) {
            walk(tree, child, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, tree.root(), &mut out);
    out
}

fn print_issues(issues: &[ParseIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("\n{}", "=== Parse Issues ===".bold());
    for issue in issues {
        println!("  - {} {}", format!("[{}]", issue.index).dimmed(), issue.message);
    }
}
