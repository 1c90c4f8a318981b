//! Two-pass tokenization of a small Markdown subset.
//!
//! The first pass splits raw text into block and inline markers; the second
//! groups marker tokens into emphasis, links, images and headings.
//!
//! ```text
//! cargo run --example markdown -- README.md
//! cargo run --example markdown -- --dot
//! RUST_LOG=trielex=trace cargo run --example markdown
//! ```

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use trielex::error::PipelineError;
use trielex::lexeme::{Attribute, LexemeDef, Pattern};
use trielex::pipeline::{Chunk, Stage, Tokenizer, TokenizerConfig};
use trielex::token::{Token, Value};

const SAMPLE: &str = "# Trielex
A _lexer generator_ for **multi-pass** tokenization.
See the [docs](https://docs.rs/trielex) or the ![logo](logo.png).
---
* compiled \\_tries\\_
* shared prefixes
> quoted text
";

fn marker(kind: &str, literal: &str) -> LexemeDef {
    LexemeDef::new(kind, Pattern::literal(literal)).full_match(Attribute::constant(Value::None))
}

fn escape(literal: &str) -> LexemeDef {
    LexemeDef::new("text", Pattern::literal(literal))
}

fn marker_pass() -> Result<Tokenizer, PipelineError> {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_lexicon_special_chars());
    tokenizer.set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))?;
    tokenizer.add_lexemes([
        marker("image-open", "!["),
        marker("open-bracket", "["),
        marker("close-bracket", "]"),
        marker("open-paren", "("),
        marker("close-paren", ")"),
        marker("em", "_"),
        marker("strong", "__"),
        marker("strong", "**"),
        marker("h1-open", "\n# "),
        marker("h2-open", "\n## "),
        marker("h3-open", "\n### "),
        marker("quote-open", "\n> "),
        marker("ul", "\n* "),
        marker("ul", "\n- "),
        marker("hr", "\n---"),
        marker("newline", "\n"),
        escape("\\_"),
        escape("\\*"),
        escape("\\["),
        escape("\\]"),
    ])?;
    Ok(tokenizer)
}

fn grouping_pass() -> Result<Tokenizer, PipelineError> {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::token());
    tokenizer.set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))?;
    tokenizer.add_lexemes([
        LexemeDef::new("em-text", Pattern::notation("em, !em+, em")?).full_match(Attribute::Concat),
        LexemeDef::new("strong-text", Pattern::notation("strong, !strong+, strong")?)
            .full_match(Attribute::Concat),
        LexemeDef::new(
            "link",
            Pattern::notation(
                "open-bracket, !close-bracket+, close-bracket, open-paren, !close-paren+, close-paren",
            )?,
        )
        .full_match(Attribute::Collect),
        LexemeDef::new(
            "image",
            Pattern::notation(
                "image-open, !close-bracket+, close-bracket, open-paren, !close-paren+, close-paren",
            )?,
        )
        .full_match(Attribute::Collect),
        LexemeDef::new("heading", Pattern::notation("h1-open | h2-open | h3-open")?)
            .full_match(Attribute::Input),
    ])?;
    Ok(tokenizer)
}

/// The text of a link or image and its target, from the collected match
fn link_parts(token: &Token) -> Option<(String, String)> {
    let items = token.value().as_list()?;
    let close = items
        .iter()
        .position(|item| item.as_token().is_some_and(|t| t.kind() == "close-bracket"))?;
    let label = items.get(1..close)?.iter().map(|v| v.to_text().to_string()).collect();
    let target = items
        .get(close + 2..items.len().saturating_sub(1))?
        .iter()
        .map(|v| v.to_text().to_string())
        .collect();
    Some((label, target))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut first = marker_pass()?;
    let mut second = grouping_pass()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--dot") {
        println!("{}", first.prepare()?.to_dot());
        println!("{}", second.prepare()?.to_dot());
        return Ok(());
    }

    let source = match args.first() {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE.to_owned(),
    };
    // Block markers are anchored on the preceding newline
    let input = format!("\n{source}");

    let first_table = Arc::clone(first.prepare()?);
    println!(
        "marker pass: {} states, {} transitions",
        first_table.len(),
        first_table.transition_count()
    );

    let mut passes = first.chain(second)?;
    for token in passes.tokens([Chunk::Text(&input)]) {
        let token = token?;
        let position = token
            .meta()
            .map(|meta| format!("{}:{}", meta.line, meta.column))
            .unwrap_or_default();
        match token.kind() {
            "link" | "image" => {
                if let Some((label, target)) = link_parts(&token) {
                    println!("{position:>6} {:<12} {label:?} -> {target}", token.kind());
                }
            }
            "newline" => {}
            kind => println!("{position:>6} {kind:<12} {:?}", token.text()),
        }
    }
    Ok(())
}
