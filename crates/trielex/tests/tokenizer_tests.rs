//! Tests for single-pass tokenization

use trielex::error::{LexiconError, PipelineError};
use trielex::lexeme::{Attribute, LexemeDef, Mode, Pattern, PatternElement};
use trielex::pipeline::{Stage, Tokenizer, TokenizerConfig};
use trielex::token::{Token, Value};

fn bell_tokenizer() -> Tokenizer {
    let mut tokenizer = Tokenizer::new(
        TokenizerConfig::character().with_special_chars(['b', 'e', 'l', 'a', 'x', 's']),
    );
    tokenizer
        .set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
        .unwrap();
    tokenizer
        .add_lexeme(
            LexemeDef::new("bell", Pattern::notation("b, e?, l*?, a*?, x+").unwrap())
                .full_match(Attribute::Concat),
        )
        .unwrap();
    tokenizer
        .add_lexeme(
            LexemeDef::new("other", Pattern::notation("b, e?, s*?, x+").unwrap())
                .full_match(Attribute::Concat),
        )
        .unwrap();
    tokenizer
}

fn pairs(tokens: &[Token]) -> Vec<(String, String)> {
    tokens
        .iter()
        .map(|t| (t.kind().to_owned(), t.text().to_string()))
        .collect()
}

fn expected(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(kind, text)| ((*kind).to_owned(), (*text).to_owned()))
        .collect()
}

#[test]
fn test_optional_repeat_sequence() {
    let mut tokenizer = bell_tokenizer();
    let tokens = tokenizer
        .tokenize("bx bxx bex bexx bellxx bellaaxx beaaxx besssxxx")
        .unwrap();
    assert_eq!(
        pairs(&tokens),
        expected(&[
            ("other", "bx"),
            ("text", " "),
            ("other", "bxx"),
            ("text", " "),
            ("other", "bex"),
            ("text", " "),
            ("other", "bexx"),
            ("text", " "),
            ("bell", "bellxx"),
            ("text", " "),
            ("bell", "bellaaxx"),
            ("text", " "),
            ("bell", "beaaxx"),
            ("text", " "),
            ("other", "besssxxx"),
        ])
    );
}

#[test]
fn test_later_lexeme_wins_shared_completion() {
    let mut tokenizer = bell_tokenizer();
    let tokens = tokenizer.tokenize("bx bex blx").unwrap();
    assert_eq!(
        pairs(&tokens),
        expected(&[
            ("other", "bx"),
            ("text", " "),
            ("other", "bex"),
            ("text", " "),
            ("bell", "blx"),
        ])
    );
}

#[test]
fn test_flush_emits_partial_match_once() {
    let mut tokenizer = bell_tokenizer();
    assert!(tokenizer.consume_text("be").unwrap().is_empty());
    let flushed = tokenizer.finish().unwrap();
    assert_eq!(pairs(&flushed), expected(&[("text", "be")]));
    assert!(tokenizer.finish().unwrap().is_empty());
}

#[test]
fn test_divergence_falls_back_to_default() {
    let mut tokenizer = bell_tokenizer();
    let tokens = tokenizer.tokenize("bes bla").unwrap();
    assert_eq!(
        pairs(&tokens),
        expected(&[
            ("text", "bes"),
            ("text", " "),
            ("text", "bla"),
        ])
    );
}

#[test]
fn test_default_fallback_keeps_input() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_special_chars(['_']));
    tokenizer.set_default_lexeme(LexemeDef::fallback("text")).unwrap();
    tokenizer
        .add_lexeme(LexemeDef::new("em", Pattern::literal("_")))
        .unwrap();

    let tokens = tokenizer.tokenize("no markup here").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind(), "text");
    assert_eq!(tokens[0].value(), &Value::from("no markup here"));
}

#[test]
fn test_without_special_chars_chunk_is_one_symbol() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character());
    tokenizer.set_default_lexeme(LexemeDef::fallback("text")).unwrap();
    tokenizer
        .add_lexeme(LexemeDef::new("em", Pattern::literal("_")))
        .unwrap();

    let tokens = tokenizer.tokenize("_not split_").unwrap();
    assert_eq!(pairs(&tokens), expected(&[("text", "_not split_")]));
}

#[test]
fn test_shared_prefix_prefers_longer_match() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_lexicon_special_chars());
    tokenizer
        .set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
        .unwrap();
    tokenizer
        .add_lexemes([
            LexemeDef::new("em", Pattern::literal("_")).full_match(Attribute::constant(Value::None)),
            LexemeDef::new("strong", Pattern::literal("__"))
                .full_match(Attribute::constant(Value::None)),
        ])
        .unwrap();

    let tokens = tokenizer.tokenize("a__b_c___").unwrap();
    let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
    assert_eq!(
        kinds,
        ["text", "strong", "text", "em", "text", "strong", "em"]
    );
}

#[test]
fn test_inverted_repeat_reads_a_line() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_special_chars(['#', '\n']));
    tokenizer
        .set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
        .unwrap();
    tokenizer
        .add_lexeme(
            LexemeDef::new("heading", Pattern::notation(r"#, !\n+, \n").unwrap())
                .full_match(Attribute::Concat),
        )
        .unwrap();

    let tokens = tokenizer.tokenize("# Title\nbody").unwrap();
    assert_eq!(
        pairs(&tokens),
        expected(&[("heading", "# Title\n"), ("text", "body")])
    );
}

#[test]
fn test_constant_and_function_attributes() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_lexicon_special_chars());
    tokenizer.set_default_lexeme(LexemeDef::fallback("text")).unwrap();
    tokenizer
        .add_lexeme(LexemeDef::new("hr", Pattern::literal("---")).full_match(Attribute::constant("<hr>")))
        .unwrap();
    tokenizer
        .add_lexeme(
            LexemeDef::new("tilde", Pattern::notation("~+").unwrap()).full_match(Attribute::function(
                |history, _| Value::from(history.len().to_string()),
            )),
        )
        .unwrap();

    let tokens = tokenizer.tokenize("---~~~").unwrap();
    assert_eq!(pairs(&tokens), expected(&[("hr", "<hr>"), ("tilde", "3")]));
}

#[test]
fn test_explicit_sequence_pattern() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_lexicon_special_chars());
    tokenizer
        .set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
        .unwrap();
    tokenizer
        .add_lexeme(
            LexemeDef::new(
                "ol",
                Pattern::sequence([
                    PatternElement::new("1"),
                    PatternElement::new("."),
                    PatternElement::new(" ").optional(),
                ]),
            )
            .full_match(Attribute::Concat),
        )
        .unwrap();

    let tokens = tokenizer.tokenize("1. a1.b").unwrap();
    assert_eq!(
        pairs(&tokens),
        expected(&[("ol", "1. "), ("text", "a"), ("ol", "1."), ("text", "b")])
    );
}

#[test]
fn test_source_meta_spans_chunks() {
    let mut tokenizer = bell_tokenizer();
    let mut tokens = tokenizer.consume_text("q\nb").unwrap();
    tokens.extend(tokenizer.consume_text("x").unwrap());
    tokens.extend(tokenizer.finish().unwrap());

    assert_eq!(pairs(&tokens), expected(&[("text", "q\n"), ("other", "bx")]));
    let meta = tokens[1].meta().unwrap();
    assert_eq!((meta.line, meta.column), (1, 0));
}

#[test]
fn test_lexeme_before_default_is_rejected() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::character());
    assert_eq!(
        tokenizer.add_lexeme(LexemeDef::new("em", Pattern::literal("_"))),
        Err(LexiconError::LexemeBeforeDefault { kind: "em".into() })
    );
}

#[test]
fn test_literal_pattern_rejected_in_token_mode() {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::token());
    tokenizer.set_default_lexeme(LexemeDef::fallback("text")).unwrap();
    assert!(matches!(
        tokenizer.add_lexeme(LexemeDef::new("em", Pattern::literal("_"))),
        Err(LexiconError::PatternModeMismatch { mode: Mode::Token, .. })
    ));
}

#[test]
fn test_invalid_mode_string() {
    assert_eq!(
        "bytes".parse::<Mode>(),
        Err(LexiconError::InvalidMode { mode: "bytes".into() })
    );
    assert_eq!("string".parse::<Mode>(), Ok(Mode::Character));
}

#[test]
fn test_consume_after_finish() {
    let mut tokenizer = bell_tokenizer();
    tokenizer.finish().unwrap();
    assert_eq!(tokenizer.consume_text("bx"), Err(PipelineError::Finished));
}
