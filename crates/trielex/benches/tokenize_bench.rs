use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use trielex::lexeme::{Attribute, LexemeDef, Mode, Pattern};
use trielex::lexicon::{Lexicon, LexiconBuilder};
use trielex::pipeline::{Stage, Tokenizer, TokenizerConfig};
use trielex::token::Value;

fn marker(kind: &str, literal: &str) -> LexemeDef {
    LexemeDef::new(kind, Pattern::literal(literal)).full_match(Attribute::constant(Value::None))
}

fn inline_lexicon() -> Lexicon {
    LexiconBuilder::new(Mode::Character)
        .default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
        .lexemes([
            marker("image-open", "!["),
            marker("open-bracket", "["),
            marker("close-bracket", "]"),
            marker("open-paren", "("),
            marker("close-paren", ")"),
            marker("em", "_"),
            marker("strong", "__"),
            marker("strong", "**"),
            marker("hr", "---"),
            marker("newline", "\n"),
        ])
        .build()
        .unwrap()
}

fn grouping_pass() -> Tokenizer {
    let mut tokenizer = Tokenizer::new(TokenizerConfig::token());
    tokenizer
        .set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
        .unwrap();
    tokenizer
        .add_lexemes([
            LexemeDef::new("em-text", Pattern::notation("em, text+, em").unwrap())
                .full_match(Attribute::Concat),
            LexemeDef::new("strong-text", Pattern::notation("strong, text+, strong").unwrap())
                .full_match(Attribute::Concat),
            LexemeDef::new(
                "link",
                Pattern::notation(
                    "(open-bracket | image-open), text+, close-bracket, open-paren, text, close-paren",
                )
                .unwrap(),
            )
            .full_match(Attribute::Collect),
        ])
        .unwrap();
    tokenizer
}

fn document(paragraphs: usize) -> String {
    let paragraph = "Some _emphasis_ and __strong text__ with a [link](https://example.com)\n\
                     and an ![image](logo.png) followed by plain words\n---\n";
    paragraph.repeat(paragraphs)
}

fn bench_compile(c: &mut Criterion) {
    let lexicon = inline_lexicon();
    c.bench_function("compile_inline_lexicon", |b| {
        b.iter(|| black_box(black_box(&lexicon).compile()));
    });
}

fn bench_single_pass(c: &mut Criterion) {
    let table = Arc::new(inline_lexicon().compile());
    let config = TokenizerConfig::character().with_lexicon_special_chars();
    let input = document(64);

    c.bench_function("single_pass_64_paragraphs", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::with_table(config.clone(), Arc::clone(&table)).unwrap();
            black_box(tokenizer.tokenize(black_box(&input)).unwrap());
        });
    });
}

fn bench_two_pass(c: &mut Criterion) {
    let table = Arc::new(inline_lexicon().compile());
    let config = TokenizerConfig::character().with_lexicon_special_chars();
    let second_table = Arc::clone(grouping_pass().prepare().unwrap());
    let input = document(64);

    c.bench_function("two_pass_64_paragraphs", |b| {
        b.iter(|| {
            let first = Tokenizer::with_table(config.clone(), Arc::clone(&table)).unwrap();
            let second =
                Tokenizer::with_table(TokenizerConfig::token(), Arc::clone(&second_table)).unwrap();
            let mut passes = first.chain(second).unwrap();
            black_box(passes.tokenize(black_box(&input)).unwrap());
        });
    });
}

criterion_group!(benches, bench_compile, bench_single_pass, bench_two_pass);
criterion_main!(benches);
