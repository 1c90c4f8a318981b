//! # Tokenizer Pipeline
//!
//! Adapts input chunks into symbols, drives an [`Automaton`] over them and
//! collects the emitted tokens.
//!
//! ## Overview
//!
//! A [`Tokenizer`] consumes [`Chunk`]s:
//!
//! - In [`Mode::Character`] a chunk is raw text. It is split into special
//!   characters and `text` runs (see [`SpecialChars`]), each becoming one
//!   symbol.
//! - In [`Mode::Token`] a chunk is a single upstream [`Token`], which becomes
//!   one symbol tagged with the token's kind.
//!
//! Symbols are fed to the automaton one at a time; when a step asks for a
//! replay, the same symbol is presented again before the next one. At the end
//! of input, [`Stage::finish`] drives the end-of-stream sentinel through the
//! automaton exactly once so the last partial match is not lost.
//!
//! The state table is compiled lazily from the configured lexemes on the first
//! chunk (or eagerly with [`Tokenizer::prepare`]) and is frozen afterwards.
//!
//! ## Multi-pass tokenization
//!
//! [`Stage::chain`] feeds the tokens of one stage into a second, token-mode
//! stage:
//!
//! ```rust
//! use trielex::pipeline::{Stage, Tokenizer, TokenizerConfig};
//! use trielex::lexeme::{Attribute, LexemeDef, Pattern};
//! use trielex::token::Value;
//!
//! let mut first = Tokenizer::new(TokenizerConfig::character().with_special_chars(['_']));
//! first.set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))?;
//! first.add_lexeme(LexemeDef::new("em", Pattern::literal("_")).full_match(Attribute::constant(Value::None)))?;
//!
//! let mut second = Tokenizer::new(TokenizerConfig::token());
//! second.set_default_lexeme(LexemeDef::fallback("text"))?;
//! second.add_lexeme(
//!     LexemeDef::new("em-text", Pattern::notation("em, text+, em")?).full_match(Attribute::Collect),
//! )?;
//!
//! let mut pipeline = first.chain(second)?;
//! let tokens = pipeline.tokenize("say _hi_")?;
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(kinds, ["text", "em-text"]);
//! assert_eq!(tokens[1].text(), "hi");
//! # Ok::<(), trielex::error::PipelineError>(())
//! ```

mod config;
pub mod position;
pub mod segment;
mod stream;

pub use config::{SpecialChars, TokenizerConfig};
pub use stream::Tokens;

use crate::compiler::StateTable;
use crate::engine::{Automaton, Signal};
use crate::error::{LexiconError, PipelineError};
use crate::lexeme::{LexemeDef, LexemeId, Mode};
use crate::lexicon::LexiconBuilder;
use crate::token::{END_OF_STREAM_TAG, Symbol, Token};
use position::Cursor;
use segment::{Segment, SpecialSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// One unit of pipeline input
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk<'a> {
    /// Raw text, for character mode
    Text(&'a str),
    /// An upstream token, for token mode
    Token(Token),
}

impl Chunk<'_> {
    const fn describe(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Token(_) => "token",
        }
    }
}

impl<'a> From<&'a str> for Chunk<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl From<Token> for Chunk<'_> {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

/// A tokenizer pass: consumes chunks, emits tokens.
pub trait Stage {
    /// The kind of chunk this stage consumes
    fn mode(&self) -> Mode;

    /// Consume one chunk, returning the tokens it completed.
    ///
    /// # Errors
    ///
    /// Returns an error on a mismatched chunk, after [`finish`](Self::finish),
    /// or on an internal consistency failure of the state table.
    fn consume(&mut self, chunk: Chunk<'_>) -> Result<Vec<Token>, PipelineError>;

    /// Flush the end of the stream, returning the tokens that resolves.
    ///
    /// Only the first call flushes; later calls return no tokens.
    ///
    /// # Errors
    ///
    /// Returns an error on an internal consistency failure of the state table.
    fn finish(&mut self) -> Result<Vec<Token>, PipelineError>;

    /// Tokenize a whole text in one go, including the flush.
    ///
    /// # Errors
    ///
    /// See [`consume`](Self::consume) and [`finish`](Self::finish).
    fn tokenize(&mut self, text: &str) -> Result<Vec<Token>, PipelineError> {
        let mut tokens = self.consume(Chunk::Text(text))?;
        tokens.extend(self.finish()?);
        Ok(tokens)
    }

    /// Feed this stage's output into `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ChunkMismatch`] unless `next` is a token-mode
    /// stage.
    fn chain<S: Stage>(self, next: S) -> Result<Chained<Self, S>, PipelineError>
    where
        Self: Sized,
    {
        Chained::new(self, next)
    }

    /// Lazily tokenize a sequence of chunks, flushing once they run out.
    ///
    /// To stop before the input runs out, end with [`Tokens::finish`] so the
    /// pending match is still flushed.
    fn tokens<'s, 'a, I>(&'s mut self, input: I) -> Tokens<'s, Self, I::IntoIter>
    where
        Self: Sized,
        I: IntoIterator<Item = Chunk<'a>>,
    {
        Tokens::new(self, input.into_iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Open,
    Finished,
    Poisoned,
}

/// A single tokenizer pass.
///
/// # Example
///
/// ```rust
/// use trielex::pipeline::{Stage, Tokenizer, TokenizerConfig};
/// use trielex::lexeme::{Attribute, LexemeDef, Pattern};
///
/// let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_lexicon_special_chars());
/// tokenizer.set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))?;
/// tokenizer.add_lexeme(LexemeDef::new("hr", Pattern::literal("---")).full_match(Attribute::Concat))?;
///
/// let tokens = tokenizer.tokenize("a---b--")?;
/// let texts: Vec<_> = tokens.iter().map(|t| t.text().to_string()).collect();
/// assert_eq!(texts, ["a", "---", "b", "--"]);
/// assert_eq!(tokens[1].kind(), "hr");
/// assert_eq!(tokens[3].kind(), "text");
/// # Ok::<(), trielex::error::PipelineError>(())
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    config: TokenizerConfig,
    builder: Option<LexiconBuilder>,
    automaton: Option<Automaton>,
    specials: SpecialSet,
    cursor: Cursor,
    status: Status,
}

impl Tokenizer {
    /// Create a tokenizer with an empty lexicon.
    #[must_use]
    pub fn new(config: TokenizerConfig) -> Self {
        let builder = LexiconBuilder::new(config.mode);
        Self {
            config,
            builder: Some(builder),
            automaton: None,
            specials: SpecialSet::default(),
            cursor: Cursor::new(),
            status: Status::Open,
        }
    }

    /// Create a tokenizer running an already compiled table.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::TableModeMismatch`] if the table was compiled
    /// for a different mode than `config` asks for.
    pub fn with_table(config: TokenizerConfig, table: Arc<StateTable>) -> Result<Self, PipelineError> {
        if table.mode() != config.mode {
            return Err(PipelineError::TableModeMismatch {
                expected: config.mode,
                found: table.mode(),
            });
        }
        let mut tokenizer = Self::new(config);
        tokenizer.install(table);
        Ok(tokenizer)
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Set the default lexeme. Must come before any other lexeme.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Frozen`] once the table is compiled, or any
    /// validation error for the definition.
    pub fn set_default_lexeme(&mut self, def: LexemeDef) -> Result<(), LexiconError> {
        self.builder.as_mut().ok_or(LexiconError::Frozen)?.set_default(def)
    }

    /// Add a pattern lexeme.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Frozen`] once the table is compiled,
    /// [`LexiconError::LexemeBeforeDefault`] if no default lexeme is set, or
    /// any validation error for the definition.
    pub fn add_lexeme(&mut self, def: LexemeDef) -> Result<LexemeId, LexiconError> {
        self.builder.as_mut().ok_or(LexiconError::Frozen)?.push(def)
    }

    /// Add several pattern lexemes in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`add_lexeme`](Self::add_lexeme).
    pub fn add_lexemes(
        &mut self,
        defs: impl IntoIterator<Item = LexemeDef>,
    ) -> Result<Vec<LexemeId>, LexiconError> {
        defs.into_iter().map(|def| self.add_lexeme(def)).collect()
    }

    /// Compile the lexicon now instead of on the first chunk.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::MissingDefault`] if no default lexeme is set.
    pub fn prepare(&mut self) -> Result<&Arc<StateTable>, LexiconError> {
        if self.automaton.is_none() {
            let builder = self.builder.as_ref().ok_or(LexiconError::Frozen)?;
            let lexicon = builder.clone().build()?;
            let table = Arc::new(lexicon.compile());
            self.install(table);
        }
        self.automaton
            .as_ref()
            .map(Automaton::table)
            .ok_or(LexiconError::MissingDefault)
    }

    fn install(&mut self, table: Arc<StateTable>) {
        self.specials = match &self.config.special_chars {
            SpecialChars::None => SpecialSet::default(),
            SpecialChars::Explicit(chars) => chars.iter().copied().collect(),
            SpecialChars::FromLexicon => table.lexicon().special_chars().into_iter().collect(),
        };
        debug!(
            mode = %self.config.mode,
            states = table.len(),
            specials = self.specials.len(),
            "tokenizer ready"
        );
        self.builder = None;
        self.automaton = Some(Automaton::new(table));
    }

    /// The compiled table, once prepared
    #[must_use]
    pub fn table(&self) -> Option<&Arc<StateTable>> {
        self.automaton.as_ref().map(Automaton::table)
    }

    /// Start a new stream with the same table.
    ///
    /// Drops any match in progress, rewinds the source position and clears
    /// the finished or poisoned status.
    pub fn restart(&mut self) {
        if let Some(automaton) = &mut self.automaton {
            automaton.reset();
        }
        self.cursor = Cursor::new();
        self.status = Status::Open;
    }

    /// Consume a text chunk.
    ///
    /// # Errors
    ///
    /// See [`Stage::consume`].
    pub fn consume_text(&mut self, text: &str) -> Result<Vec<Token>, PipelineError> {
        self.consume(Chunk::Text(text))
    }

    /// Consume an upstream token.
    ///
    /// # Errors
    ///
    /// See [`Stage::consume`].
    pub fn consume_token(&mut self, token: Token) -> Result<Vec<Token>, PipelineError> {
        self.consume(Chunk::Token(token))
    }

    fn check_open(&self) -> Result<(), PipelineError> {
        match self.status {
            Status::Open => Ok(()),
            Status::Finished => Err(PipelineError::Finished),
            Status::Poisoned => Err(PipelineError::Poisoned),
        }
    }

    fn symbols(&mut self, chunk: Chunk<'_>) -> Result<Vec<Symbol>, PipelineError> {
        match (self.config.mode, chunk) {
            (Mode::Character, Chunk::Text(text)) => {
                let file = self.config.file.as_ref();
                let mut symbols = Vec::new();
                for piece in segment::segment(text, &self.specials) {
                    let meta = Some(self.cursor.meta(file));
                    let symbol = match piece {
                        Segment::Text(run) => {
                            self.cursor.advance(run);
                            Symbol::text(run)
                        }
                        Segment::Special(c) => {
                            let mut buf = [0u8; 4];
                            self.cursor.advance(c.encode_utf8(&mut buf));
                            Symbol::special(c)
                        }
                    };
                    symbols.push(symbol.with_meta(meta));
                }
                Ok(symbols)
            }
            (Mode::Token, Chunk::Token(token)) => {
                if token.kind() == END_OF_STREAM_TAG {
                    return Err(PipelineError::ReservedTokenKind {
                        kind: token.kind().into(),
                    });
                }
                Ok(vec![Symbol::from_token(token)])
            }
            (mode, chunk) => Err(PipelineError::ChunkMismatch {
                mode,
                found: chunk.describe(),
            }),
        }
    }

    /// Feed one symbol to the automaton, replaying it as often as asked.
    fn drive(&mut self, symbol: &Symbol, tokens: &mut Vec<Token>) -> Result<(), PipelineError> {
        let Some(automaton) = self.automaton.as_mut() else {
            return Err(LexiconError::MissingDefault.into());
        };
        loop {
            let step = match automaton.step(symbol) {
                Ok(step) => step,
                Err(err) => {
                    self.status = Status::Poisoned;
                    return Err(err.into());
                }
            };
            tokens.extend(step.token);
            if step.signal != Signal::Replay {
                return Ok(());
            }
            trace!(tag = symbol.tag(), "replay");
        }
    }
}

impl Stage for Tokenizer {
    fn mode(&self) -> Mode {
        self.config.mode
    }

    fn consume(&mut self, chunk: Chunk<'_>) -> Result<Vec<Token>, PipelineError> {
        self.check_open()?;
        self.prepare()?;
        let symbols = self.symbols(chunk)?;
        let mut tokens = Vec::new();
        for symbol in &symbols {
            self.drive(symbol, &mut tokens)?;
        }
        Ok(tokens)
    }

    fn finish(&mut self) -> Result<Vec<Token>, PipelineError> {
        match self.status {
            Status::Finished => return Ok(Vec::new()),
            Status::Poisoned => return Err(PipelineError::Poisoned),
            Status::Open => {}
        }
        let mut tokens = Vec::new();
        if self.automaton.is_some() {
            self.drive(&Symbol::end_of_stream(), &mut tokens)?;
        }
        self.status = Status::Finished;
        Ok(tokens)
    }
}

/// Two stages run back to back: every token of the first is a chunk of the
/// second.
#[derive(Debug)]
pub struct Chained<A, B> {
    first: A,
    second: B,
}

impl<A: Stage, B: Stage> Chained<A, B> {
    /// # Errors
    ///
    /// Returns [`PipelineError::ChunkMismatch`] unless `second` is a
    /// token-mode stage.
    pub fn new(first: A, second: B) -> Result<Self, PipelineError> {
        if second.mode() != Mode::Token {
            return Err(PipelineError::ChunkMismatch {
                mode: second.mode(),
                found: "token",
            });
        }
        Ok(Self { first, second })
    }

    #[must_use]
    pub const fn first(&self) -> &A {
        &self.first
    }

    #[must_use]
    pub const fn second(&self) -> &B {
        &self.second
    }

    #[must_use]
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }

    fn forward(&mut self, tokens: Vec<Token>) -> Result<Vec<Token>, PipelineError> {
        let mut out = Vec::new();
        for token in tokens {
            out.extend(self.second.consume(Chunk::Token(token))?);
        }
        Ok(out)
    }
}

impl<A: Stage, B: Stage> Stage for Chained<A, B> {
    fn mode(&self) -> Mode {
        self.first.mode()
    }

    fn consume(&mut self, chunk: Chunk<'_>) -> Result<Vec<Token>, PipelineError> {
        let tokens = self.first.consume(chunk)?;
        self.forward(tokens)
    }

    fn finish(&mut self) -> Result<Vec<Token>, PipelineError> {
        let tokens = self.first.finish()?;
        let mut out = self.forward(tokens)?;
        out.extend(self.second.finish()?);
        Ok(out)
    }
}
