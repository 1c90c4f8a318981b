//! # Trielex
//!
//! A lexer generator that compiles declarative token patterns into a
//! deterministic trie automaton and drives it over characters or over the
//! tokens of a previous pass.
//!
//! ## Overview
//!
//! - **Lexemes**: a type tag, a pattern of symbols with optional, repeat,
//!   inverted and alternation modifiers, and the attributes derived for full
//!   and partial matches. One default lexeme catches everything else.
//! - **Compiler**: all patterns are merged into a shared-prefix trie and
//!   flattened into a state table in which exactly one transition matches any
//!   symbol in any state.
//! - **Engine**: steps the table one symbol at a time, tracks the history of
//!   the match in progress and replays the lookahead when a match is resolved
//!   by a catch-all.
//! - **Pipeline**: turns text or upstream tokens into symbols, flushes the end
//!   of input exactly once and chains passes for multi-pass tokenization.
//!
//! ## Quick Start
//!
//! ```rust
//! use trielex::pipeline::{Stage, Tokenizer, TokenizerConfig};
//! use trielex::lexeme::{Attribute, LexemeDef, Pattern};
//!
//! let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_lexicon_special_chars());
//!
//! // 1. The default lexeme comes first; stalled matches fall back to it
//! tokenizer.set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))?;
//!
//! // 2. Pattern lexemes: `?` optional, `+` repeat, `*` both
//! tokenizer.add_lexeme(
//!     LexemeDef::new("bell", Pattern::notation("b, e?, l*, a*, x+")?).full_match(Attribute::Concat),
//! )?;
//!
//! // 3. Tokenize; the end of input is flushed once
//! let tokens = tokenizer.tokenize("bellx be")?;
//! let pairs: Vec<_> = tokens
//!     .iter()
//!     .map(|t| format!("{}:{}", t.kind(), t.text()))
//!     .collect();
//! assert_eq!(pairs, ["bell:bellx", "text: ", "text:be"]);
//! # Ok::<(), trielex::error::PipelineError>(())
//! ```
//!
//! ## Modules
//!
//! - [`token`] - Tokens, symbols and attribute values
//! - [`lexeme`] - Patterns, attributes and lexeme definitions
//! - [`lexicon`] - Ordered lexeme sets and their builder
//! - [`compiler`] - Trie construction and state table generation
//! - [`engine`] - The automaton that executes a state table
//! - [`pipeline`] - Chunk-driven tokenizers and pass chaining
//! - [`error`] - Error types and diagnostics

pub mod compiler;
pub mod engine;
pub mod error;
pub mod lexeme;
pub mod lexicon;
pub mod pipeline;
pub mod token;

// Re-export commonly used types
pub use compiler::StateTable;
pub use engine::{Automaton, History};
pub use error::{EngineError, LexiconError, PipelineError};
pub use lexeme::{Attribute, LexemeDef, Mode, Pattern, PatternElement};
pub use lexicon::{Lexicon, LexiconBuilder};
pub use pipeline::{Chunk, Stage, Tokenizer, TokenizerConfig};
pub use token::{Symbol, Token, Value};
