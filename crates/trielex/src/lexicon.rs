//! # Lexicon
//!
//! An ordered, validated set of lexemes headed by the default lexeme.
//!
//! ## Overview
//!
//! [`LexiconBuilder`] collects [`LexemeDef`]s, validates each one against the
//! lexicon [`Mode`] as it is added and freezes them into a [`Lexicon`]. The
//! default lexeme must come first: it resolves every partial match, so adding
//! a pattern lexeme before it is a configuration error.
//!
//! Registration order is significant. When two lexemes complete at the same
//! point of the trie, the one registered last takes the full match.
//!
//! ## Usage
//!
//! ```rust
//! use trielex::lexicon::LexiconBuilder;
//! use trielex::lexeme::{Attribute, LexemeDef, Mode, Pattern};
//!
//! let lexicon = LexiconBuilder::new(Mode::Character)
//!     .default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
//!     .lexeme(LexemeDef::new("strong", Pattern::literal("**")))
//!     .lexeme(LexemeDef::new("em", Pattern::literal("*")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(lexicon.len(), 3);
//! assert_eq!(lexicon.special_chars(), vec!['*']);
//! ```

use crate::compiler::{self, StateTable};
use crate::error::LexiconError;
use crate::lexeme::{Lexeme, LexemeDef, LexemeId, Mode};
use std::sync::Arc;

/// Builder for a [`Lexicon`].
///
/// The chainable methods ([`default_lexeme`](Self::default_lexeme),
/// [`lexeme`](Self::lexeme), [`lexemes`](Self::lexemes)) keep the first
/// validation error and report it from [`build`](Self::build); the `&mut`
/// methods ([`set_default`](Self::set_default), [`push`](Self::push)) report
/// it immediately.
#[derive(Debug, Clone)]
pub struct LexiconBuilder {
    mode: Mode,
    lexemes: Vec<Lexeme>,
    error: Option<LexiconError>,
}

impl LexiconBuilder {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self {
            mode,
            lexemes: Vec::new(),
            error: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn default_lexeme(mut self, def: LexemeDef) -> Self {
        let result = self.set_default(def);
        self.record(result)
    }

    #[must_use]
    pub fn lexeme(mut self, def: LexemeDef) -> Self {
        let result = self.push(def).map(|_| ());
        self.record(result)
    }

    #[must_use]
    pub fn lexemes(mut self, defs: impl IntoIterator<Item = LexemeDef>) -> Self {
        for def in defs {
            let result = self.push(def).map(|_| ());
            self = self.record(result);
        }
        self
    }

    fn record(mut self, result: Result<(), LexiconError>) -> Self {
        if let Err(err) = result
            && self.error.is_none()
        {
            self.error = Some(err);
        }
        self
    }

    /// Set the default lexeme.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::DuplicateDefault`] if a default lexeme is
    /// already set, or a validation error if the definition has a pattern or
    /// an invalid type tag.
    pub fn set_default(&mut self, def: LexemeDef) -> Result<(), LexiconError> {
        if let Some(existing) = self.lexemes.first() {
            return Err(LexiconError::DuplicateDefault {
                existing: existing.kind().into(),
            });
        }
        let lexeme = Lexeme::fallback(LexemeId(0), def)?;
        self.lexemes.push(lexeme);
        Ok(())
    }

    /// Validate and append a pattern lexeme, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::LexemeBeforeDefault`] if no default lexeme is
    /// set yet, or the validation error for the definition.
    pub fn push(&mut self, def: LexemeDef) -> Result<LexemeId, LexiconError> {
        if self.lexemes.is_empty() {
            return Err(LexiconError::LexemeBeforeDefault {
                kind: def.kind().into(),
            });
        }
        let id = LexemeId(u32::try_from(self.lexemes.len()).unwrap_or(u32::MAX));
        let lexeme = Lexeme::from_def(id, def, self.mode)?;
        self.lexemes.push(lexeme);
        Ok(id)
    }

    /// Freeze the lexemes into a [`Lexicon`].
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by a chained call, or
    /// [`LexiconError::MissingDefault`] if no default lexeme was set.
    pub fn build(self) -> Result<Lexicon, LexiconError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.lexemes.is_empty() {
            return Err(LexiconError::MissingDefault);
        }
        Ok(Lexicon {
            mode: self.mode,
            lexemes: self.lexemes.into(),
        })
    }
}

/// A frozen lexicon.
///
/// Cloning is cheap; the lexemes are shared.
#[derive(Debug, Clone)]
pub struct Lexicon {
    mode: Mode,
    lexemes: Arc<[Lexeme]>,
}

impl Lexicon {
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The default lexeme, always [`LexemeId(0)`](LexemeId)
    #[must_use]
    pub fn default_lexeme(&self) -> &Lexeme {
        &self.lexemes[0]
    }

    #[must_use]
    pub fn lexeme(&self, id: LexemeId) -> Option<&Lexeme> {
        self.lexemes.get(id.index())
    }

    /// All lexemes in registration order, the default lexeme first
    #[must_use]
    pub fn lexemes(&self) -> &[Lexeme] {
        &self.lexemes
    }

    /// The pattern lexemes in registration order
    #[must_use]
    pub fn pattern_lexemes(&self) -> &[Lexeme] {
        &self.lexemes[1..]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    /// Always `false`: a built lexicon holds at least its default lexeme.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    /// Every single-character symbol the patterns mention, in first-use
    /// order.
    ///
    /// These are the characters a character-mode pipeline has to segment out
    /// of raw text for the patterns to ever match.
    #[must_use]
    pub fn special_chars(&self) -> Vec<char> {
        let mut chars = Vec::new();
        for lexeme in self.pattern_lexemes() {
            for item in lexeme.items() {
                item.for_each_element(&mut |element| {
                    let mut it = element.symbol().chars();
                    if let (Some(c), None) = (it.next(), it.next())
                        && !chars.contains(&c)
                    {
                        chars.push(c);
                    }
                });
            }
        }
        chars
    }

    /// Whether any pattern mentions `symbol`
    #[must_use]
    pub fn mentions(&self, symbol: &str) -> bool {
        self.pattern_lexemes().iter().any(|lexeme| {
            lexeme.items().iter().any(|item| {
                let mut found = false;
                item.for_each_element(&mut |element| {
                    found |= element.symbol() == symbol;
                });
                found
            })
        })
    }

    /// Compile the lexicon into a deterministic state table.
    #[must_use]
    pub fn compile(&self) -> StateTable {
        compiler::compile(self)
    }
}
