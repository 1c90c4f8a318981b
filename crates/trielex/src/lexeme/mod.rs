//! # Lexeme Module
//!
//! Declarative lexeme definitions and their validated, immutable form.
//!
//! ## Overview
//!
//! A [`LexemeDef`] is what callers write: a type tag, a [`Pattern`] and the
//! [`Attribute`]s used for full and partial matches. Adding it to a
//! [`LexiconBuilder`](crate::lexicon::LexiconBuilder) validates it against
//! the lexicon's [`Mode`] and copies it into a [`Lexeme`], which never changes
//! afterwards.
//!
//! The default lexeme is special: it has no pattern and matches any single
//! symbol at the root when no other lexeme's prefix does. Its partial-match
//! attribute also resolves every in-progress match whose owner does not
//! define one.
//!
//! ## Usage
//!
//! ```rust
//! use trielex::lexeme::{Attribute, LexemeDef, Pattern};
//! use trielex::token::Value;
//!
//! let text = LexemeDef::fallback("text").partial_match(Attribute::Concat);
//! let strong = LexemeDef::new("strong", Pattern::literal("**"))
//!     .full_match(Attribute::constant(Value::None));
//! # let _ = (text, strong);
//! ```

mod attribute;
mod notation;
mod pattern;

pub use attribute::{Attribute, AttributeFn};
pub use pattern::{Pattern, PatternElement, PatternItem};

use crate::error::LexiconError;
use crate::token::{END_OF_STREAM_TAG, TEXT_TAG, Tag};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// What kind of input a lexicon consumes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Raw text, segmented into special characters and `text` runs
    #[default]
    #[cfg_attr(feature = "serialize", serde(alias = "string"))]
    Character,
    /// Upstream tokens, one symbol per token
    Token,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Character => "character",
            Self::Token => "token",
        })
    }
}

impl FromStr for Mode {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" | "string" => Ok(Self::Character),
            "token" => Ok(Self::Token),
            _ => Err(LexiconError::InvalidMode { mode: s.into() }),
        }
    }
}

/// Index of a lexeme within its lexicon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LexemeId(pub u32);

impl LexemeId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A lexeme definition as supplied by the caller
#[derive(Debug, Clone)]
pub struct LexemeDef {
    kind: Tag,
    pattern: Option<Pattern>,
    full_match: Attribute,
    partial_match: Option<Attribute>,
}

impl LexemeDef {
    /// Define a lexeme matching `pattern`.
    ///
    /// Both attributes default to [`Attribute::Input`]; the partial-match
    /// attribute is left unset so in-progress matches fall back to the
    /// default lexeme.
    #[must_use]
    pub fn new(kind: impl Into<Tag>, pattern: Pattern) -> Self {
        Self {
            kind: kind.into(),
            pattern: Some(pattern),
            full_match: Attribute::Input,
            partial_match: None,
        }
    }

    /// Define the default lexeme, which has no pattern.
    #[must_use]
    pub fn fallback(kind: impl Into<Tag>) -> Self {
        Self {
            kind: kind.into(),
            pattern: None,
            full_match: Attribute::Input,
            partial_match: None,
        }
    }

    #[must_use]
    pub fn full_match(mut self, attribute: Attribute) -> Self {
        self.full_match = attribute;
        self
    }

    #[must_use]
    pub fn partial_match(mut self, attribute: Attribute) -> Self {
        self.partial_match = Some(attribute);
        self
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub const fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }
}

static INPUT_ATTRIBUTE: Attribute = Attribute::Input;

/// A validated lexeme.
///
/// The pattern is normalized to a sequence of items: a literal becomes one
/// element per character and a top-level alternation becomes a single group.
#[derive(Debug, Clone)]
pub struct Lexeme {
    id: LexemeId,
    kind: Tag,
    items: Vec<PatternItem>,
    full_match: Attribute,
    partial_match: Option<Attribute>,
    is_default: bool,
}

impl Lexeme {
    /// Validate a definition as the default lexeme.
    pub(crate) fn fallback(id: LexemeId, def: LexemeDef) -> Result<Self, LexiconError> {
        validate_kind(&def.kind)?;
        if def.pattern.is_some() {
            return Err(LexiconError::UnexpectedPattern { kind: def.kind });
        }
        Ok(Self {
            id,
            kind: def.kind,
            items: Vec::new(),
            full_match: def.full_match,
            partial_match: def.partial_match,
            is_default: true,
        })
    }

    /// Validate a definition against the lexicon mode.
    pub(crate) fn from_def(id: LexemeId, def: LexemeDef, mode: Mode) -> Result<Self, LexiconError> {
        validate_kind(&def.kind)?;
        let kind = def.kind;
        let Some(pattern) = def.pattern else {
            return Err(LexiconError::MissingPattern { kind });
        };

        let items = match pattern {
            Pattern::Literal(text) => {
                if mode == Mode::Token {
                    return Err(LexiconError::mode_mismatch(
                        &kind,
                        mode,
                        "literal patterns need structured symbols",
                    ));
                }
                text.chars()
                    .map(|c| PatternItem::Element(PatternElement::new(Tag::from(c.to_string()))))
                    .collect()
            }
            Pattern::Sequence(items) => items,
            Pattern::Alternation(alternatives) => {
                if alternatives.iter().any(Vec::is_empty) {
                    return Err(LexiconError::MissingPattern { kind });
                }
                vec![PatternItem::Alternation(alternatives)]
            }
        };

        if items.is_empty() {
            return Err(LexiconError::MissingPattern { kind });
        }

        let mut invalid = None;
        for item in &items {
            item.for_each_element(&mut |element| {
                if invalid.is_none() {
                    invalid = check_element(&kind, element, mode).err();
                }
            });
        }
        if let Some(err) = invalid {
            return Err(err);
        }

        if pattern::is_nullable_sequence(&items) {
            return Err(LexiconError::NullablePattern { kind });
        }

        Ok(Self {
            id,
            kind,
            items,
            full_match: def.full_match,
            partial_match: def.partial_match,
            is_default: false,
        })
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> LexemeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The normalized pattern
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[PatternItem] {
        &self.items
    }

    #[inline]
    #[must_use]
    pub const fn full_match(&self) -> &Attribute {
        &self.full_match
    }

    /// The partial-match attribute, if this lexeme defines one
    #[inline]
    #[must_use]
    pub const fn own_partial_match(&self) -> Option<&Attribute> {
        self.partial_match.as_ref()
    }

    /// The partial-match attribute, defaulting to [`Attribute::Input`]
    #[must_use]
    pub fn partial_match(&self) -> &Attribute {
        self.partial_match.as_ref().unwrap_or(&INPUT_ATTRIBUTE)
    }

    #[inline]
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }
}

fn validate_kind(kind: &str) -> Result<(), LexiconError> {
    if kind.is_empty() {
        return Err(LexiconError::InvalidKind);
    }
    if kind == END_OF_STREAM_TAG {
        return Err(LexiconError::ReservedKind { kind: kind.into() });
    }
    Ok(())
}

fn check_element(kind: &str, element: &PatternElement, mode: Mode) -> Result<(), LexiconError> {
    let symbol = element.symbol();
    if symbol.is_empty() {
        return Err(LexiconError::EmptySymbol { kind: kind.into() });
    }
    if symbol == END_OF_STREAM_TAG {
        return Err(LexiconError::ReservedSymbol {
            kind: kind.into(),
            symbol: symbol.into(),
        });
    }
    if mode == Mode::Character && symbol != TEXT_TAG && symbol.chars().nth(1).is_some() {
        return Err(LexiconError::mode_mismatch(
            kind,
            mode,
            format!("symbol {symbol:?} is not a single character"),
        ));
    }
    Ok(())
}
