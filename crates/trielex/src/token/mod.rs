//! # Token Model
//!
//! Tokens are the output of every tokenizer pass, and symbols are what a pass
//! consumes. A first pass turns text into symbols by segmentation; a second
//! pass turns each upstream [`Token`] into one [`Symbol`].
//!
//! ## Usage
//!
//! ```rust
//! use trielex::token::{Symbol, Token, Value};
//!
//! let token = Token::new("em", Value::None);
//! let symbol = Symbol::from_token(token);
//! assert_eq!(symbol.tag(), "em");
//! ```

mod symbol;
mod value;

pub use symbol::{END_OF_STREAM_TAG, Symbol, TEXT_TAG, Tag};
pub use value::Value;

use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Where a token or symbol started in its source.
///
/// Lines and columns are zero-based; columns count UTF-8 bytes from the start
/// of the line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SourceMeta {
    /// The file the input came from, if the pipeline was given one
    pub file: Option<CompactString>,
    /// Zero-based line number
    pub line: u32,
    /// Zero-based column (in UTF-8 bytes)
    pub column: u32,
}

impl SourceMeta {
    #[must_use]
    pub const fn new(file: Option<CompactString>, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }
}

/// A token produced by an accept action.
///
/// Tokens are immutable once emitted and carry no reference back to the
/// automaton that produced them, so they can be handed to a second pass or
/// stored freely.
///
/// # Example
///
/// ```rust
/// use trielex::token::{Token, Value};
///
/// let token = Token::new("text", "hello");
/// assert_eq!(token.kind(), "text");
/// assert_eq!(token.value(), &Value::from("hello"));
/// assert!(token.meta().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Token {
    kind: CompactString,
    value: Value,
    meta: Option<SourceMeta>,
}

impl Token {
    /// Create a token with the given type tag and attribute value.
    #[must_use]
    pub fn new(kind: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            meta: None,
        }
    }

    /// Attach source metadata to a token that has not been emitted yet.
    #[must_use]
    pub fn with_meta(mut self, meta: Option<SourceMeta>) -> Self {
        self.meta = meta;
        self
    }

    /// The type tag of this token (e.g. `text`, `em`, `link`)
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The derived attribute value of this token
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Where the first symbol of this token's match started, if known
    #[inline]
    #[must_use]
    pub const fn meta(&self) -> Option<&SourceMeta> {
        self.meta.as_ref()
    }

    /// The attribute value flattened to text.
    ///
    /// See [`Value::to_text`].
    #[must_use]
    pub fn text(&self) -> CompactString {
        self.value.to_text()
    }

    /// Split the token into its parts.
    #[must_use]
    pub fn into_parts(self) -> (CompactString, Value, Option<SourceMeta>) {
        (self.kind, self.value, self.meta)
    }
}
