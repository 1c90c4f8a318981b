use super::{SourceMeta, Token, Value};
use compact_str::CompactString;

/// A symbol or lexeme type tag.
pub type Tag = CompactString;

/// Tag of the text runs produced by character-mode segmentation.
pub const TEXT_TAG: &str = "text";

/// Tag of the sentinel symbol fed once at end of input.
///
/// No pattern may use it and no lexeme may be named after it, so the sentinel
/// can only ever be taken by a catch-all transition.
pub const END_OF_STREAM_TAG: &str = "\u{0}end-of-stream";

/// One atomic unit of input for the automaton.
///
/// Symbols compare by tag only when matching; the value and metadata ride
/// along so accept actions can rebuild what was consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    tag: Tag,
    value: Value,
    meta: Option<SourceMeta>,
}

impl Symbol {
    #[must_use]
    pub fn new(tag: impl Into<Tag>, value: impl Into<Value>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            meta: None,
        }
    }

    /// A run of plain text between special characters
    #[must_use]
    pub fn text(text: impl Into<CompactString>) -> Self {
        Self::new(TEXT_TAG, Value::Text(text.into()))
    }

    /// A special character, tagged and valued with itself
    #[must_use]
    pub fn special(c: char) -> Self {
        let mut buf = [0u8; 4];
        let tag = Tag::from(&*c.encode_utf8(&mut buf));
        Self::new(tag.clone(), Value::Text(tag))
    }

    /// Wrap an upstream token for a token-mode pass.
    ///
    /// The symbol is tagged with the token's kind, carries the token itself as
    /// its value and inherits the token's source metadata.
    #[must_use]
    pub fn from_token(token: Token) -> Self {
        let tag = Tag::from(token.kind());
        let meta = token.meta().cloned();
        Self {
            tag,
            value: Value::from(token),
            meta,
        }
    }

    /// The end-of-stream sentinel
    #[must_use]
    pub fn end_of_stream() -> Self {
        Self::new(END_OF_STREAM_TAG, Value::None)
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Option<SourceMeta>) -> Self {
        self.meta = meta;
        self
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    #[must_use]
    pub const fn meta(&self) -> Option<&SourceMeta> {
        self.meta.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        self.tag == END_OF_STREAM_TAG
    }
}
