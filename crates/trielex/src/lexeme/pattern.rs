use crate::token::Tag;

/// One step of a lexeme pattern.
///
/// An element matches a single symbol by tag. Modifiers:
///
/// - `optional`: the element may be skipped
/// - `repeat`: the element may consume one or more consecutive symbols
/// - `inverted`: the element matches any symbol *except* its own
///
/// # Example
///
/// ```rust
/// use trielex::lexeme::PatternElement;
///
/// let element = PatternElement::new("l").optional().repeat();
/// assert!(element.is_optional());
/// assert!(element.is_repeat());
/// assert!(!element.is_inverted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternElement {
    symbol: Tag,
    optional: bool,
    repeat: bool,
    inverted: bool,
}

impl PatternElement {
    #[must_use]
    pub fn new(symbol: impl Into<Tag>) -> Self {
        Self {
            symbol: symbol.into(),
            optional: false,
            repeat: false,
            inverted: false,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn repeat(mut self) -> Self {
        self.repeat = true;
        self
    }

    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    #[inline]
    #[must_use]
    pub const fn is_repeat(&self) -> bool {
        self.repeat
    }

    #[inline]
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.inverted
    }
}

/// An item of a pattern sequence: a single element, or a group of
/// alternative sequences that each continue with the rest of the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternItem {
    Element(PatternElement),
    Alternation(Vec<Vec<PatternItem>>),
}

impl PatternItem {
    /// Whether this item can match without consuming any symbol
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Element(element) => element.is_optional(),
            Self::Alternation(alternatives) => {
                alternatives.iter().any(|alt| is_nullable_sequence(alt))
            }
        }
    }

    /// Visit every element of this item, depth first
    pub fn for_each_element<'a>(&'a self, f: &mut impl FnMut(&'a PatternElement)) {
        match self {
            Self::Element(element) => f(element),
            Self::Alternation(alternatives) => {
                for item in alternatives.iter().flatten() {
                    item.for_each_element(f);
                }
            }
        }
    }
}

impl From<PatternElement> for PatternItem {
    fn from(element: PatternElement) -> Self {
        Self::Element(element)
    }
}

pub(crate) fn is_nullable_sequence(items: &[PatternItem]) -> bool {
    items.iter().all(PatternItem::is_nullable)
}

/// The pattern of a lexeme.
///
/// # Example
///
/// ```rust
/// use trielex::lexeme::{Pattern, PatternElement};
///
/// // Character-mode shorthand: one element per character
/// let strong = Pattern::literal("**");
///
/// // An explicit sequence
/// let em_text = Pattern::sequence([
///     PatternElement::new("em"),
///     PatternElement::new("text").repeat(),
///     PatternElement::new("em"),
/// ]);
///
/// // The same sequence in compact notation
/// assert_eq!(Pattern::notation("em, text+, em").unwrap(), em_text);
/// # let _ = strong;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// A literal symbol string, expanded to one element per character.
    /// Only valid in character mode.
    Literal(Tag),
    /// An ordered sequence of items
    Sequence(Vec<PatternItem>),
    /// Alternative sequences, any of which completes the match
    Alternation(Vec<Vec<PatternItem>>),
}

impl Pattern {
    #[must_use]
    pub fn literal(text: impl Into<Tag>) -> Self {
        Self::Literal(text.into())
    }

    #[must_use]
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PatternItem>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn alternation<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator,
        S::Item: Into<PatternItem>,
    {
        Self::Alternation(
            alternatives
                .into_iter()
                .map(|alt| alt.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Parse a pattern written in compact notation.
    ///
    /// Elements are separated by `,`. An element is a symbol with an optional
    /// `!` prefix (inverted) and any of the suffixes `?` (optional), `+`
    /// (repeat) and `*` (optional and repeat). Parentheses group alternatives
    /// separated by `|`; a group may carry `?`. A top-level `|` makes the
    /// whole pattern an alternation. Whitespace around elements is ignored;
    /// `\` escapes the next character, with `\n`, `\t` and `\r` standing for
    /// the control characters.
    ///
    /// ```rust
    /// use trielex::lexeme::Pattern;
    ///
    /// let bell = Pattern::notation("b, e?, l*, a*, x+").unwrap();
    /// let link = Pattern::notation("(open-bracket | image-open), text+, close-bracket").unwrap();
    /// let newline = Pattern::notation(r"\n, !\n+, \n").unwrap();
    /// # let _ = (bell, link, newline);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::InvalidNotation`](crate::error::LexiconError::InvalidNotation)
    /// for empty elements, unbalanced parentheses, repeated groups or a
    /// trailing escape.
    pub fn notation(notation: &str) -> Result<Self, crate::error::LexiconError> {
        super::notation::parse(notation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_modifiers() {
        let element = PatternElement::new("e").inverted().repeat();
        assert_eq!(element.symbol(), "e");
        assert!(element.is_inverted());
        assert!(element.is_repeat());
        assert!(!element.is_optional());
    }

    #[test]
    fn test_nullable_sequence() {
        let all_optional = vec![
            PatternItem::from(PatternElement::new("a").optional()),
            PatternItem::from(PatternElement::new("b").optional().repeat()),
        ];
        assert!(is_nullable_sequence(&all_optional));

        let required = vec![
            PatternItem::from(PatternElement::new("a").optional()),
            PatternItem::from(PatternElement::new("b").repeat()),
        ];
        assert!(!is_nullable_sequence(&required));
    }

    #[test]
    fn test_nullable_alternation() {
        let group = PatternItem::Alternation(vec![
            vec![PatternElement::new("a").into()],
            vec![],
        ]);
        assert!(group.is_nullable());
    }

    #[test]
    fn test_for_each_element_visits_groups() {
        let group = PatternItem::Alternation(vec![
            vec![PatternElement::new("a").into()],
            vec![PatternElement::new("b").into(), PatternElement::new("c").into()],
        ]);
        let mut seen = Vec::new();
        group.for_each_element(&mut |element| seen.push(element.symbol().to_owned()));
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn test_alternation_constructor() {
        let pattern = Pattern::alternation([
            vec![PatternElement::new("open-bracket")],
            vec![PatternElement::new("image-open")],
        ]);
        match pattern {
            Pattern::Alternation(alternatives) => assert_eq!(alternatives.len(), 2),
            _ => panic!("Expected Alternation pattern"),
        }
    }
}
