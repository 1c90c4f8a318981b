use super::Token;
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// The attribute value carried by a symbol or derived for a token.
///
/// Character-mode symbols carry [`Value::Text`]; token-mode symbols carry the
/// whole upstream token as [`Value::Token`], so composite tokens built by a
/// second pass can keep the primitive tokens they were made of.
///
/// # Example
///
/// ```rust
/// use trielex::token::{Token, Value};
///
/// let value = Value::List(vec![Value::from("a"), Value::from(Token::new("text", "b"))]);
/// assert_eq!(value.to_text(), "ab");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Value {
    /// No value
    #[default]
    None,
    /// A run of text
    Text(CompactString),
    /// An upstream token
    Token(Box<Token>),
    /// A sequence of values, in match order
    List(Vec<Value>),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The text if this is a [`Value::Text`]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The token if this is a [`Value::Token`]
    #[must_use]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    /// The items if this is a [`Value::List`]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Flatten the value to text.
    ///
    /// Tokens contribute the text of their own value and lists contribute the
    /// concatenation of their items. `None` contributes nothing.
    #[must_use]
    pub fn to_text(&self) -> CompactString {
        let mut out = CompactString::default();
        self.write_text(&mut out);
        out
    }

    pub(crate) fn write_text(&self, out: &mut CompactString) {
        match self {
            Self::None => {}
            Self::Text(text) => out.push_str(text),
            Self::Token(token) => token.value().write_text(out),
            Self::List(items) => {
                for item in items {
                    item.write_text(out);
                }
            }
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text.into())
    }
}

impl From<CompactString> for Value {
    fn from(text: CompactString) -> Self {
        Self::Text(text)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        let mut buf = [0u8; 4];
        Self::Text(CompactString::from(&*c.encode_utf8(&mut buf)))
    }
}

impl From<Token> for Value {
    fn from(token: Token) -> Self {
        Self::Token(Box::new(token))
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_default_is_none() {
        assert!(Value::default().is_none());
        assert_eq!(Value::None.to_text(), "");
    }

    #[test]
    fn test_value_from_char() {
        assert_eq!(Value::from('é').as_text(), Some("é"));
    }

    #[test]
    fn test_value_accessors() {
        let token = Token::new("em", Value::None);
        let value = Value::from(token.clone());
        assert_eq!(value.as_token(), Some(&token));
        assert!(value.as_text().is_none());
        assert!(value.as_list().is_none());
    }

    #[test]
    fn test_list_to_text_flattens_tokens() {
        let value = Value::from(vec![
            Value::from("["),
            Value::from(Token::new("text", "label")),
            Value::None,
            Value::from(vec![Value::from("]")]),
        ]);
        assert_eq!(value.to_text(), "[label]");
    }
}
