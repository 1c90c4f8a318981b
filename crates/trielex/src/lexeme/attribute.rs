use crate::engine::History;
use crate::token::{Symbol, Value};
use std::fmt;
use std::sync::Arc;

/// User-supplied attribute derivation.
///
/// Receives the history of the match and the match's final symbol.
pub type AttributeFn = Arc<dyn Fn(&History, &Symbol) -> Value + Send + Sync>;

/// How a lexeme derives the attribute value of the tokens it emits.
///
/// # Example
///
/// ```rust
/// use trielex::lexeme::Attribute;
/// use trielex::token::Value;
///
/// // Count the symbols in the match
/// let count = Attribute::function(|history, _input| Value::from(history.len().to_string()));
/// let marker = Attribute::constant(Value::None);
/// # let _ = (count, marker);
/// ```
#[derive(Clone, Default)]
pub enum Attribute {
    /// The value of the match's final symbol
    #[default]
    Input,
    /// A fixed value
    Constant(Value),
    /// The text of every symbol in the match, concatenated
    Concat,
    /// The value of every symbol in the match, in order
    Collect,
    /// A user function of the history and the final symbol
    Function(AttributeFn),
}

impl Attribute {
    #[must_use]
    pub fn function(f: impl Fn(&History, &Symbol) -> Value + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// Derive the attribute value for a match.
    #[must_use]
    pub fn evaluate(&self, history: &History, input: &Symbol) -> Value {
        match self {
            Self::Input => input.value().clone(),
            Self::Constant(value) => value.clone(),
            Self::Concat => Value::Text(history.text()),
            Self::Collect => Value::List(history.symbols().map(|s| s.value().clone()).collect()),
            Self::Function(f) => f(history, input),
        }
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("Input"),
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Concat => f.write_str("Concat"),
            Self::Collect => f.write_str("Collect"),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(symbols: &[&str]) -> History {
        let mut history = History::default();
        for s in symbols {
            history.push("state", Symbol::text(*s));
        }
        history
    }

    #[test]
    fn test_input_attribute() {
        let input = Symbol::text("x");
        let value = Attribute::Input.evaluate(&history(&["b", "x"]), &input);
        assert_eq!(value, Value::from("x"));
    }

    #[test]
    fn test_constant_attribute() {
        let value = Attribute::constant("[").evaluate(&history(&["["]), &Symbol::text("["));
        assert_eq!(value, Value::from("["));
    }

    #[test]
    fn test_concat_attribute() {
        let value = Attribute::Concat.evaluate(&history(&["b", "e", "x"]), &Symbol::text("x"));
        assert_eq!(value, Value::from("bex"));
    }

    #[test]
    fn test_collect_attribute() {
        let value = Attribute::Collect.evaluate(&history(&["a", "b"]), &Symbol::text("b"));
        assert_eq!(value, Value::List(vec![Value::from("a"), Value::from("b")]));
    }

    #[test]
    fn test_function_attribute() {
        let attribute = Attribute::function(|history, _| Value::from(history.len().to_string()));
        let value = attribute.evaluate(&history(&["a", "b", "c"]), &Symbol::text("c"));
        assert_eq!(value, Value::from("3"));
        assert_eq!(format!("{attribute:?}"), "Function(..)");
    }
}
