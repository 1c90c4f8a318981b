use crate::lexeme::Mode;
use compact_str::CompactString;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Which characters a character-mode pipeline segments out of raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum SpecialChars {
    /// No segmentation: every chunk is a single `text` symbol
    #[default]
    None,
    /// Exactly these characters
    Explicit(Vec<char>),
    /// Every single-character symbol the lexicon's patterns mention
    FromLexicon,
}

/// Configuration for a [`Tokenizer`](super::Tokenizer)
///
/// # Example
///
/// ```rust
/// use trielex::pipeline::{SpecialChars, TokenizerConfig};
/// use trielex::lexeme::Mode;
///
/// let config = TokenizerConfig::character()
///     .with_special_chars(['_', '*', '\n'])
///     .with_file("README.md");
/// assert_eq!(config.mode, Mode::Character);
/// assert_eq!(config.special_chars, SpecialChars::Explicit(vec!['_', '*', '\n']));
///
/// let second_pass = TokenizerConfig::token();
/// assert_eq!(second_pass.mode, Mode::Token);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct TokenizerConfig {
    pub mode: Mode,
    /// Ignored in token mode
    pub special_chars: SpecialChars,
    /// Recorded in the source metadata of character-mode symbols
    pub file: Option<CompactString>,
}

impl TokenizerConfig {
    #[must_use]
    pub fn character() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token() -> Self {
        Self {
            mode: Mode::Token,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_special_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.special_chars = SpecialChars::Explicit(chars.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_lexicon_special_chars(mut self) -> Self {
        self.special_chars = SpecialChars::FromLexicon;
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<CompactString>) -> Self {
        self.file = Some(file.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TokenizerConfig::default();
        assert_eq!(config.mode, Mode::Character);
        assert_eq!(config.special_chars, SpecialChars::None);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_lexicon_special_chars() {
        let config = TokenizerConfig::character().with_lexicon_special_chars();
        assert_eq!(config.special_chars, SpecialChars::FromLexicon);
    }
}
