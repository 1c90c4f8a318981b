use super::{Chunk, Stage};
use crate::error::PipelineError;
use crate::token::Token;
use std::collections::VecDeque;

/// Iterator yielding the tokens of a stage one at a time.
///
/// Chunks are pulled from the input only when the tokens of the previous
/// chunk are used up. When the input runs out the stage is flushed once.
/// After an error the iterator yields nothing more.
///
/// Dropping the iterator early does not flush the stage: a trailing partial
/// match stays pending. Stop with [`Tokens::finish`] instead, or call
/// [`Stage::finish`] on the stage afterwards.
///
/// # Example
///
/// ```rust
/// use trielex::pipeline::{Chunk, Stage, Tokenizer, TokenizerConfig};
/// use trielex::lexeme::LexemeDef;
///
/// let mut tokenizer = Tokenizer::new(TokenizerConfig::character());
/// tokenizer.set_default_lexeme(LexemeDef::fallback("line"))?;
///
/// let lines = ["first", "second"].map(Chunk::Text);
/// let kinds: Vec<_> = tokenizer
///     .tokens(lines)
///     .map(|token| token.map(|t| t.text().to_string()))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(kinds, ["first", "second"]);
/// # Ok::<(), trielex::error::PipelineError>(())
/// ```
#[derive(Debug)]
pub struct Tokens<'s, S, I> {
    stage: &'s mut S,
    input: I,
    ready: VecDeque<Token>,
    done: bool,
}

impl<'s, S, I> Tokens<'s, S, I> {
    pub(super) fn new(stage: &'s mut S, input: I) -> Self {
        Self {
            stage,
            input,
            ready: VecDeque::new(),
            done: false,
        }
    }
}

impl<S: Stage, I> Tokens<'_, S, I> {
    /// Stop reading input and flush the stage.
    ///
    /// Returns the tokens already produced but not yet yielded, followed by
    /// whatever the flush resolves. The rest of the input is left unread.
    ///
    /// # Errors
    ///
    /// See [`Stage::finish`].
    pub fn finish(mut self) -> Result<Vec<Token>, PipelineError> {
        let mut tokens: Vec<Token> = self.ready.drain(..).collect();
        if !self.done {
            tokens.extend(self.stage.finish()?);
        }
        Ok(tokens)
    }
}

impl<'a, S, I> Iterator for Tokens<'_, S, I>
where
    S: Stage,
    I: Iterator<Item = Chunk<'a>>,
{
    type Item = Result<Token, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.ready.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }
            let result = match self.input.next() {
                Some(chunk) => self.stage.consume(chunk),
                None => {
                    self.done = true;
                    self.stage.finish()
                }
            };
            match result {
                Ok(tokens) => self.ready.extend(tokens),
                Err(err) => {
                    self.done = true;
                    self.ready.clear();
                    return Some(Err(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexeme::{Attribute, LexemeDef, Pattern};
    use crate::pipeline::{Chunk, Stage, Tokenizer, TokenizerConfig};
    use crate::token::Token;

    #[test]
    fn test_tokens_flush_at_end() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_special_chars(['-']));
        tokenizer
            .set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
            .unwrap();
        tokenizer
            .add_lexeme(LexemeDef::new("hr", Pattern::literal("---")))
            .unwrap();

        let chunks = ["a-", "-"].map(Chunk::Text);
        let tokens: Vec<Token> = tokenizer.tokens(chunks).collect::<Result<_, _>>().unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text().to_string()).collect();
        assert_eq!(texts, ["a", "--"]);
    }

    #[test]
    fn test_early_stop_still_flushes() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::character().with_special_chars(['-']));
        tokenizer
            .set_default_lexeme(LexemeDef::fallback("text").partial_match(Attribute::Concat))
            .unwrap();
        tokenizer
            .add_lexeme(LexemeDef::new("hr", Pattern::literal("---")))
            .unwrap();

        let chunks = ["a-", "-", "never read"].map(Chunk::Text);
        let mut tokens = tokenizer.tokens(chunks);
        let first = tokens.next().unwrap().unwrap();
        assert_eq!(first.text(), "a");

        // Stop with `-` still pending
        let rest = tokens.finish().unwrap();
        let texts: Vec<_> = rest.iter().map(|t| t.text().to_string()).collect();
        assert_eq!(texts, ["-"]);
        assert!(tokenizer.finish().unwrap().is_empty());
    }

    #[test]
    fn test_tokens_stop_after_error() {
        let mut tokenizer = Tokenizer::new(TokenizerConfig::token());
        tokenizer.set_default_lexeme(LexemeDef::fallback("text")).unwrap();
        let chunks = [Chunk::Text("oops"), Chunk::Text("again")];
        let mut tokens = tokenizer.tokens(chunks);
        assert!(matches!(tokens.next(), Some(Err(_))));
        assert!(tokens.next().is_none());
    }
}
