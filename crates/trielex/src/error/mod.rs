//! # Error Types
//!
//! Errors raised while configuring a lexicon and while driving the automaton.
//!
//! ## Overview
//!
//! - [`LexiconError`]: configuration errors. They are reported synchronously
//!   when a lexeme is defined or the lexicon is built, before any input is
//!   processed, and are never retried.
//! - [`EngineError`]: internal-consistency failures of a compiled state table
//!   (a state with no matching transition). They point at a defect in the
//!   compiler rather than at bad input.
//! - [`PipelineError`]: everything a [`Tokenizer`](crate::pipeline::Tokenizer)
//!   can return, wrapping the two above.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! for rich error reporting.

use crate::lexeme::Mode;
use compact_str::CompactString;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Lexicon configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexiconError {
    #[error("Lexeme type tag must be a non-empty string")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::invalid_kind)))]
    InvalidKind,

    #[error("Lexeme type tag {kind:?} is reserved")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::reserved_kind)))]
    ReservedKind { kind: CompactString },

    #[error("No default lexeme configured")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(lexicon::missing_default),
            help("set the default lexeme before adding any other lexeme")
        )
    )]
    MissingDefault,

    #[error("Lexeme '{kind}' added before the default lexeme")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(lexicon::lexeme_before_default),
            help("set the default lexeme before adding any other lexeme")
        )
    )]
    LexemeBeforeDefault { kind: CompactString },

    #[error("Default lexeme is already set to '{existing}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::duplicate_default)))]
    DuplicateDefault { existing: CompactString },

    #[error("Lexeme '{kind}' has no pattern")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::missing_pattern)))]
    MissingPattern { kind: CompactString },

    #[error("Default lexeme '{kind}' cannot have a pattern")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::unexpected_pattern)))]
    UnexpectedPattern { kind: CompactString },

    #[error("Lexeme '{kind}' can match an empty symbol sequence")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(lexicon::nullable_pattern),
            help("make at least one element of every alternative non-optional")
        )
    )]
    NullablePattern { kind: CompactString },

    #[error("Lexeme '{kind}': {reason} in {mode} mode")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::pattern_mode_mismatch)))]
    PatternModeMismatch {
        kind: CompactString,
        mode: Mode,
        reason: CompactString,
    },

    #[error("Lexeme '{kind}' has an empty pattern symbol")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::empty_symbol)))]
    EmptySymbol { kind: CompactString },

    #[error("Lexeme '{kind}' uses the reserved symbol {symbol:?}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::reserved_symbol)))]
    ReservedSymbol {
        kind: CompactString,
        symbol: CompactString,
    },

    #[error("Invalid pattern notation {notation:?}: {reason}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::invalid_notation)))]
    InvalidNotation {
        notation: CompactString,
        reason: CompactString,
    },

    #[error("Invalid mode {mode:?}, expected \"character\" or \"token\"")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::invalid_mode)))]
    InvalidMode { mode: CompactString },

    #[error("Lexicon is frozen: lexemes cannot change after compilation")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexicon::frozen)))]
    Frozen,
}

impl LexiconError {
    pub(crate) fn notation(notation: &str, reason: impl Into<CompactString>) -> Self {
        Self::InvalidNotation {
            notation: notation.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn mode_mismatch(kind: &str, mode: Mode, reason: impl Into<CompactString>) -> Self {
        Self::PatternModeMismatch {
            kind: kind.into(),
            mode,
            reason: reason.into(),
        }
    }
}

/// Internal-consistency failure of a compiled state table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum EngineError {
    #[error("No transition out of state '{state}' matches symbol {tag:?}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(engine::no_transition),
            help("every compiled state must end with a catch-all transition")
        )
    )]
    NoTransition {
        state: CompactString,
        tag: CompactString,
    },

    #[error("State {id} is not part of the state table")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(engine::unknown_state)))]
    UnknownState { id: u32 },

    #[error("Lexeme {id} is not part of the lexicon")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(engine::unknown_lexeme)))]
    UnknownLexeme { id: u32 },

    #[error("Accept action in state '{state}' fired with an empty history")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(engine::empty_match)))]
    EmptyMatch { state: CompactString },
}

/// Error returned by a tokenizer pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum PipelineError {
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Engine(#[from] EngineError),

    #[error("A {mode} mode pipeline cannot consume a {found} chunk")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(pipeline::chunk_mismatch)))]
    ChunkMismatch { mode: Mode, found: &'static str },

    #[error("Upstream token kind {kind:?} is reserved for the end-of-stream sentinel")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(pipeline::reserved_token_kind)))]
    ReservedTokenKind { kind: CompactString },

    #[error("State table was compiled for {found} mode but the pipeline is in {expected} mode")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(pipeline::table_mode_mismatch)))]
    TableModeMismatch { expected: Mode, found: Mode },

    #[error("Pipeline already flushed its end of stream")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(pipeline::finished)))]
    Finished,

    #[error("Pipeline stopped after an internal consistency failure")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(pipeline::poisoned)))]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_error_display() {
        let err = LexiconError::LexemeBeforeDefault { kind: "bell".into() };
        assert_eq!(
            err.to_string(),
            "Lexeme 'bell' added before the default lexeme"
        );
    }

    #[test]
    fn test_mode_mismatch_display() {
        let err = LexiconError::mode_mismatch("em", Mode::Token, "literal patterns are not allowed");
        assert_eq!(
            err.to_string(),
            "Lexeme 'em': literal patterns are not allowed in token mode"
        );
    }

    #[test]
    fn test_engine_error_converts_into_pipeline_error() {
        let err: PipelineError = EngineError::NoTransition {
            state: "b/e".into(),
            tag: "x".into(),
        }
        .into();
        assert!(matches!(err, PipelineError::Engine(_)));
        assert_eq!(
            err.to_string(),
            "No transition out of state 'b/e' matches symbol \"x\""
        );
    }
}
