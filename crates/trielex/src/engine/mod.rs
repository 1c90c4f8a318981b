//! # Automaton Engine
//!
//! Drives a compiled [`StateTable`] one symbol at a time.
//!
//! ## Overview
//!
//! An [`Automaton`] owns its current state and the [`History`] of the match in
//! progress; the table itself is shared and read-only. Each call to
//! [`Automaton::step`] takes the single transition matching the symbol and
//! reports what happened through a [`Signal`]:
//!
//! - [`Signal::Continue`]: the symbol was consumed and the match goes on.
//! - [`Signal::Reset`]: an accept action fired, a token was emitted and the
//!   automaton is back at its initial state. The symbol is spent.
//! - [`Signal::Replay`]: a catch-all resolved the match in progress without
//!   consuming the symbol. The caller must present the same symbol again.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use trielex::engine::{Automaton, Signal};
//! use trielex::lexicon::LexiconBuilder;
//! use trielex::lexeme::{LexemeDef, Mode, Pattern};
//! use trielex::token::Symbol;
//!
//! let table = LexiconBuilder::new(Mode::Character)
//!     .default_lexeme(LexemeDef::fallback("text"))
//!     .lexeme(LexemeDef::new("hr", Pattern::literal("--")))
//!     .build()
//!     .unwrap()
//!     .compile();
//! let mut automaton = Automaton::new(Arc::new(table));
//!
//! let step = automaton.step(&Symbol::special('-')).unwrap();
//! assert_eq!(step.signal, Signal::Continue);
//! let step = automaton.step(&Symbol::special('-')).unwrap();
//! assert_eq!(step.signal, Signal::Reset);
//! assert_eq!(step.token.unwrap().kind(), "hr");
//! ```

use crate::compiler::{Accept, StateId, StateTable};
use crate::error::EngineError;
use crate::token::{Symbol, Token};
use compact_str::CompactString;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::trace;

/// One consumed symbol and the state it was consumed in
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub state: CompactString,
    pub symbol: Symbol,
}

/// The symbols consumed toward the match in progress, in order.
///
/// Cleared whenever the automaton returns to its initial state. Accept actions
/// receive it to rebuild everything their match consumed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    visits: SmallVec<[Visit; 8]>,
}

impl History {
    pub(crate) fn push(&mut self, state: &str, symbol: Symbol) {
        self.visits.push(Visit {
            state: state.into(),
            symbol,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.visits.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Visit> {
        self.visits.iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Visit> {
        self.visits.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Visit> {
        self.visits.last()
    }

    /// The consumed symbols, in order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.visits.iter().map(|visit| &visit.symbol)
    }

    /// The text of every consumed symbol, concatenated
    #[must_use]
    pub fn text(&self) -> CompactString {
        let mut text = CompactString::default();
        for symbol in self.symbols() {
            symbol.value().write_text(&mut text);
        }
        text
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Visit;
    type IntoIter = std::slice::Iter<'a, Visit>;

    fn into_iter(self) -> Self::IntoIter {
        self.visits.iter()
    }
}

/// Outcome of a step, see the [module documentation](self)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Reset,
    Replay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The token emitted by an accept action, if one fired
    pub token: Option<Token>,
    pub signal: Signal,
    /// The state the automaton is in after the step
    pub next: StateId,
}

/// Executes a shared state table over a symbol stream.
///
/// Each automaton exclusively owns its current state and history; only the
/// table is shared.
#[derive(Debug, Clone)]
pub struct Automaton {
    table: Arc<StateTable>,
    current: StateId,
    history: History,
}

impl Automaton {
    #[must_use]
    pub fn new(table: Arc<StateTable>) -> Self {
        let current = table.initial();
        Self {
            table,
            current,
            history: History::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn table(&self) -> &Arc<StateTable> {
        &self.table
    }

    #[inline]
    #[must_use]
    pub const fn current(&self) -> StateId {
        self.current
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Whether the automaton is at its initial state with nothing pending
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.current == self.table.initial() && self.history.is_empty()
    }

    /// Return to the initial state, dropping the match in progress.
    pub fn reset(&mut self) {
        self.current = self.table.initial();
        self.history.clear();
    }

    /// Take the transition matching `symbol` out of the current state.
    ///
    /// The end-of-stream sentinel is a no-op at the initial state; anywhere
    /// else it resolves the match in progress and is never replayed.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the table is inconsistent: no transition
    /// matches, or a transition refers to a state or lexeme that does not
    /// exist. The automaton is left unchanged.
    pub fn step(&mut self, symbol: &Symbol) -> Result<Step, EngineError> {
        let table = Arc::clone(&self.table);
        let state = table
            .state(self.current)
            .ok_or(EngineError::UnknownState { id: self.current.0 })?;

        if symbol.is_end_of_stream() && state.is_initial {
            return Ok(self.finish_step(None, Signal::Continue));
        }

        let transition = state.transition(symbol).ok_or_else(|| EngineError::NoTransition {
            state: state.name.clone(),
            tag: symbol.tag().into(),
        })?;
        trace!(state = %state.name, tag = symbol.tag(), kind = ?transition.kind, "step");

        if table.state(transition.target).is_none() {
            return Err(EngineError::UnknownState {
                id: transition.target.0,
            });
        }

        let Some(accept) = transition.accept else {
            if transition.replay {
                self.reset();
                return Ok(self.finish_step(None, Signal::Replay));
            }
            self.history.push(&state.name, symbol.clone());
            self.current = transition.target;
            return Ok(self.finish_step(None, Signal::Continue));
        };

        if transition.replay {
            // The symbol does not belong to the match being resolved
            let token = self.fire(accept, &state.name)?;
            self.reset();
            let signal = if symbol.is_end_of_stream() {
                Signal::Reset
            } else {
                Signal::Replay
            };
            return Ok(self.finish_step(Some(token), signal));
        }

        self.history.push(&state.name, symbol.clone());
        let token = match self.fire(accept, &state.name) {
            Ok(token) => token,
            Err(err) => {
                self.history.visits.pop();
                return Err(err);
            }
        };
        self.reset();
        Ok(self.finish_step(Some(token), Signal::Reset))
    }

    fn finish_step(&self, token: Option<Token>, signal: Signal) -> Step {
        if let Some(token) = &token {
            trace!(kind = token.kind(), value = ?token.value(), "emit");
        }
        Step {
            token,
            signal,
            next: self.current,
        }
    }

    /// Run an accept action over the current history.
    fn fire(&self, accept: Accept, state: &str) -> Result<Token, EngineError> {
        let lexeme = self
            .table
            .lexeme(accept.lexeme())
            .ok_or(EngineError::UnknownLexeme {
                id: accept.lexeme().0,
            })?;
        let (first, last) = match (self.history.first(), self.history.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(EngineError::EmptyMatch { state: state.into() }),
        };
        let attribute = match accept {
            Accept::FullMatch(_) => lexeme.full_match(),
            Accept::PartialMatch(_) => lexeme.partial_match(),
        };
        let value = attribute.evaluate(&self.history, &last.symbol);
        Ok(Token::new(lexeme.kind(), value).with_meta(first.symbol.meta().cloned()))
    }
}
