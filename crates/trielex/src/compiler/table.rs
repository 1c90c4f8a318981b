use crate::lexeme::{Lexeme, LexemeId, Mode};
use crate::lexicon::Lexicon;
use crate::token::{Symbol, Tag};
use compact_str::CompactString;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// Index of a state in a [`StateTable`]
///
/// Uses u32, which is far more than any lexicon produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

impl StateId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A small ordered set of tags
pub type TagSet = SmallVec<[Tag; 4]>;

/// Predicate a transition applies to the tag of the incoming symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Exactly this tag
    Exact(Tag),
    /// Any of these tags; empty matches nothing
    OneOf(TagSet),
    /// Any tag except these
    Excluding(TagSet),
}

impl Criterion {
    #[must_use]
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            Self::Exact(t) => t == tag,
            Self::OneOf(tags) => tags.iter().any(|t| t == tag),
            Self::Excluding(tags) => !tags.iter().any(|t| t == tag),
        }
    }

    /// Whether no tag at all satisfies the criterion
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::OneOf(tags) if tags.is_empty())
    }
}

/// Accept action carried by a transition, resolved through the lexicon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accept {
    /// Emit the lexeme's full-match token
    FullMatch(LexemeId),
    /// Emit the lexeme's partial-match token
    PartialMatch(LexemeId),
}

impl Accept {
    #[inline]
    #[must_use]
    pub const fn lexeme(self) -> LexemeId {
        match self {
            Self::FullMatch(id) | Self::PartialMatch(id) => id,
        }
    }
}

/// Where a transition came from in the trie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Self-loop of a repeat point
    Loop,
    /// Edge to a child node
    Child,
    /// Injected fallback, always last
    CatchAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub criterion: Criterion,
    pub target: StateId,
    pub accept: Option<Accept>,
    /// Present the same symbol again from the initial state once the
    /// accept action has fired
    pub replay: bool,
}

impl Transition {
    /// Whether this transition is taken for `symbol`.
    ///
    /// The end-of-stream sentinel is only ever taken by catch-all
    /// transitions.
    #[must_use]
    pub fn accepts(&self, symbol: &Symbol) -> bool {
        if symbol.is_end_of_stream() {
            return self.kind == TransitionKind::CatchAll;
        }
        self.criterion.matches(symbol.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledState {
    pub name: CompactString,
    pub is_initial: bool,
    pub is_terminal_reset: bool,
    /// Evaluated in order; the catch-all comes last
    pub transitions: Vec<Transition>,
}

impl CompiledState {
    /// The transition taken for `symbol`
    #[must_use]
    pub fn transition(&self, symbol: &Symbol) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.accepts(symbol))
    }

    /// The transitions whose criteria match `symbol`; exactly one in a
    /// well-formed table
    pub fn matching<'a>(&'a self, symbol: &'a Symbol) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| t.accepts(symbol))
    }
}

/// The flat, frozen output of the pattern compiler.
///
/// Read-only after construction; wrap it in an `Arc` to share it between
/// several automata.
#[derive(Debug, Clone)]
pub struct StateTable {
    pub(super) states: Vec<CompiledState>,
    pub(super) by_name: HashMap<CompactString, StateId, ahash::RandomState>,
    pub(super) initial: StateId,
    pub(super) terminal: StateId,
    pub(super) lexicon: Lexicon,
}

impl StateTable {
    #[inline]
    #[must_use]
    pub const fn initial(&self) -> StateId {
        self.initial
    }

    /// The reserved reset state every accepting transition leads to
    #[inline]
    #[must_use]
    pub const fn terminal(&self) -> StateId {
        self.terminal
    }

    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&CompiledState> {
        self.states.get(id.index())
    }

    #[must_use]
    pub fn state_by_name(&self, name: &str) -> Option<(StateId, &CompiledState)> {
        let id = *self.by_name.get(name)?;
        self.state(id).map(|state| (id, state))
    }

    /// States in emission order: the initial state first, the reset state
    /// last
    #[must_use]
    pub fn states(&self) -> &[CompiledState] {
        &self.states
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    #[must_use]
    pub fn lexeme(&self, id: LexemeId) -> Option<&Lexeme> {
        self.lexicon.lexeme(id)
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.lexicon.mode()
    }

    /// Total number of transitions across all states
    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }
}

impl PartialEq for StateTable {
    /// Tables are equal when their states and transitions are, whatever
    /// lexicon instance they were compiled from.
    fn eq(&self, other: &Self) -> bool {
        self.initial == other.initial
            && self.terminal == other.terminal
            && self.states == other.states
    }
}

impl Eq for StateTable {}
