//! # Pattern Compiler
//!
//! Turns a [`Lexicon`] into a flat, deterministic [`StateTable`].
//!
//! ## Overview
//!
//! Compilation runs in two phases:
//!
//! 1. **Trie construction** ([`trie`]): every pattern is merged into a
//!    shared-prefix tree. Optional elements add a skip branch, repeated
//!    elements mark their node as a self-loop and alternations recurse once per
//!    alternative with the shared tail appended.
//! 2. **Flattening**: each node that can still consume input becomes a
//!    [`CompiledState`]. Its transitions are, in order, the self-loop of a
//!    repeat point, one transition per child and a final catch-all.
//!
//! While flattening, every transition is narrowed to the tags no earlier
//! transition of the same state takes. The catch-all gets whatever is left, so
//! exactly one transition matches any symbol in any state. Child transitions
//! left with nothing to match are unreachable and dropped.
//!
//! ## Accept actions
//!
//! | Transition | Accept | Consumes the symbol |
//! |---|---|---|
//! | into a leaf | full match of the completing lexeme | yes |
//! | catch-all of the root | full match of the default lexeme | yes |
//! | catch-all of a completing node | full match of the completing lexeme | no, replayed |
//! | catch-all of any other node | partial match | no, replayed |
//!
//! A partial match is resolved by the lexeme that created the node when it
//! defines a partial-match attribute, and by the default lexeme otherwise.

pub mod dot;
mod table;
pub mod trie;

pub use table::{
    Accept, CompiledState, Criterion, StateId, StateTable, TagSet, Transition, TransitionKind,
};
pub use trie::{RESET_STATE, ROOT_STATE};

use crate::lexeme::LexemeId;
use crate::lexicon::Lexicon;
use hashbrown::HashMap;
use trie::{NodeCriterion, NodeId, PatternNode, PatternTrie};
use tracing::debug;

/// Compile a lexicon into its state table.
pub(crate) fn compile(lexicon: &Lexicon) -> StateTable {
    let mut trie = PatternTrie::new(lexicon.default_lexeme().id());
    for lexeme in lexicon.pattern_lexemes() {
        trie.insert(lexeme);
    }
    let table = flatten(&trie, lexicon);
    debug!(
        mode = %lexicon.mode(),
        lexemes = lexicon.len(),
        nodes = trie.len(),
        states = table.len(),
        transitions = table.transition_count(),
        "compiled lexicon"
    );
    table
}

fn flatten(trie: &PatternTrie, lexicon: &Lexicon) -> StateTable {
    let mut state_of: Vec<Option<StateId>> = Vec::with_capacity(trie.len());
    let mut next = 0u32;
    for (id, node) in trie.nodes() {
        if id == NodeId::ROOT || !node.is_leaf() {
            state_of.push(Some(StateId(next)));
            next += 1;
        } else {
            state_of.push(None);
        }
    }
    let initial = StateId(0);
    let terminal = StateId(next);

    let mut states = Vec::with_capacity(next as usize + 1);
    for (id, node) in trie.nodes() {
        let Some(state) = state_of[id.index()] else {
            continue;
        };
        let transitions = state_transitions(trie, lexicon, id, node, state, &state_of, terminal);
        states.push(CompiledState {
            name: node.name.clone(),
            is_initial: id == NodeId::ROOT,
            is_terminal_reset: false,
            transitions,
        });
    }
    states.push(CompiledState {
        name: RESET_STATE.into(),
        is_initial: false,
        is_terminal_reset: true,
        transitions: vec![Transition {
            kind: TransitionKind::CatchAll,
            criterion: Criterion::Excluding(TagSet::new()),
            target: initial,
            accept: None,
            replay: true,
        }],
    });

    let mut by_name = HashMap::with_capacity_and_hasher(states.len(), ahash::RandomState::new());
    for (i, state) in states.iter().enumerate() {
        by_name.insert(state.name.clone(), StateId(u32::try_from(i).unwrap_or(u32::MAX)));
    }

    StateTable {
        states,
        by_name,
        initial,
        terminal,
        lexicon: lexicon.clone(),
    }
}

fn state_transitions(
    trie: &PatternTrie,
    lexicon: &Lexicon,
    id: NodeId,
    node: &PatternNode,
    state: StateId,
    state_of: &[Option<StateId>],
    terminal: StateId,
) -> Vec<Transition> {
    let mut transitions = Vec::with_capacity(node.children.len() + 2);
    let mut covered = SymbolSet::none();

    if node.repeat {
        let raw = SymbolSet::of(&node.criterion);
        covered = covered.union(&raw);
        transitions.push(Transition {
            kind: TransitionKind::Loop,
            criterion: raw.into_criterion(),
            target: state,
            accept: None,
            replay: false,
        });
    }

    for &child_id in &node.children {
        let Some(child) = trie.node(child_id) else {
            continue;
        };
        let raw = SymbolSet::of(&child.criterion);
        let effective = raw.minus(&covered);
        if effective.is_empty() {
            debug!(
                from = %node.name,
                to = %child.name,
                "dropping unreachable transition"
            );
            continue;
        }
        covered = covered.union(&raw);

        let (target, accept) = match state_of[child_id.index()] {
            Some(target) => (target, None),
            None => {
                let accept = child
                    .full_match
                    .map_or_else(|| Accept::PartialMatch(partial_owner(lexicon, child)), Accept::FullMatch);
                (terminal, Some(accept))
            }
        };
        transitions.push(Transition {
            kind: TransitionKind::Child,
            criterion: effective.into_criterion(),
            target,
            accept,
            replay: false,
        });
    }

    let (accept, replay) = if id == NodeId::ROOT {
        (Accept::FullMatch(lexicon.default_lexeme().id()), false)
    } else {
        let accept = node
            .full_match
            .map_or_else(|| Accept::PartialMatch(partial_owner(lexicon, node)), Accept::FullMatch);
        (accept, true)
    };
    transitions.push(Transition {
        kind: TransitionKind::CatchAll,
        criterion: covered.complement().into_criterion(),
        target: terminal,
        accept: Some(accept),
        replay,
    });

    transitions
}

/// The lexeme whose partial-match attribute resolves a stalled match at
/// `node`.
fn partial_owner(lexicon: &Lexicon, node: &PatternNode) -> LexemeId {
    match lexicon.lexeme(node.owner) {
        Some(owner) if owner.own_partial_match().is_some() => owner.id(),
        _ => lexicon.default_lexeme().id(),
    }
}

/// A set of tags that is either finite or cofinite.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SymbolSet {
    Only(TagSet),
    AllBut(TagSet),
}

impl SymbolSet {
    fn none() -> Self {
        Self::Only(TagSet::new())
    }

    fn of(criterion: &NodeCriterion) -> Self {
        match criterion {
            NodeCriterion::Root => Self::none(),
            NodeCriterion::Exact(tag) => Self::Only(std::iter::once(tag.clone()).collect()),
            NodeCriterion::Excluding(tag) => Self::AllBut(std::iter::once(tag.clone()).collect()),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Only(tags) if tags.is_empty())
    }

    fn complement(self) -> Self {
        match self {
            Self::Only(tags) => Self::AllBut(tags),
            Self::AllBut(tags) => Self::Only(tags),
        }
    }

    fn union(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Only(a), Self::Only(b)) => Self::Only(merge(a, b)),
            (Self::Only(a), Self::AllBut(b)) | (Self::AllBut(b), Self::Only(a)) => {
                Self::AllBut(without(b, a))
            }
            (Self::AllBut(a), Self::AllBut(b)) => Self::AllBut(within(a, b)),
        }
    }

    fn minus(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Only(a), Self::Only(b)) => Self::Only(without(a, b)),
            (Self::Only(a), Self::AllBut(b)) => Self::Only(within(a, b)),
            (Self::AllBut(a), Self::Only(b)) => Self::AllBut(merge(a, b)),
            (Self::AllBut(a), Self::AllBut(b)) => Self::Only(without(b, a)),
        }
    }

    fn into_criterion(self) -> Criterion {
        match self {
            Self::Only(mut tags) if tags.len() == 1 => match tags.pop() {
                Some(tag) => Criterion::Exact(tag),
                None => Criterion::OneOf(tags),
            },
            Self::Only(tags) => Criterion::OneOf(tags),
            Self::AllBut(tags) => Criterion::Excluding(tags),
        }
    }
}

/// `a ∪ b`, keeping the order of `a` then the new tags of `b`
fn merge(a: &TagSet, b: &TagSet) -> TagSet {
    let mut out = a.clone();
    out.extend(b.iter().filter(|t| !a.contains(t)).cloned());
    out
}

/// `a \ b`
fn without(a: &TagSet, b: &TagSet) -> TagSet {
    a.iter().filter(|t| !b.contains(t)).cloned().collect()
}

/// `a ∩ b`
fn within(a: &TagSet, b: &TagSet) -> TagSet {
    a.iter().filter(|t| b.contains(t)).cloned().collect()
}

/// Drop the catch-all of the state called `name`, leaving a table that is no
/// longer total.
#[cfg(test)]
pub(crate) fn without_catch_all(mut table: StateTable, name: &str) -> StateTable {
    if let Some(state) = table.states.iter_mut().find(|state| state.name == name) {
        state
            .transitions
            .retain(|t| t.kind != TransitionKind::CatchAll);
    }
    table
}
