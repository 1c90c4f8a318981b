use crate::lexeme::{Lexeme, LexemeId, PatternElement, PatternItem};
use crate::token::Tag;
use compact_str::{CompactString, format_compact};
use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::debug;

/// Reserved name of the root state
pub const ROOT_STATE: &str = "<root>";

/// Reserved name of the terminal reset state
pub const RESET_STATE: &str = "<reset>";

/// Index of a node in a [`PatternTrie`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node matches on the edge from its parent
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeCriterion {
    Root,
    Exact(Tag),
    Excluding(Tag),
}

impl NodeCriterion {
    fn of(element: &PatternElement) -> Self {
        if element.is_inverted() {
            Self::Excluding(element.symbol().into())
        } else {
            Self::Exact(element.symbol().into())
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternNode {
    pub criterion: NodeCriterion,
    /// Path of symbols from the root, unique within the trie
    pub name: CompactString,
    /// Carries a self-loop
    pub repeat: bool,
    pub children: SmallVec<[NodeId; 4]>,
    /// The lexeme whose pattern created the node
    pub owner: LexemeId,
    /// The lexeme completing at this node
    pub full_match: Option<LexemeId>,
}

impl PatternNode {
    /// A node with nothing to do after its own symbol
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && !self.repeat
    }
}

/// Shared-prefix tree of every pattern in a lexicon, stored as an arena.
///
/// Siblings never share a criterion: a pattern that runs along an existing
/// path reuses its nodes. The catch-all child every node receives is implicit
/// and materialized when the trie is flattened.
#[derive(Debug, Clone)]
pub struct PatternTrie {
    nodes: Vec<PatternNode>,
    names: HashSet<CompactString, ahash::RandomState>,
}

impl PatternTrie {
    #[must_use]
    pub fn new(default: LexemeId) -> Self {
        let mut names = HashSet::with_hasher(ahash::RandomState::new());
        names.insert(CompactString::const_new(ROOT_STATE));
        names.insert(CompactString::const_new(RESET_STATE));
        Self {
            nodes: vec![PatternNode {
                criterion: NodeCriterion::Root,
                name: CompactString::const_new(ROOT_STATE),
                repeat: false,
                children: SmallVec::new(),
                owner: default,
                full_match: None,
            }],
            names,
        }
    }

    /// Merge a lexeme's pattern into the trie.
    pub fn insert(&mut self, lexeme: &Lexeme) {
        self.insert_sequence(NodeId::ROOT, lexeme.items(), lexeme);
    }

    fn insert_sequence(&mut self, at: NodeId, items: &[PatternItem], lexeme: &Lexeme) {
        match items.split_first() {
            None => self.complete(at, lexeme),
            Some((PatternItem::Alternation(alternatives), rest)) => {
                for alternative in alternatives {
                    let branch: Vec<PatternItem> =
                        alternative.iter().chain(rest).cloned().collect();
                    self.insert_sequence(at, &branch, lexeme);
                }
            }
            Some((PatternItem::Element(element), rest)) => {
                let child = self.child(at, element, lexeme.id());
                if element.is_repeat() {
                    self.nodes[child.index()].repeat = true;
                }
                self.insert_sequence(child, rest, lexeme);
                if element.is_optional() {
                    self.insert_sequence(at, rest, lexeme);
                }
            }
        }
    }

    fn complete(&mut self, at: NodeId, lexeme: &Lexeme) {
        if at == NodeId::ROOT {
            debug!(kind = lexeme.kind(), "ignoring empty pattern path");
            return;
        }
        let node = &mut self.nodes[at.index()];
        if let Some(replaced) = node.full_match.replace(lexeme.id())
            && replaced != lexeme.id()
        {
            debug!(
                state = %node.name,
                replaced = replaced.0,
                kind = lexeme.kind(),
                "pattern already completes here; the later lexeme takes over"
            );
        }
    }

    /// Find the child of `parent` matching `element`, creating it if needed.
    fn child(&mut self, parent: NodeId, element: &PatternElement, owner: LexemeId) -> NodeId {
        let criterion = NodeCriterion::of(element);
        let existing = self.nodes[parent.index()]
            .children
            .iter()
            .copied()
            .find(|&id| self.nodes[id.index()].criterion == criterion);
        if let Some(id) = existing {
            return id;
        }

        let name = self.unique_name(parent, element);
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(PatternNode {
            criterion,
            name,
            repeat: false,
            children: SmallVec::new(),
            owner,
            full_match: None,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn unique_name(&mut self, parent: NodeId, element: &PatternElement) -> CompactString {
        let bang = if element.is_inverted() { "!" } else { "" };
        let base = if parent == NodeId::ROOT {
            format_compact!("{bang}{}", element.symbol())
        } else {
            format_compact!("{}/{bang}{}", self.nodes[parent.index()].name, element.symbol())
        };
        let mut name = base.clone();
        let mut n = 1;
        while self.names.contains(&name) {
            n += 1;
            name = format_compact!("{base}#{n}");
        }
        self.names.insert(name.clone());
        name
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&PatternNode> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn root(&self) -> &PatternNode {
        &self.nodes[0]
    }

    /// Nodes in creation order, root first
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &PatternNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(u32::try_from(i).unwrap_or(u32::MAX)), node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexeme::{LexemeDef, Mode, Pattern};

    fn lexeme(id: u32, kind: &str, notation: &str, mode: Mode) -> Lexeme {
        let def = LexemeDef::new(kind, Pattern::notation(notation).unwrap());
        Lexeme::from_def(LexemeId(id), def, mode).unwrap()
    }

    fn find<'a>(trie: &'a PatternTrie, name: &str) -> &'a PatternNode {
        trie.nodes()
            .map(|(_, node)| node)
            .find(|node| node.name == name)
            .unwrap_or_else(|| panic!("no node named {name}"))
    }

    #[test]
    fn test_shared_prefix_is_merged() {
        let mut trie = PatternTrie::new(LexemeId(0));
        trie.insert(&lexeme(1, "ab", "a, b", Mode::Character));
        trie.insert(&lexeme(2, "ac", "a, c", Mode::Character));
        // root, a, a/b, a/c
        assert_eq!(trie.len(), 4);
        assert_eq!(trie.root().children.len(), 1);
        let a = find(&trie, "a");
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.owner, LexemeId(1));
        assert_eq!(find(&trie, "a/b").full_match, Some(LexemeId(1)));
        assert_eq!(find(&trie, "a/c").full_match, Some(LexemeId(2)));
        assert!(find(&trie, "a/c").is_leaf());
    }

    #[test]
    fn test_optional_creates_skip_branch() {
        let mut trie = PatternTrie::new(LexemeId(0));
        trie.insert(&lexeme(1, "bx", "b, e?, x", Mode::Character));
        assert_eq!(find(&trie, "b/e/x").full_match, Some(LexemeId(1)));
        assert_eq!(find(&trie, "b/x").full_match, Some(LexemeId(1)));
        assert_eq!(find(&trie, "b/e").full_match, None);
    }

    #[test]
    fn test_repeat_marks_node() {
        let mut trie = PatternTrie::new(LexemeId(0));
        trie.insert(&lexeme(1, "bell", "b, l*, x+", Mode::Character));
        let l = find(&trie, "b/l");
        assert!(l.repeat);
        assert!(!l.is_leaf());
        let x = find(&trie, "b/x");
        assert!(x.repeat);
        assert_eq!(x.full_match, Some(LexemeId(1)));
        assert!(!x.is_leaf());
        assert!(!find(&trie, "b").repeat);
    }

    #[test]
    fn test_alternation_branches_share_tail() {
        let mut trie = PatternTrie::new(LexemeId(0));
        trie.insert(&lexeme(
            1,
            "link",
            "(open-bracket | image-open), text+, close-bracket",
            Mode::Token,
        ));
        assert_eq!(trie.root().children.len(), 2);
        assert_eq!(
            find(&trie, "open-bracket/text/close-bracket").full_match,
            Some(LexemeId(1))
        );
        assert_eq!(
            find(&trie, "image-open/text/close-bracket").full_match,
            Some(LexemeId(1))
        );
    }

    #[test]
    fn test_inverted_element_is_distinct_sibling() {
        let mut trie = PatternTrie::new(LexemeId(0));
        trie.insert(&lexeme(1, "line", r"\n, !\n+, \n", Mode::Character));
        trie.insert(&lexeme(2, "blank", r"\n, \n", Mode::Character));
        let newline = find(&trie, "\n");
        assert_eq!(newline.children.len(), 2);
        let inverted = find(&trie, "\n/!\n");
        assert_eq!(inverted.criterion, NodeCriterion::Excluding("\n".into()));
        assert!(inverted.repeat);
    }

    #[test]
    fn test_later_lexeme_takes_full_match() {
        let mut trie = PatternTrie::new(LexemeId(0));
        trie.insert(&lexeme(1, "first", "a, b", Mode::Character));
        trie.insert(&lexeme(2, "second", "a, b", Mode::Character));
        assert_eq!(find(&trie, "a/b").full_match, Some(LexemeId(2)));
        // Owner stays with the lexeme that created the node
        assert_eq!(find(&trie, "a/b").owner, LexemeId(1));
    }

    #[test]
    fn test_colliding_names_get_suffix() {
        let mut trie = PatternTrie::new(LexemeId(0));
        trie.insert(&lexeme(1, "slash", "a/b", Mode::Token));
        trie.insert(&lexeme(2, "path", "a, b", Mode::Token));
        assert_eq!(find(&trie, "a/b").full_match, Some(LexemeId(1)));
        assert_eq!(find(&trie, "a/b#2").full_match, Some(LexemeId(2)));
    }
}
