use crate::ast::{AnchorKind, CharClass};

/// Index of a state inside the `Nfa` that owns it.
pub type StateId = usize;

/// What a transition needs to be taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Consumes nothing.
    Epsilon,
    Char(char),
    Class(CharClass),
    AnyChar,
    /// Consumes nothing, but only passable at a string boundary.
    Anchor(AnchorKind),
}

impl Label {
    /// For consuming labels: does `c` satisfy it?
    pub fn accepts(&self, c: char) -> bool {
        match self {
            Label::Char(expected) => *expected == c,
            Label::Class(class) => class.matches(c),
            Label::AnyChar => true,
            Label::Epsilon | Label::Anchor(_) => false,
        }
    }

    /// For non-consuming labels: may the cursor `at` pass it in a string of
    /// `len` characters?
    pub fn passable(&self, at: usize, len: usize) -> bool {
        match self {
            Label::Epsilon => true,
            Label::Anchor(AnchorKind::Start) => at == 0,
            Label::Anchor(AnchorKind::End) => at == len,
            Label::Char(_) | Label::Class(_) | Label::AnyChar => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub label: Label,
    pub target: StateId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub transitions: Vec<Transition>,
}

/// A compiled pattern: an immutable state graph with a single start and a
/// single accepting state.
///
/// Matching only reads from it, so one `Nfa` can serve any number of
/// queries, from any number of threads.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    accept: StateId,
}

impl Nfa {
    pub(crate) fn from_parts(states: Vec<State>, start: StateId, accept: StateId) -> Self {
        Self {
            states,
            start,
            accept,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn transitions(&self, id: StateId) -> &[Transition] {
        &self.states[id].transitions
    }
}
