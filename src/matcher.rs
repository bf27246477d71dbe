use std::iter::FusedIterator;
use std::ops::Range;

use log::trace;

use crate::nfa::{Nfa, StateId};

/// A successful match over the original input. Offsets count characters and
/// the end is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    text: String,
    start: usize,
    end: usize,
}

impl Match {
    fn new(input: &[char], start: usize, end: usize) -> Self {
        Self {
            text: input[start..end].iter().collect(),
            start,
            end,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The set of live NFA states, with insertion order kept so exploration is
/// deterministic.
#[derive(Debug, Clone)]
pub struct StateSet {
    members: Vec<StateId>,
    present: Vec<bool>,
}

impl StateSet {
    /// An empty set able to hold any state of an automaton with `capacity` states.
    pub fn new(capacity: usize) -> Self {
        Self {
            members: Vec::new(),
            present: vec![false; capacity],
        }
    }

    /// Returns `false` if `id` was already a member.
    pub fn insert(&mut self, id: StateId) -> bool {
        if self.present[id] {
            return false;
        }
        self.present[id] = true;
        self.members.push(id);
        true
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.present.get(id).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.members.iter().copied()
    }
}

/// Everything reachable from `seeds` without consuming input while the
/// cursor sits at `at` in a string of `len` characters.
fn closure(nfa: &Nfa, seeds: impl IntoIterator<Item = StateId>, at: usize, len: usize) -> StateSet {
    let mut set = StateSet::new(nfa.len());
    let mut stack = Vec::new();
    for seed in seeds {
        if set.insert(seed) {
            stack.push(seed);
        }
    }
    while let Some(id) = stack.pop() {
        for transition in nfa.transitions(id) {
            if transition.label.passable(at, len) && set.insert(transition.target) {
                stack.push(transition.target);
            }
        }
    }
    set
}

/// Consume `input[at]` from an already closed set and close the result at `at + 1`.
fn advance(nfa: &Nfa, closed: &StateSet, at: usize, input: &[char]) -> StateSet {
    let Some(&c) = input.get(at) else {
        return StateSet::new(nfa.len());
    };
    let targets = closed
        .iter()
        .flat_map(|id| nfa.transitions(id))
        .filter(|transition| transition.label.accepts(c))
        .map(|transition| transition.target);
    closure(nfa, targets, at + 1, input.len())
}

/// One simulation step: close `states` at `at`, consume `input[at]`, and
/// return the closure of everything that consumed it. Empty once `at` is at
/// or past the end of the input.
pub fn step_set(nfa: &Nfa, states: &StateSet, at: usize, input: &[char]) -> StateSet {
    let closed = closure(nfa, states.iter(), at, input.len());
    advance(nfa, &closed, at, input)
}

/// Run forward from `start` and return the furthest position at which the
/// accepting state was live.
fn longest_match_at(nfa: &Nfa, input: &[char], start: usize) -> Option<usize> {
    let mut current = closure(nfa, [nfa.start()], start, input.len());
    let mut longest = current.contains(nfa.accept()).then_some(start);
    for at in start..input.len() {
        if current.is_empty() {
            break;
        }
        current = advance(nfa, &current, at, input);
        if current.contains(nfa.accept()) {
            longest = Some(at + 1);
        }
    }
    longest
}

/// Leftmost start at or after `from`, longest extent at that start.
fn search_from(nfa: &Nfa, input: &[char], from: usize) -> Option<Match> {
    (from..=input.len()).find_map(|start| {
        let end = longest_match_at(nfa, input, start)?;
        trace!("match at {start}..{end}");
        Some(Match::new(input, start, end))
    })
}

impl Nfa {
    /// Match the whole of `input`. Anchors still refer to the real string
    /// boundaries.
    pub fn full_match(&self, input: &str) -> Option<Match> {
        let chars: Vec<char> = input.chars().collect();
        match longest_match_at(self, &chars, 0) {
            Some(end) if end == chars.len() => Some(Match::new(&chars, 0, end)),
            _ => None,
        }
    }

    /// Find the leftmost match in `input`, taking the longest one at that start.
    pub fn search(&self, input: &str) -> Option<Match> {
        let chars: Vec<char> = input.chars().collect();
        search_from(self, &chars, 0)
    }

    /// All non-overlapping matches, left to right.
    pub fn find_all(&self, input: &str) -> Matches<'_> {
        Matches {
            nfa: self,
            input: input.chars().collect(),
            cursor: 0,
        }
    }
}

/// Lazy iterator returned by [`Nfa::find_all`]. Cloning it restarts from the
/// clone's current position.
#[derive(Debug, Clone)]
pub struct Matches<'n> {
    nfa: &'n Nfa,
    input: Vec<char>,
    cursor: usize,
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.cursor > self.input.len() {
            return None;
        }
        let Some(found) = search_from(self.nfa, &self.input, self.cursor) else {
            self.cursor = self.input.len() + 1;
            return None;
        };
        // An empty match must still move the cursor forward.
        self.cursor = if found.is_empty() {
            found.end + 1
        } else {
            found.end
        };
        trace!("find_all resumes at {}", self.cursor);
        Some(found)
    }
}

impl FusedIterator for Matches<'_> {}
