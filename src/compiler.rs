use crate::ast::RegexNode;
use crate::nfa::{Label, Nfa, State, StateId, Transition};

/// Build a Thompson NFA for `ast`.
pub fn build(ast: &RegexNode) -> Nfa {
    Compiler::new().compile(ast)
}

/// A partially built automaton piece: one way in, one way out.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    end: StateId,
}

/// Lowers an AST into NFA states, one fragment per node.
///
/// Counted repetition is unrolled into copies of the repeated fragment, so
/// every state means the same thing no matter how it was reached.
pub struct Compiler {
    states: Vec<State>,
}

impl Compiler {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    pub fn compile(mut self, ast: &RegexNode) -> Nfa {
        let fragment = self.compile_node(ast);
        Nfa::from_parts(self.states, fragment.start, fragment.end)
    }

    fn add_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(State::default());
        id
    }

    fn connect(&mut self, from: StateId, label: Label, to: StateId) {
        self.states[from].transitions.push(Transition { label, target: to });
    }

    fn epsilon(&mut self, from: StateId, to: StateId) {
        self.connect(from, Label::Epsilon, to);
    }

    fn compile_node(&mut self, node: &RegexNode) -> Fragment {
        match node {
            RegexNode::Literal(c) => self.compile_label(Label::Char(*c)),
            RegexNode::CharClass(class) => self.compile_label(Label::Class(class.clone())),
            RegexNode::Dot => self.compile_label(Label::AnyChar),
            RegexNode::Anchor(kind) => self.compile_label(Label::Anchor(*kind)),
            RegexNode::Concat(nodes) => self.compile_concat(nodes),
            RegexNode::Alt(branches) => self.compile_alternation(branches),
            RegexNode::Group(inner) => self.compile_node(inner),
            RegexNode::Repeat { node, min, max } => self.compile_repetition(node, *min, *max),
        }
    }

    /// Two states joined by a single transition.
    fn compile_label(&mut self, label: Label) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        self.connect(start, label, end);
        Fragment { start, end }
    }

    /// Matches the empty string and nothing else.
    fn compile_empty(&mut self) -> Fragment {
        self.compile_label(Label::Epsilon)
    }

    fn compile_concat(&mut self, nodes: &[RegexNode]) -> Fragment {
        let mut fragments = nodes.iter().map(|node| self.compile_node(node)).collect::<Vec<_>>();
        if fragments.is_empty() {
            return self.compile_empty();
        }
        let first = fragments.remove(0);
        fragments
            .into_iter()
            .fold(first, |acc, next| self.join(acc, next))
    }

    /// `a` then `b`: a's exit falls through into b's entry.
    fn join(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.epsilon(a.end, b.start);
        Fragment {
            start: a.start,
            end: b.end,
        }
    }

    fn compile_alternation(&mut self, branches: &[RegexNode]) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        for branch in branches {
            let fragment = self.compile_node(branch);
            self.epsilon(start, fragment.start);
            self.epsilon(fragment.end, end);
        }
        Fragment { start, end }
    }

    fn compile_repetition(&mut self, node: &RegexNode, min: u32, max: Option<u32>) -> Fragment {
        let mut mandatory = None;
        for _ in 0..min {
            let copy = self.compile_node(node);
            mandatory = Some(match mandatory {
                Some(acc) => self.join(acc, copy),
                None => copy,
            });
        }

        let tail = match max {
            None => Some(self.compile_star(node)),
            Some(max) => self.compile_optional_chain(node, max - min),
        };

        match (mandatory, tail) {
            (Some(head), Some(tail)) => self.join(head, tail),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => self.compile_empty(),
        }
    }

    /// Kleene star: zero or more copies of `node`.
    fn compile_star(&mut self, node: &RegexNode) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        let body = self.compile_node(node);
        self.epsilon(start, body.start);
        self.epsilon(body.end, body.start);
        self.epsilon(body.end, end);
        self.epsilon(start, end);
        Fragment { start, end }
    }

    /// Up to `count` further copies of `node`. Skipping copy `i` skips all
    /// the copies after it too, so each count is reachable by one path only.
    fn compile_optional_chain(&mut self, node: &RegexNode, count: u32) -> Option<Fragment> {
        let mut rest: Option<Fragment> = None;
        for _ in 0..count {
            let start = self.add_state();
            let end = self.add_state();
            let copy = self.compile_node(node);
            self.epsilon(start, copy.start);
            self.epsilon(start, end);
            match rest {
                Some(rest) => {
                    self.epsilon(copy.end, rest.start);
                    self.epsilon(rest.end, end);
                }
                None => self.epsilon(copy.end, end),
            }
            rest = Some(Fragment { start, end });
        }
        rest
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
