use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexNode {
    Literal(char),
    CharClass(CharClass),
    /// Any single character, newline included.
    Dot,
    Anchor(AnchorKind),
    Concat(Vec<RegexNode>),
    Alt(Vec<RegexNode>),
    /// Precedence only; groups do not capture.
    Group(Box<RegexNode>),
    /// `max == None` is unbounded. The parser guarantees `min <= max`.
    Repeat {
        node: Box<RegexNode>,
        min: u32,
        max: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandKind {
    Digit,
    Word,
    Space,
}

impl ShorthandKind {
    pub fn from_escape(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Digit),
            'w' => Some(Self::Word),
            's' => Some(Self::Space),
            _ => None,
        }
    }

    /// Adds the members of this shorthand (ASCII only) to `class`.
    pub fn extend_class(self, class: &mut CharClass) {
        match self {
            Self::Digit => class.ranges.push(('0', '9')),
            Self::Word => {
                class.ranges.extend([('a', 'z'), ('A', 'Z'), ('0', '9')]);
                class.chars.push('_');
            }
            Self::Space => class
                .chars
                .extend([' ', '\t', '\r', '\n', '\x0C', '\x0B']),
        }
    }
}

/// A bracketed set of characters: single members plus inclusive ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharClass {
    pub chars: Vec<char>,
    pub ranges: Vec<(char, char)>,
    pub negated: bool,
}

impl CharClass {
    pub fn from_shorthand(kind: ShorthandKind) -> Self {
        let mut class = Self::default();
        kind.extend_class(&mut class);
        class
    }

    pub fn matches(&self, c: char) -> bool {
        let contains = self.chars.contains(&c)
            || self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi);
        contains != self.negated
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.negated {
            f.write_str("^")?;
        }
        for c in &self.chars {
            write!(f, "{}", c.escape_debug())?;
        }
        for (lo, hi) in &self.ranges {
            write!(f, "{}-{}", lo.escape_debug(), hi.escape_debug())?;
        }
        f.write_str("]")
    }
}

/// S-expression dump, e.g. `(concat 'a' (repeat [0-9] 1 inf))`.
impl fmt::Display for RegexNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexNode::Literal(c) => write!(f, "{c:?}"),
            RegexNode::CharClass(class) => write!(f, "{class}"),
            RegexNode::Dot => f.write_str("."),
            RegexNode::Anchor(AnchorKind::Start) => f.write_str("^"),
            RegexNode::Anchor(AnchorKind::End) => f.write_str("$"),
            RegexNode::Concat(nodes) => write_list(f, "concat", nodes),
            RegexNode::Alt(nodes) => write_list(f, "alt", nodes),
            RegexNode::Group(node) => write!(f, "(group {node})"),
            RegexNode::Repeat { node, min, max } => match max {
                Some(max) => write!(f, "(repeat {node} {min} {max})"),
                None => write!(f, "(repeat {node} {min} inf)"),
            },
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, head: &str, nodes: &[RegexNode]) -> fmt::Result {
    write!(f, "({head}")?;
    for node in nodes {
        write!(f, " {node}")?;
    }
    f.write_str(")")
}
