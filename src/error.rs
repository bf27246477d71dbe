/// Everything that can go wrong while turning a pattern into an automaton.
///
/// Matching itself never fails; only lexing and parsing produce errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("empty pattern")]
    EmptyPattern,
    #[error("unterminated character class")]
    UnterminatedClass,
    #[error("trailing backslash")]
    TrailingEscape,
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
    #[error("invalid class range '{0}-{1}'")]
    InvalidRange(char, char),
    #[error("malformed repetition quantifier")]
    MalformedQuantifier,
    #[error("invalid repetition range {{{min},{max}}}")]
    InvalidQuantifierRange { min: u32, max: u32 },
    #[error("unbalanced parenthesis")]
    UnbalancedGroup,
    #[error("empty group")]
    EmptyGroup,
    #[error("groups nested too deeply")]
    NestingTooDeep,
    #[error("empty alternation branch")]
    EmptyAlternationBranch,
    #[error("quantifier has nothing to repeat")]
    DanglingQuantifier,
}

/// A pattern error together with the character index where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at position {position}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub position: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

pub type Result<T> = std::result::Result<T, SyntaxError>;
