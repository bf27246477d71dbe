use crate::ast::{AnchorKind, CharClass, RegexNode};
use crate::error::{Result, SyntaxError, SyntaxErrorKind};
use crate::lexer::{self, Lexeme, Token};

/// Recursive-descent parser over the lexer's token stream.
///
/// Precedence, loosest first: alternation, concatenation, quantifier.
pub struct Parser<'a> {
    tokens: &'a [Lexeme],
    pos: usize,
    depth: usize,
}

/// Deepest group nesting accepted. Parsing, compiling and dumping all recurse
/// once per level, so this bounds their stack use.
pub const MAX_NESTING: usize = 200;

/// Tokenize and parse `pattern` in one go.
pub fn parse(pattern: &str) -> Result<RegexNode> {
    let tokens = lexer::tokenize(pattern)?;
    Parser::new(&tokens).parse()
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Lexeme]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&'a Lexeme> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.peek()?;
        self.pos += 1;
        Some(lexeme)
    }

    fn at(&self, token: &Token) -> Option<usize> {
        self.peek()
            .filter(|lexeme| lexeme.token == *token)
            .map(|lexeme| lexeme.pos)
    }

    /// Entry point. The whole token stream must form one alternation.
    ///
    /// Example:
    /// - Pattern: `a|b` → Alt([Literal('a'), Literal('b')])
    pub fn parse(&mut self) -> Result<RegexNode> {
        if self.tokens.is_empty() {
            return Err(SyntaxError::new(SyntaxErrorKind::EmptyPattern, 0));
        }
        let node = self.parse_alt()?;
        // Only a `)` can stop the top-level alternation early.
        if let Some(lexeme) = self.peek() {
            return Err(SyntaxError::new(SyntaxErrorKind::UnbalancedGroup, lexeme.pos));
        }
        node.ok_or_else(|| SyntaxError::new(SyntaxErrorKind::EmptyPattern, 0))
    }

    /// Parse alternation (`|`). Returns `None` when there is nothing at all
    /// before the next `)` or the end of input.
    ///
    /// Example:
    /// - Pattern: `a|bc` → Alt([Literal('a'), Concat([Literal('b'), Literal('c')])])
    fn parse_alt(&mut self) -> Result<Option<RegexNode>> {
        let mut branches = Vec::new();
        let mut last_bar = None;
        loop {
            let branch = self.parse_seq()?;
            let next_bar = self.at(&Token::Alternation);
            match branch {
                Some(node) => branches.push(node),
                None => {
                    return match next_bar.or(last_bar) {
                        Some(pos) => Err(SyntaxError::new(
                            SyntaxErrorKind::EmptyAlternationBranch,
                            pos,
                        )),
                        None => Ok(None),
                    };
                }
            }
            match next_bar {
                Some(pos) => {
                    self.advance();
                    last_bar = Some(pos);
                }
                None => break,
            }
        }

        Ok(Some(if branches.len() == 1 {
            branches.remove(0)
        } else {
            RegexNode::Alt(branches)
        }))
    }

    /// Parse a run of quantified atoms (concatenation).
    ///
    /// Example:
    /// - Pattern: `a(b|c)d` → Concat([Literal('a'), Group, Literal('d')])
    fn parse_seq(&mut self) -> Result<Option<RegexNode>> {
        let mut nodes = Vec::new();
        while let Some(lexeme) = self.peek() {
            if matches!(lexeme.token, Token::Alternation | Token::GroupClose) {
                break;
            }
            nodes.push(self.parse_repeat()?);
        }
        Ok(match nodes.len() {
            0 => None,
            1 => nodes.pop(),
            _ => Some(RegexNode::Concat(nodes)),
        })
    }

    /// Parse an atom and at most one quantifier bound to it.
    ///
    /// Example:
    /// - Pattern: `a{2,3}` → Repeat { node: Literal('a'), min: 2, max: Some(3) }
    fn parse_repeat(&mut self) -> Result<RegexNode> {
        let atom = self.parse_atom()?;
        match self.peek().map(|lexeme| &lexeme.token) {
            Some(&Token::Quantifier { min, max }) => {
                self.advance();
                Ok(RegexNode::Repeat {
                    node: Box::new(atom),
                    min,
                    max,
                })
            }
            _ => Ok(atom),
        }
    }

    /// Parse a single atom: literal, class, dot, anchor or parenthesized group.
    fn parse_atom(&mut self) -> Result<RegexNode> {
        let Some(lexeme) = self.advance() else {
            return Err(SyntaxError::new(SyntaxErrorKind::EmptyPattern, 0));
        };
        let node = match &lexeme.token {
            Token::Literal(c) | Token::Escaped(c) => RegexNode::Literal(*c),
            Token::Class(class) => RegexNode::CharClass(class.clone()),
            Token::Shorthand(kind) => RegexNode::CharClass(CharClass::from_shorthand(*kind)),
            Token::Dot => RegexNode::Dot,
            Token::AnchorStart => RegexNode::Anchor(AnchorKind::Start),
            Token::AnchorEnd => RegexNode::Anchor(AnchorKind::End),
            Token::GroupOpen => {
                if self.depth == MAX_NESTING {
                    return Err(SyntaxError::new(SyntaxErrorKind::NestingTooDeep, lexeme.pos));
                }
                self.depth += 1;
                let inner = self.parse_alt()?;
                self.depth -= 1;
                if self.at(&Token::GroupClose).is_none() {
                    return Err(SyntaxError::new(SyntaxErrorKind::UnbalancedGroup, lexeme.pos));
                }
                self.advance();
                let inner = inner
                    .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::EmptyGroup, lexeme.pos))?;
                RegexNode::Group(Box::new(inner))
            }
            Token::Quantifier { .. } => {
                return Err(SyntaxError::new(SyntaxErrorKind::DanglingQuantifier, lexeme.pos));
            }
            Token::GroupClose => {
                return Err(SyntaxError::new(SyntaxErrorKind::UnbalancedGroup, lexeme.pos));
            }
            Token::Alternation => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::EmptyAlternationBranch,
                    lexeme.pos,
                ));
            }
        };
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(pattern: &str) -> String {
        parse(pattern).unwrap().to_string()
    }

    fn error(pattern: &str) -> SyntaxError {
        parse(pattern).unwrap_err()
    }

    #[test]
    fn quantifier_binds_to_group() {
        insta::assert_snapshot!(dump("a(b|c)*d"), @"(concat 'a' (repeat (group (alt 'b' 'c')) 0 inf) 'd')");
    }

    #[test]
    fn alternation_is_loosest() {
        insta::assert_snapshot!(dump("ab|c"), @"(alt (concat 'a' 'b') 'c')");
    }

    #[test]
    fn quantifier_binds_to_last_atom_only() {
        insta::assert_snapshot!(dump("ab+"), @"(concat 'a' (repeat 'b' 1 inf))");
    }

    #[test]
    fn classes_and_shorthands() {
        insta::assert_snapshot!(dump("[^a-z]\\d{2,4}"), @"(concat [^a-z] (repeat [0-9] 2 4))");
    }

    #[test]
    fn anchors_and_dot() {
        insta::assert_snapshot!(dump("^a.?$"), @"(concat ^ 'a' (repeat . 0 1) $)");
    }

    #[test]
    fn escaped_metacharacters_are_literals() {
        insta::assert_snapshot!(dump("\\(\\*"), @"(concat '(' '*')");
    }

    #[test]
    fn single_atom_is_not_wrapped() {
        assert_eq!(parse("x").unwrap(), RegexNode::Literal('x'));
    }

    #[test]
    fn empty_pattern() {
        assert_eq!(error(""), SyntaxError::new(SyntaxErrorKind::EmptyPattern, 0));
    }

    #[test]
    fn unbalanced_groups() {
        assert_eq!(error("(ab"), SyntaxError::new(SyntaxErrorKind::UnbalancedGroup, 0));
        assert_eq!(error("ab)"), SyntaxError::new(SyntaxErrorKind::UnbalancedGroup, 2));
        assert_eq!(error("a(b(c)"), SyntaxError::new(SyntaxErrorKind::UnbalancedGroup, 1));
        assert_eq!(error("()"), SyntaxError::new(SyntaxErrorKind::EmptyGroup, 0));
    }

    #[test]
    fn empty_branches() {
        assert_eq!(error("a||b"), SyntaxError::new(SyntaxErrorKind::EmptyAlternationBranch, 2));
        assert_eq!(error("|a"), SyntaxError::new(SyntaxErrorKind::EmptyAlternationBranch, 0));
        assert_eq!(error("a|"), SyntaxError::new(SyntaxErrorKind::EmptyAlternationBranch, 1));
        assert_eq!(error("(a|)"), SyntaxError::new(SyntaxErrorKind::EmptyAlternationBranch, 2));
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&nested(MAX_NESTING)).is_ok());
        assert_eq!(
            parse(&nested(MAX_NESTING + 1)).unwrap_err(),
            SyntaxError::new(SyntaxErrorKind::NestingTooDeep, MAX_NESTING)
        );
        assert_eq!(
            parse(&nested(100_000)).unwrap_err().kind,
            SyntaxErrorKind::NestingTooDeep
        );
    }

    #[test]
    fn dangling_quantifiers() {
        assert_eq!(error("*a"), SyntaxError::new(SyntaxErrorKind::DanglingQuantifier, 0));
        assert_eq!(error("a|+b"), SyntaxError::new(SyntaxErrorKind::DanglingQuantifier, 2));
        assert_eq!(error("(?a)"), SyntaxError::new(SyntaxErrorKind::DanglingQuantifier, 1));
        assert_eq!(error("a**"), SyntaxError::new(SyntaxErrorKind::DanglingQuantifier, 2));
    }
}
