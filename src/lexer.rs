use crate::ast::{CharClass, ShorthandKind};
use crate::error::{Result, SyntaxError, SyntaxErrorKind};

/// Characters that may follow a backslash to stand for themselves.
const ESCAPABLE: &str = r"\.()[]{}|*+?^$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    /// A metacharacter made literal with `\`.
    Escaped(char),
    /// A whole `[...]` class, already resolved into members and ranges.
    Class(CharClass),
    Shorthand(ShorthandKind),
    /// `*`, `+`, `?` and `{..}` all normalize to a bounds pair.
    Quantifier { min: u32, max: Option<u32> },
    Alternation,
    GroupOpen,
    GroupClose,
    AnchorStart,
    AnchorEnd,
    Dot,
}

/// A token and the character index it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub pos: usize,
}

enum ClassItem {
    Char(char),
    Shorthand(ShorthandKind),
}

/// Split `pattern` into tokens.
///
/// Character classes and counted repetitions are validated here, so the
/// parser only deals with structure.
pub fn tokenize(pattern: &str) -> Result<Vec<Lexeme>> {
    let mut lexer = Lexer::new(pattern);
    let mut lexemes = Vec::new();
    while let Some(lexeme) = lexer.next_lexeme()? {
        lexemes.push(lexeme);
    }
    Ok(lexemes)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(pattern: &str) -> Self {
        Self {
            chars: pattern.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn error(kind: SyntaxErrorKind, pos: usize) -> SyntaxError {
        SyntaxError::new(kind, pos)
    }

    fn next_lexeme(&mut self) -> Result<Option<Lexeme>> {
        let pos = self.pos;
        let Some(ch) = self.advance() else {
            return Ok(None);
        };
        let token = match ch {
            '\\' => self.escape(pos)?,
            '[' => self.class(pos)?,
            '{' => self.repetition(pos)?,
            '*' => Token::Quantifier { min: 0, max: None },
            '+' => Token::Quantifier { min: 1, max: None },
            '?' => Token::Quantifier {
                min: 0,
                max: Some(1),
            },
            '|' => Token::Alternation,
            '(' => Token::GroupOpen,
            ')' => Token::GroupClose,
            '^' => Token::AnchorStart,
            '$' => Token::AnchorEnd,
            '.' => Token::Dot,
            c => Token::Literal(c),
        };
        Ok(Some(Lexeme { token, pos }))
    }

    /// `\d`, `\w`, `\s` or an escaped metacharacter. `start` is the backslash.
    fn escape(&mut self, start: usize) -> Result<Token> {
        let ch = self
            .advance()
            .ok_or_else(|| Self::error(SyntaxErrorKind::TrailingEscape, start))?;
        if let Some(kind) = ShorthandKind::from_escape(ch) {
            return Ok(Token::Shorthand(kind));
        }
        if ESCAPABLE.contains(ch) {
            Ok(Token::Escaped(ch))
        } else {
            Err(Self::error(SyntaxErrorKind::UnknownEscape(ch), start))
        }
    }

    /// Lex the body of a class; the opening `[` at `open` is already consumed.
    fn class(&mut self, open: usize) -> Result<Token> {
        let mut class = CharClass::default();
        if self.peek() == Some('^') {
            self.advance();
            class.negated = true;
        }

        loop {
            let item_pos = self.pos;
            let item = match self.advance() {
                None => return Err(Self::error(SyntaxErrorKind::UnterminatedClass, open)),
                Some(']') => return Ok(Token::Class(class)),
                Some('\\') => self.class_escape(item_pos)?,
                Some(c) => ClassItem::Char(c),
            };
            let lo = match item {
                ClassItem::Shorthand(kind) => {
                    kind.extend_class(&mut class);
                    continue;
                }
                ClassItem::Char(c) => c,
            };

            // `-` is a range operator only between two members.
            let is_range =
                self.peek() == Some('-') && !matches!(self.peek_nth(1), None | Some(']'));
            if !is_range {
                class.chars.push(lo);
                continue;
            }
            self.advance();
            let hi_pos = self.pos;
            let hi = match self.advance() {
                Some('\\') => self.class_escape(hi_pos)?,
                Some(c) => ClassItem::Char(c),
                None => return Err(Self::error(SyntaxErrorKind::UnterminatedClass, open)),
            };
            match hi {
                ClassItem::Char(hi) if lo <= hi => class.ranges.push((lo, hi)),
                ClassItem::Char(hi) => {
                    return Err(Self::error(SyntaxErrorKind::InvalidRange(lo, hi), item_pos));
                }
                // `a-\d` cannot be a range; keep both ends and the dash.
                ClassItem::Shorthand(kind) => {
                    class.chars.extend([lo, '-']);
                    kind.extend_class(&mut class);
                }
            }
        }
    }

    fn class_escape(&mut self, start: usize) -> Result<ClassItem> {
        let ch = self
            .advance()
            .ok_or_else(|| Self::error(SyntaxErrorKind::TrailingEscape, start))?;
        if let Some(kind) = ShorthandKind::from_escape(ch) {
            Ok(ClassItem::Shorthand(kind))
        } else if ch == '-' || ESCAPABLE.contains(ch) {
            Ok(ClassItem::Char(ch))
        } else {
            Err(Self::error(SyntaxErrorKind::UnknownEscape(ch), start))
        }
    }

    /// `{n}`, `{n,}`, `{,m}` or `{n,m}`; the `{` at `open` is already consumed.
    fn repetition(&mut self, open: usize) -> Result<Token> {
        let malformed = || Self::error(SyntaxErrorKind::MalformedQuantifier, open);

        let lower = self.number(open)?;
        let (min, max) = if self.peek() == Some(',') {
            self.advance();
            (lower.unwrap_or(0), self.number(open)?)
        } else {
            let exact = lower.ok_or_else(malformed)?;
            (exact, Some(exact))
        };
        if self.advance() != Some('}') {
            return Err(malformed());
        }

        match max {
            Some(max) if min > max => Err(Self::error(
                SyntaxErrorKind::InvalidQuantifierRange { min, max },
                open,
            )),
            _ => Ok(Token::Quantifier { min, max }),
        }
    }

    fn number(&mut self, open: usize) -> Result<Option<u32>> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if start == self.pos {
            return Ok(None);
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map(Some)
            .map_err(|_| Self::error(SyntaxErrorKind::MalformedQuantifier, open))
    }
}
