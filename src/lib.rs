//! A small regular-expression engine: patterns are parsed into an AST,
//! compiled into a Thompson NFA, and matched by simulating every live state
//! at once, so there is no backtracking.
//!
//! ```
//! let nfa = nfa_grep::compile("a.c").unwrap();
//! let m = nfa.search("xxabcxx").unwrap();
//! assert_eq!((m.as_str(), m.start(), m.end()), ("abc", 2, 5));
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod nfa;
pub mod parser;

use log::debug;

pub use error::{Result, SyntaxError, SyntaxErrorKind};
pub use matcher::{Match, Matches};
pub use nfa::Nfa;

/// Compile `pattern` into an automaton that can be queried any number of times.
pub fn compile(pattern: &str) -> Result<Nfa> {
    let tokens = lexer::tokenize(pattern)?;
    let ast = parser::Parser::new(&tokens).parse()?;
    let nfa = compiler::build(&ast);
    debug!(
        "compiled {pattern:?}: {} tokens, {} states",
        tokens.len(),
        nfa.len()
    );
    Ok(nfa)
}

/// Match `pattern` against the whole of `input`.
pub fn full_match(pattern: &str, input: &str) -> Result<Option<Match>> {
    Ok(compile(pattern)?.full_match(input))
}

/// Find the leftmost-longest match of `pattern` in `input`.
pub fn search(pattern: &str, input: &str) -> Result<Option<Match>> {
    Ok(compile(pattern)?.search(input))
}

/// Collect every non-overlapping match of `pattern` in `input`.
pub fn find_all(pattern: &str, input: &str) -> Result<Vec<Match>> {
    Ok(compile(pattern)?.find_all(input).collect())
}

/// Does `pattern` occur anywhere in `input`?
pub fn is_match(pattern: &str, input: &str) -> Result<bool> {
    Ok(compile(pattern)?.search(input).is_some())
}
