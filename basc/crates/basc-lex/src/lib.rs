//! basc-lex - Lexical Analyzer for the BASIC dialects
//!
//! Turns source text into a [`Token`] stream for `basc-par`. Handles both
//! dialect `L` (legacy) and dialect `S` (superset) surface syntax: multi-word
//! merged keywords (`end if`, `for each`, ...), type-designator sigils,
//! `&h`/`&H` hex literals, `""`-escaped strings, backtick template strings
//! with `${...}` interpolation, and `#const`/`#if`/`#else if`/`#else`/
//! `#end if`/`#error` conditional compilation.

pub mod cursor;
#[cfg(test)]
mod edge_cases;
pub mod lexer;
pub mod token;
pub mod unicode;

pub use lexer::Lexer;
pub use token::{Literal, Token, TokenKind};
