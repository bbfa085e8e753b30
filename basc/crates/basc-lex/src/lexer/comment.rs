//! Comment lexing.
//!
//! BASIC comments run from a `'` or a statement-initial `rem` to the end of
//! the line; there is no block-comment form. Unlike most lexers, comments
//! here ARE emitted as a token (`TokenKind::Comment`) rather than discarded
//! as trivia, so the parser can preserve them as `Stmt::Comment` nodes.

use crate::token::{Token, TokenKind};

use super::core::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a `'`-led or `rem`-led comment up to (but not including) the
    /// terminating newline. Assumes the caller already confirmed the cursor
    /// is positioned at one of those two comment openers.
    pub(crate) fn lex_comment(&mut self) -> Token {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        Token::new(TokenKind::Comment, basc_util::Symbol::intern(text), self.current_span())
    }
}
