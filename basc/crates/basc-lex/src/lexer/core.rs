//! Core lexer implementation.
//!
//! This module contains the main `Lexer` struct and its dispatch loop.

use basc_util::diagnostic::DiagnosticCode;
use basc_util::{DiagnosticBuilder, Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

use super::directive::CcFrame;

/// Lexer for the BASIC dialects (legacy `L` and superset `S`, section 1/4.1).
///
/// Transforms source text into a stream of [`Token`]s, folding type
/// designators, multi-word keywords, and conditional-compilation directives
/// away so the parser only ever sees the flattened, active token stream.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    pub(crate) handler: &'a Handler,

    /// Starting byte position of the current token.
    pub(crate) token_start: usize,

    /// Line number where the current token starts (1-based).
    pub(crate) token_start_line: u32,

    /// Column number where the current token starts (1-based).
    pub(crate) token_start_column: u32,

    /// True at the first token on a line (after only whitespace), the only
    /// position a `#` introduces a conditional-compilation directive rather
    /// than closing out a numeric/identifier type designator.
    pub(crate) at_stmt_start: bool,

    /// `#const` name -> value bindings accumulated so far.
    pub(crate) consts: std::collections::HashMap<Symbol, bool>,

    /// Nesting stack of active `#if`/`#else if`/`#else` branches.
    pub(crate) cc_stack: Vec<CcFrame>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            at_stmt_start: true,
            consts: std::collections::HashMap::new(),
            cc_stack: Vec::new(),
        }
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and conditional-compilation directives (consumed
    /// internally, never surfaced as tokens), then dispatches to the
    /// category-specific `lex_*` method for the current character. Comments
    /// are NOT trivia here (section 4.1): they are returned as a
    /// `TokenKind::Comment` token, same as any other token kind.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_inline_whitespace();

            if self.cursor.current_char() == '#' && self.at_stmt_start {
                if self.handle_directive() {
                    continue;
                }
            }

            if !self.active_branch() {
                self.skip_inactive_line();
                continue;
            }

            break;
        }

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            let span = self.current_span();
            return Token::eof(span);
        }

        if self.cursor.current_char() == '\'' || self.at_rem_comment() {
            let token = self.lex_comment();
            self.at_stmt_start = false;
            return token;
        }

        let c = self.cursor.current_char();
        let token = match c {
            '\n' => {
                self.cursor.advance();
                self.make_token(TokenKind::Newline, "\n")
            }
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            '.' => self.single(TokenKind::Dot),
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '\\' => self.single(TokenKind::Backslash),
            '^' => self.single(TokenKind::Caret),
            '=' => self.single(TokenKind::Equal),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '"' => self.lex_string(),
            '`' => self.lex_template_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if crate::unicode::is_ascii_ident_start(c) || crate::unicode::is_ident_start(c) => {
                self.lex_identifier()
            }
            c => {
                self.cursor.advance();
                self.report_error(format!("unexpected character '{c}'"), DiagnosticCode::UNEXPECTED_CHARACTER);
                self.make_token(TokenKind::Invalid, &c.to_string())
            }
        };

        self.at_stmt_start = matches!(token.kind, TokenKind::Newline | TokenKind::Colon);
        token
    }

    /// Consumes one character and emits a single-character token.
    pub(crate) fn single(&mut self, kind: TokenKind) -> Token {
        let text = self.cursor.current_char().to_string();
        self.cursor.advance();
        self.make_token(kind, &text)
    }

    /// Builds a token of `kind` spanning from `token_start` to the cursor's
    /// current position, interning `text` as the token's source text.
    pub(crate) fn make_token(&self, kind: TokenKind, text: &str) -> Token {
        Token::new(kind, Symbol::intern(text), self.current_span())
    }

    pub(crate) fn current_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Reports a lexical error at the current token's span.
    pub(crate) fn report_error(&self, message: String, code: DiagnosticCode) {
        DiagnosticBuilder::error(message)
            .code(code)
            .span(self.current_span())
            .emit(self.handler);
    }

    /// Skips spaces and tabs, but not newlines: newlines are significant
    /// statement terminators (section 4.2) and must reach the token stream.
    fn skip_inline_whitespace(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\r') {
            self.cursor.advance();
        }
    }

    /// True if the lexer is looking at a `rem` keyword used as a whole-line
    /// comment starter (only recognised when it would otherwise begin a
    /// statement, not as the tail of a dotted-property access).
    fn at_rem_comment(&self) -> bool {
        if !self.at_stmt_start {
            return false;
        }
        let rest = self.cursor.remaining();
        let lower = rest.get(0..3).map(str::to_ascii_lowercase);
        matches!(lower.as_deref(), Some("rem"))
            && !crate::unicode::is_ascii_ident_continue(self.cursor.peek_char(3))
    }

    pub(crate) fn active_branch(&self) -> bool {
        self.cc_stack.iter().all(|frame| frame.active)
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    /// Returns the current byte position in the source.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the starting byte position of the current token.
    pub fn token_start(&self) -> usize {
        self.token_start
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
