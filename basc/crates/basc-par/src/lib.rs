//! basc-par - Recursive-descent parser for the BASIC dialects
//!
//! Turns a [`basc_lex::Lexer`] token stream into the [`ast`] this crate
//! defines. Parsing never aborts on a bad statement: [`Parser::synchronize`]
//! advances past the offending tokens and diagnostics already emitted for the
//! abandoned attempt are rolled back via [`Parser::attempt`], so a single
//! malformed `if` doesn't drown the rest of the file in cascading noise.

pub mod ast;
mod expr;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

pub use ast::*;

use basc_lex::{Lexer, Token, TokenKind};
use basc_util::diagnostic::DiagnosticCode;
use basc_util::{DiagnosticBuilder, Handler, Span};

/// Sentinel returned by a parse method that already reported its own
/// diagnostic and wants the caller to recover rather than unwind further.
/// Carries no data; the diagnostic itself lives in the [`Handler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseFailed;

pub type PResult<T> = Result<T, ParseFailed>;

/// Parses a full source file into an [`Ast`].
///
/// Lexes the entire input up front; errors recorded during parsing land in
/// `handler` rather than aborting the parse, so callers get a best-effort
/// tree even for a file with syntax errors in it.
pub fn parse(source: &str, handler: &Handler) -> Ast {
    Parser::new(source, handler).parse_program()
}

/// Recursive-descent parser over a pre-lexed token buffer.
///
/// The full token stream is buffered rather than pulled lazily from the
/// lexer: lookahead beyond one token (checking for `then`, scanning past a
/// parameter list for a return-type arrow, etc.) is routine in this grammar,
/// and a `Vec<Token>` makes arbitrary backtracking via [`Parser::attempt`]
/// trivial instead of requiring a separate pushback buffer.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    pub(crate) handler: &'a Handler,
    /// Set once a non-comment top-level statement has been parsed. `library`
    /// and `import` are only legal above this point (section 4.2).
    pub(crate) seen_non_comment_top_level: bool,
}

/// Statement-starting keywords [`Parser::synchronize`] treats as safe
/// resumption points after a malformed statement (section 4.2).
const RECOVERY_KEYWORDS: &[TokenKind] = &[
    TokenKind::Function,
    TokenKind::Sub,
    TokenKind::If,
    TokenKind::For,
    TokenKind::While,
    TokenKind::Print,
    TokenKind::Return,
    TokenKind::Class,
    TokenKind::Dim,
    TokenKind::Goto,
    TokenKind::EndIf,
    TokenKind::EndFor,
    TokenKind::EndWhile,
    TokenKind::EndSub,
    TokenKind::EndFunction,
    TokenKind::EndClass,
    TokenKind::Else,
    TokenKind::ElseIf,
];

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        let mut tokens = Vec::new();
        let mut lexer = Lexer::new(source, handler);
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Self { tokens, pos: 0, handler, seen_non_comment_top_level: false }
    }

    /// Parses every top-level statement until `Eof`, synchronizing past any
    /// statement that fails to parse.
    pub fn parse_program(&mut self) -> Ast {
        let mut stmts = Vec::new();
        self.skip_terminators();
        while !self.is_at_end() {
            match self.parse_top_level_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(ParseFailed) => self.synchronize(),
            }
            self.skip_terminators();
        }
        stmts
    }

    // ---- token-stream primitives ----

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    /// The kind of the token `offset` positions ahead, clamped to the final
    /// (`Eof`) token so lookahead past the end of the stream is harmless.
    pub(crate) fn peek_ahead_kind(&self, offset: usize) -> TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[idx].kind
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True if the current token's kind is acceptable as an identifier name:
    /// either a plain `Identifier`, or one of the contextual keywords that
    /// the lexer tags with its own `TokenKind` but which section 4.2 treats
    /// as identifiers outside the specific position that reserves them.
    /// Deliberately NOT "any non-reserved token" — punctuation, operators,
    /// and `Eof` are never identifier-like even though `is_keyword()` is
    /// false for them too.
    pub(crate) fn check_identifier_like(&self) -> bool {
        let kind = self.peek_kind();
        kind == TokenKind::Identifier || kind.is_contextual_keyword()
    }

    /// Matches a contextual keyword by its lowercased text, e.g. `then` or
    /// `extends`. The lexer already tags these with distinct `TokenKind`s, so
    /// this just compares against the one expected kind — kept as a named
    /// helper so call sites read the same as the spec's "matches text" framing.
    pub(crate) fn match_text(&mut self, kind: TokenKind) -> bool {
        self.match_kind(kind)
    }

    pub(crate) fn check_text(&self, kind: TokenKind) -> bool {
        self.check(kind)
    }

    /// Consumes the current token if it is `kind`, else emits an
    /// `expectedToken` diagnostic and fails the current parse attempt.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            self.error_here(format!("expected {what}"), DiagnosticCode::EXPECTED_TOKEN)
        }
    }

    /// Consumes an identifier-like token (see [`Parser::check_identifier_like`])
    /// and returns its text, or fails with a diagnostic.
    pub(crate) fn expect_identifier(&mut self, what: &str) -> PResult<Token> {
        if self.check_identifier_like() {
            Ok(self.advance())
        } else if self.peek_kind().is_keyword() {
            let span = self.peek().span;
            let text = self.peek().text;
            self.advance();
            DiagnosticBuilder::error(format!("`{}` is reserved and cannot be used as {what}", text.as_str()))
                .code(DiagnosticCode::CANNOT_USE_RESERVED_WORD_AS_IDENTIFIER)
                .span(span)
                .emit(self.handler);
            Err(ParseFailed)
        } else {
            self.error_here(format!("expected {what}"), DiagnosticCode::EXPECTED_TOKEN)
        }
    }

    pub(crate) fn error_here<T>(&mut self, message: impl Into<String>, code: DiagnosticCode) -> PResult<T> {
        let span = self.peek().span;
        DiagnosticBuilder::error(message).code(code).span(span).emit(self.handler);
        Err(ParseFailed)
    }

    /// Consumes `Newline`/`Colon`/`Eof` as a statement terminator, or fails.
    pub(crate) fn expect_terminator(&mut self) -> PResult<()> {
        if self.peek_kind().is_terminator() {
            if !self.is_at_end() {
                self.advance();
            }
            Ok(())
        } else {
            self.error_here("expected end of statement", DiagnosticCode::UNEXPECTED_TOKEN)
        }
    }

    /// Skips any run of `Newline`/`Colon` tokens, e.g. the blank lines between
    /// top-level statements or the leading colons a multi-line `if` tolerates.
    pub(crate) fn skip_terminators(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Colon) {
            self.advance();
        }
    }

    /// Advances until the next `Newline`/`Colon` (consumed) or the start of a
    /// statement the recovery table recognizes (not consumed), discarding
    /// tokens from a statement that failed to parse.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.peek_kind() {
                TokenKind::Newline | TokenKind::Colon => {
                    self.advance();
                    return;
                }
                kind if RECOVERY_KEYWORDS.contains(&kind) => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Runs `f`, rolling back both the token cursor and any diagnostics it
    /// emitted if it fails. Used for the handful of ambiguous grammar spots
    /// (e.g. telling an `AALiteral` apart from a `Block`) where a short
    /// lookahead parse is the simplest way to disambiguate.
    pub(crate) fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let pos = self.pos;
        let diag_len = self.handler.len();
        match f(self) {
            Ok(value) => Some(value),
            Err(ParseFailed) => {
                self.pos = pos;
                self.handler.truncate(diag_len);
                None
            }
        }
    }

    pub(crate) fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous().span)
    }

    /// Parses a possibly-namespaced name: `IDENT ('.' IDENT)*`, interning the
    /// joined dotted text as a single symbol (section 9's `a.b.C` namespace
    /// form). Only called from positions where a `.` can't mean anything
    /// else — a class's own name, its `extends` parent, and a `new` target —
    /// so there's no ambiguity with postfix property access.
    pub(crate) fn parse_dotted_name(&mut self, what: &str) -> PResult<(basc_util::Symbol, Span)> {
        let first = self.expect_identifier(what)?;
        if !self.check(TokenKind::Dot) {
            return Ok((first.text, first.span));
        }
        let mut text = first.text.as_str().to_string();
        let mut span = first.span;
        while self.match_kind(TokenKind::Dot) {
            let segment = self.expect_identifier(what)?;
            text.push('.');
            text.push_str(segment.text.as_str());
            span = span.merge(segment.span);
        }
        Ok((basc_util::Symbol::intern(&text), span))
    }
}
