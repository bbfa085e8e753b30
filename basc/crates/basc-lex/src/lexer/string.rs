//! String and template-string literal lexing.
//!
//! Double-quoted strings use `""` as the only escape (an embedded literal
//! quote); there are no backslash escapes. Template strings (S-dialect,
//! backtick-delimited) may contain `${...}` interpolations — the lexer
//! captures the whole template including interpolation text as one token;
//! the parser re-invokes lexing/parsing on each `${...}` span to build its
//! embedded expressions.

use basc_util::diagnostic::DiagnosticCode;
use basc_util::Symbol;

use super::core::Lexer;
use crate::token::{Literal, Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes a double-quoted string literal.
    pub fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // opening '"'
        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error(
                    "unterminated string literal".to_string(),
                    DiagnosticCode::UNTERMINATED_STRING_AT_EOF,
                );
                break;
            }

            let c = self.cursor.current_char();

            if c == '\n' {
                self.report_error(
                    "unterminated string literal".to_string(),
                    DiagnosticCode::UNTERMINATED_STRING_AT_EOL,
                );
                break;
            }

            if c == '"' {
                if self.cursor.peek_char(1) == '"' {
                    content.push('"');
                    self.cursor.advance();
                    self.cursor.advance();
                    continue;
                }
                self.cursor.advance();
                break;
            }

            content.push(c);
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        Token::new(TokenKind::StringLiteral, Symbol::intern(text), self.current_span())
            .with_literal(Literal::Str(Symbol::intern(&content)))
    }

    /// Lexes a backtick-delimited template string, tracking `${...}` nesting
    /// depth so an interpolation's own `}` does not prematurely end it.
    pub fn lex_template_string(&mut self) -> Token {
        self.cursor.advance(); // opening '`'
        let mut interpolation_depth: u32 = 0;

        loop {
            if self.cursor.is_at_end() {
                self.report_error(
                    "unterminated template string".to_string(),
                    DiagnosticCode::UNTERMINATED_TEMPLATE_STRING,
                );
                break;
            }

            let c = self.cursor.current_char();

            if interpolation_depth == 0 && c == '`' {
                self.cursor.advance();
                break;
            }

            if c == '$' && self.cursor.peek_char(1) == '{' {
                interpolation_depth += 1;
                self.cursor.advance();
                self.cursor.advance();
                continue;
            }

            if interpolation_depth > 0 {
                if c == '{' {
                    interpolation_depth += 1;
                } else if c == '}' {
                    interpolation_depth -= 1;
                }
            }

            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        Token::new(TokenKind::TemplateString, Symbol::intern(text), self.current_span())
    }
}

#[cfg(test)]
mod tests {
    use basc_util::Handler;

    use crate::token::{Literal, TokenKind};

    fn lex_one(source: &str) -> crate::token::Token {
        let handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &handler);
        lexer.next_token()
    }

    #[test]
    fn test_simple_string() {
        let tok = lex_one(r#""hello""#);
        assert_eq!(tok.kind, TokenKind::StringLiteral);
        assert_eq!(tok.literal, Some(Literal::Str(basc_util::Symbol::intern("hello"))));
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let tok = lex_one(r#""say ""hi""""#);
        assert_eq!(tok.kind, TokenKind::StringLiteral);
        assert_eq!(
            tok.literal,
            Some(Literal::Str(basc_util::Symbol::intern(r#"say "hi""#)))
        );
    }

    #[test]
    fn test_empty_string() {
        let tok = lex_one(r#""""#);
        assert_eq!(tok.literal, Some(Literal::Str(basc_util::Symbol::intern(""))));
    }

    #[test]
    fn test_template_string_no_interpolation() {
        let tok = lex_one("`plain text`");
        assert_eq!(tok.kind, TokenKind::TemplateString);
        assert_eq!(tok.text.as_str(), "`plain text`");
    }

    #[test]
    fn test_template_string_with_interpolation() {
        let tok = lex_one("`hello ${name}!`");
        assert_eq!(tok.kind, TokenKind::TemplateString);
        assert_eq!(tok.text.as_str(), "`hello ${name}!`");
    }

    #[test]
    fn test_template_string_with_nested_braces_in_interpolation() {
        let tok = lex_one("`${ {a: 1}.a }`");
        assert_eq!(tok.kind, TokenKind::TemplateString);
        assert_eq!(tok.text.as_str(), "`${ {a: 1}.a }`");
    }
}
