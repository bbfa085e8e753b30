//! Operator and punctuation lexing.

use super::core::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// `+`, `+=`, `++`
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::PlusEqual, "+=")
        } else if self.cursor.match_char('+') {
            self.make_token(TokenKind::PlusPlus, "++")
        } else {
            self.make_token(TokenKind::Plus, "+")
        }
    }

    /// `-`, `-=`, `--`
    pub(crate) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::MinusEqual, "-=")
        } else if self.cursor.match_char('-') {
            self.make_token(TokenKind::MinusMinus, "--")
        } else {
            self.make_token(TokenKind::Minus, "-")
        }
    }

    /// `*`, `*=`
    pub(crate) fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::StarEqual, "*=")
        } else {
            self.make_token(TokenKind::Star, "*")
        }
    }

    /// `/`, `/=`
    pub(crate) fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::SlashEqual, "/=")
        } else {
            self.make_token(TokenKind::Slash, "/")
        }
    }

    /// `<`, `<=`, `<>`
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::LessEqual, "<=")
        } else if self.cursor.match_char('>') {
            self.make_token(TokenKind::NotEqual, "<>")
        } else {
            self.make_token(TokenKind::Less, "<")
        }
    }

    /// `>`, `>=`
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::GreaterEqual, ">=")
        } else {
            self.make_token(TokenKind::Greater, ">")
        }
    }

    /// `&`, `&=`, or the start of a `&h`/`&H` hexadecimal literal.
    pub(crate) fn lex_ampersand(&mut self) -> Token {
        if matches!(self.cursor.peek_char(1), 'h' | 'H') {
            self.cursor.advance(); // '&'
            self.cursor.advance(); // 'h'/'H'
            return self.lex_hex_number();
        }
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::AmpersandEqual, "&=")
        } else {
            self.make_token(TokenKind::Ampersand, "&")
        }
    }
}

#[cfg(test)]
mod tests {
    use basc_util::Handler;

    use crate::token::TokenKind;

    fn lex_all(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        let lexer = crate::Lexer::new(source, &handler);
        lexer.map(|t| t.kind).collect()
    }

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(
            lex_all("+ - * / \\ ^"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Backslash,
                TokenKind::Caret,
            ]
        );
    }

    #[test]
    fn test_compound_assignment() {
        assert_eq!(lex_all("+="), vec![TokenKind::PlusEqual]);
        assert_eq!(lex_all("-="), vec![TokenKind::MinusEqual]);
        assert_eq!(lex_all("*="), vec![TokenKind::StarEqual]);
        assert_eq!(lex_all("/="), vec![TokenKind::SlashEqual]);
    }

    #[test]
    fn test_increment_decrement() {
        assert_eq!(lex_all("x++"), vec![TokenKind::Identifier, TokenKind::PlusPlus]);
        assert_eq!(lex_all("x--"), vec![TokenKind::Identifier, TokenKind::MinusMinus]);
    }

    #[test]
    fn test_relational_operators() {
        assert_eq!(
            lex_all("< <= > >= <> ="),
            vec![
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::NotEqual,
                TokenKind::Equal,
            ]
        );
    }

    #[test]
    fn test_ampersand_concat_vs_hex() {
        assert_eq!(lex_all("a & b"), vec![TokenKind::Identifier, TokenKind::Ampersand, TokenKind::Identifier]);
        assert_eq!(lex_all("&hFF"), vec![TokenKind::IntegerLiteral]);
    }
}
