//! Numeric literal lexing: decimal integers/floats/doubles and `&h`/`&H`
//! hexadecimal literals, with optional trailing type-designator suffix
//! (`%` integer, `&` long integer, `!` float, `#` double).

use basc_util::diagnostic::DiagnosticCode;
use basc_util::Symbol;

use super::core::Lexer;
use crate::token::{Literal, Token, TokenKind};
use crate::unicode::is_digit_in_base;

impl<'a> Lexer<'a> {
    /// Lexes a decimal integer, float, or double literal starting at the
    /// cursor's current ASCII digit.
    pub fn lex_number(&mut self) -> Token {
        while is_digit_in_base(self.cursor.current_char(), 10) {
            self.cursor.advance();
        }

        let mut is_fractional = false;
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_fractional = true;
            self.cursor.advance();
            while is_digit_in_base(self.cursor.current_char(), 10) {
                self.cursor.advance();
            }
        }

        if matches!(self.cursor.current_char(), 'e' | 'E') {
            let save = self.cursor.snapshot();
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            if self.cursor.current_char().is_ascii_digit() {
                is_fractional = true;
                while is_digit_in_base(self.cursor.current_char(), 10) {
                    self.cursor.advance();
                }
            } else {
                self.cursor.restore(save);
            }
        }

        let digits = self.cursor.slice_from(self.token_start).to_string();

        let suffix = match self.cursor.current_char() {
            c @ ('%' | '&' | '!' | '#') => {
                self.cursor.advance();
                Some(c)
            }
            _ => None,
        };

        self.build_decimal_token(&digits, is_fractional, suffix)
    }

    fn build_decimal_token(&mut self, digits: &str, is_fractional: bool, suffix: Option<char>) -> Token {
        let text = self.cursor.slice_from(self.token_start);

        let (kind, literal) = match suffix {
            Some('%') => match digits.parse::<i32>() {
                Ok(v) => (TokenKind::IntegerLiteral, Literal::Integer(v)),
                Err(_) => return self.malformed_number(text),
            },
            Some('&') => match digits.parse::<i64>() {
                Ok(v) => (TokenKind::LongIntegerLiteral, Literal::LongInteger(v)),
                Err(_) => return self.malformed_number(text),
            },
            Some('!') => match digits.parse::<f32>() {
                Ok(v) => (TokenKind::FloatLiteral, Literal::Float(v)),
                Err(_) => return self.malformed_number(text),
            },
            Some('#') => match digits.parse::<f64>() {
                Ok(v) => (TokenKind::DoubleLiteral, Literal::Double(v)),
                Err(_) => return self.malformed_number(text),
            },
            Some(_) => unreachable!("suffix set restricted to % & ! #"),
            None if is_fractional => match digits.parse::<f64>() {
                Ok(v) => (TokenKind::DoubleLiteral, Literal::Double(v)),
                Err(_) => return self.malformed_number(text),
            },
            None => match digits.parse::<i32>() {
                Ok(v) => (TokenKind::IntegerLiteral, Literal::Integer(v)),
                Err(_) => match digits.parse::<i64>() {
                    Ok(v) => (TokenKind::LongIntegerLiteral, Literal::LongInteger(v)),
                    Err(_) => return self.malformed_number(text),
                },
            },
        };

        Token::new(kind, Symbol::intern(text), self.current_span()).with_literal(literal)
    }

    fn malformed_number(&mut self, text: &str) -> Token {
        self.report_error(
            format!("'{text}' is not a valid numeric literal"),
            DiagnosticCode::MALFORMED_NUMERIC_LITERAL,
        );
        Token::new(TokenKind::Invalid, Symbol::intern(text), self.current_span())
    }

    /// Lexes a `&h`/`&H` hexadecimal integer literal. Called from
    /// [`Lexer::lex_ampersand`] once the `h`/`H` prefix has been confirmed;
    /// the cursor is positioned just after that prefix character.
    pub(crate) fn lex_hex_number(&mut self) -> Token {
        let digits_start = self.cursor.position();
        while is_digit_in_base(self.cursor.current_char(), 16) {
            self.cursor.advance();
        }
        let digits = self.cursor.slice_from(digits_start);
        if digits.is_empty() {
            let text = self.cursor.slice_from(self.token_start);
            return self.malformed_number(text);
        }

        let suffix = match self.cursor.current_char() {
            c @ ('%' | '&') => {
                self.cursor.advance();
                Some(c)
            }
            _ => None,
        };

        let text = self.cursor.slice_from(self.token_start);
        match suffix {
            Some('&') => match i64::from_str_radix(digits, 16) {
                Ok(v) => Token::new(TokenKind::LongIntegerLiteral, Symbol::intern(text), self.current_span())
                    .with_literal(Literal::LongInteger(v)),
                Err(_) => self.malformed_number(text),
            },
            _ => match i32::from_str_radix(digits, 16) {
                Ok(v) => Token::new(TokenKind::IntegerLiteral, Symbol::intern(text), self.current_span())
                    .with_literal(Literal::Integer(v)),
                Err(_) => match i64::from_str_radix(digits, 16) {
                    Ok(v) => Token::new(TokenKind::LongIntegerLiteral, Symbol::intern(text), self.current_span())
                        .with_literal(Literal::LongInteger(v)),
                    Err(_) => self.malformed_number(text),
                },
            },
        }
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
    fn test_integer_literal() {
        let tok = lex_one("42");
        assert_eq!(tok.kind, TokenKind::IntegerLiteral);
        assert_eq!(tok.literal, Some(Literal::Integer(42)));
    }

    #[test]
    fn test_double_literal_from_decimal_point() {
        let tok = lex_one("3.14");
        assert_eq!(tok.kind, TokenKind::DoubleLiteral);
        assert_eq!(tok.literal, Some(Literal::Double(3.14)));
    }

    #[test]
    fn test_double_literal_from_exponent() {
        let tok = lex_one("2e10");
        assert_eq!(tok.kind, TokenKind::DoubleLiteral);
    }

    #[test]
    fn test_integer_suffix() {
        let tok = lex_one("5%");
        assert_eq!(tok.kind, TokenKind::IntegerLiteral);
        assert_eq!(tok.text.as_str(), "5%");
    }

    #[test]
    fn test_longinteger_suffix() {
        let tok = lex_one("5&");
        assert_eq!(tok.kind, TokenKind::LongIntegerLiteral);
        assert_eq!(tok.literal, Some(Literal::LongInteger(5)));
    }

    #[test]
    fn test_float_suffix() {
        let tok = lex_one("5!");
        assert_eq!(tok.kind, TokenKind::FloatLiteral);
    }

    #[test]
    fn test_double_suffix() {
        let tok = lex_one("5#");
        assert_eq!(tok.kind, TokenKind::DoubleLiteral);
    }

    #[test]
    fn test_hex_literal() {
        let tok = lex_one("&hFF");
        assert_eq!(tok.kind, TokenKind::IntegerLiteral);
        assert_eq!(tok.literal, Some(Literal::Integer(255)));
    }

    #[test]
    fn test_hex_literal_uppercase_prefix() {
        let tok = lex_one("&H10");
        assert_eq!(tok.literal, Some(Literal::Integer(16)));
    }
}
