//! Type annotation parsing: `as TYPE` after a parameter, field, or return type.

use basc_lex::TokenKind;
use basc_util::diagnostic::DiagnosticCode;

use crate::ast::Type;
use crate::{PResult, Parser};

impl<'a> Parser<'a> {
    /// Parses the built-in type names (section 4.2) or falls back to a
    /// `Named` type referencing a class declared elsewhere in scope.
    pub(crate) fn parse_type(&mut self) -> PResult<Type> {
        let ty = match self.peek_kind() {
            TokenKind::TypeInteger => Type::Integer,
            TokenKind::TypeLongInteger => Type::LongInteger,
            TokenKind::TypeFloat => Type::Float,
            TokenKind::TypeDouble => Type::Double,
            TokenKind::TypeString => Type::String,
            TokenKind::TypeBoolean => Type::Boolean,
            TokenKind::TypeObject => Type::Object,
            TokenKind::TypeDynamic => Type::Dynamic,
            TokenKind::TypeVoid => Type::Void,
            _ if self.check_identifier_like() => {
                let name = self.peek().text;
                self.advance();
                return Ok(Type::Named(name));
            }
            _ => return self.error_here("expected a type name", DiagnosticCode::INVALID_TYPE_ANNOTATION),
        };
        self.advance();
        Ok(ty)
    }

    /// Parses an optional `as TYPE` annotation, returning `None` if no `as`
    /// is present.
    pub(crate) fn parse_optional_as_type(&mut self) -> PResult<Option<Type>> {
        if self.match_kind(TokenKind::As) {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use basc_util::Handler;

    use crate::ast::Type;
    use crate::Parser;

    fn parse_type(source: &str) -> Type {
        let handler = Handler::new();
        let mut parser = Parser::new(source, &handler);
        parser.parse_type().expect("type should parse")
    }

    #[test]
    fn builtin_types_parse() {
        assert_eq!(parse_type("integer"), Type::Integer);
        assert_eq!(parse_type("string"), Type::String);
        assert_eq!(parse_type("dynamic"), Type::Dynamic);
        assert_eq!(parse_type("void"), Type::Void);
    }

    #[test]
    fn class_name_parses_as_named_type() {
        assert_eq!(parse_type("Widget"), Type::Named(basc_util::Symbol::intern("Widget")));
    }
}
