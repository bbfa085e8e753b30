//! Expression parsing — precedence climbing (Pratt-style) over the BASIC
//! operator grammar, plus the expression-only constructs (array/AA literals,
//! `new`, anonymous `function`/`sub`, template strings).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `or` | Left |
//! | 2 | `and` | Left |
//! | 3 | `=`, `<>`, `<`, `<=`, `>`, `>=` | Left |
//! | 4 | `+`, `-`, `&` (concat) | Left |
//! | 5 | `*`, `/`, `\`, `mod` | Left |
//! | 6 | `^` | Left (matches source behavior, not the usual right-assoc `^`) |
//!
//! Unary `not`/`-` bind tighter than `^`; postfix `.prop`/`[idx]`/`(args)`
//! bind tighter still and are handled in [`Parser::parse_postfix`].

use basc_lex::TokenKind;
use basc_util::diagnostic::DiagnosticCode;
use basc_util::{DiagnosticBuilder, Symbol};

use crate::ast::*;
use crate::{PResult, Parser};

/// Binding powers for the binary-operator climb. Two numbers per tier (left,
/// right) so a left-associative tier's right binding power is one higher
/// than its own, stopping the climb from re-consuming a same-tier operator
/// on the way back up.
#[doc(hidden)]
pub mod bp {
    pub const MIN: u8 = 0;
    pub const OR: u8 = 2;
    pub const AND: u8 = 4;
    pub const RELATIONAL: u8 = 6;
    pub const ADDITIVE: u8 = 8;
    pub const MULTIPLICATIVE: u8 = 10;
    pub const EXPONENT: u8 = 12;
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Core precedence-climbing loop: parses a unary-rooted left operand,
    /// then repeatedly consumes binary operators whose left binding power
    /// meets `min_bp`, recursing on the right-hand side with that operator's
    /// right binding power as the new floor.
    fn parse_expr_bp(&mut self, min_bp: u8) -> PResult<Expr> {
        let mut left = self.parse_unary()?;

        while let Some((op, left_bp, right_bp)) = self.current_binop() {
            if left_bp < min_bp {
                break;
            }
            self.advance();
            let right = self.parse_expr_bp(right_bp)?;
            let span = left.span().merge(right.span());
            left = Expr::Binary(BinaryExpr { left: Box::new(left), op, right: Box::new(right), span });
        }

        Ok(left)
    }

    fn current_binop(&self) -> Option<(BinOp, u8, u8)> {
        let (op, left_bp) = match self.peek_kind() {
            TokenKind::Or => (BinOp::Or, bp::OR),
            TokenKind::And => (BinOp::And, bp::AND),
            TokenKind::Equal => (BinOp::Equal, bp::RELATIONAL),
            TokenKind::NotEqual => (BinOp::NotEqual, bp::RELATIONAL),
            TokenKind::Less => (BinOp::Less, bp::RELATIONAL),
            TokenKind::LessEqual => (BinOp::LessEqual, bp::RELATIONAL),
            TokenKind::Greater => (BinOp::Greater, bp::RELATIONAL),
            TokenKind::GreaterEqual => (BinOp::GreaterEqual, bp::RELATIONAL),
            TokenKind::Plus => (BinOp::Add, bp::ADDITIVE),
            TokenKind::Minus => (BinOp::Sub, bp::ADDITIVE),
            TokenKind::Ampersand => (BinOp::Concat, bp::ADDITIVE),
            TokenKind::Star => (BinOp::Mul, bp::MULTIPLICATIVE),
            TokenKind::Slash => (BinOp::Div, bp::MULTIPLICATIVE),
            TokenKind::Backslash => (BinOp::IntDiv, bp::MULTIPLICATIVE),
            TokenKind::Mod => (BinOp::Mod, bp::MULTIPLICATIVE),
            TokenKind::Caret => (BinOp::Exponent, bp::EXPONENT),
            _ => return None,
        };
        Some((op, left_bp, left_bp + 1))
    }

    /// `not`/unary `-`, each recursing into another unary so chains like
    /// `not not x` or `--x` parse, bottoming out at [`Parser::parse_postfix`].
    fn parse_unary(&mut self) -> PResult<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Not => UnOp::Not,
            TokenKind::Minus => UnOp::Negate,
            _ => return self.parse_postfix(),
        };
        let start = self.peek().span;
        self.advance();
        let operand = self.parse_unary()?;
        let span = start.merge(operand.span());
        Ok(Expr::Unary(UnaryExpr { op, operand: Box::new(operand), span }))
    }

    /// `.prop`, `[idx]`, `(args)` chained onto a primary expression.
    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            expr = match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name_tok = self.expect_property_name()?;
                    let span = expr.span().merge(name_tok.1);
                    Expr::DottedGet(DottedGetExpr { target: Box::new(expr), name: name_tok.0, span })
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "`]`")?;
                    let span = expr.span().merge(self.previous().span);
                    Expr::IndexedGet(IndexedGetExpr { target: Box::new(expr), index: Box::new(index), span })
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    let span = expr.span().merge(self.previous().span);
                    Expr::Call(CallExpr { callee: Box::new(expr), args, span })
                }
                _ => break,
            };
        }
        Ok(expr)
    }

    /// Parses `(args)`, emitting a non-fatal `tooManyCallableParameters`
    /// diagnostic if the count exceeds [`MAX_ARGS`] — parsing continues so
    /// the rest of the call still ends up in the tree.
    pub(crate) fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        if args.len() > MAX_ARGS {
            DiagnosticBuilder::error(format!("call has more than {MAX_ARGS} arguments"))
                .code(DiagnosticCode::TOO_MANY_CALLABLE_PARAMETERS)
                .span(self.previous().span)
                .emit(self.handler);
        }
        Ok(args)
    }

    /// A property name after `.`: any keyword's text is acceptable here
    /// (`allowedProperties`, GLOSSARY) except a bare `rem`, which the lexer
    /// already distinguishes at the statement-comment position — `x.rem` is
    /// still a dotted property, never a comment.
    fn expect_property_name(&mut self) -> PResult<(Symbol, basc_util::Span)> {
        if matches!(self.peek_kind(), TokenKind::Identifier) || self.peek_kind().is_keyword() {
            let tok = self.advance();
            Ok((tok.text, tok.span))
        } else {
            self.error_here("expected a property name", DiagnosticCode::UNEXPECTED_TOKEN)
        }
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let start = self.peek().span;
        match self.peek_kind() {
            TokenKind::IntegerLiteral
            | TokenKind::LongIntegerLiteral
            | TokenKind::FloatLiteral
            | TokenKind::DoubleLiteral
            | TokenKind::StringLiteral => {
                let tok = self.advance();
                let value = literal_from_token(&tok);
                Ok(Expr::Literal(LiteralExpr { value, span: tok.span }))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(LiteralExpr { value: Literal::Bool(true), span: start }))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(LiteralExpr { value: Literal::Bool(false), span: start }))
            }
            TokenKind::TemplateString => {
                let tok = self.advance();
                self.parse_template_string(tok.text.as_str(), tok.span)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                let span = start.merge(self.previous().span);
                Ok(Expr::Grouping(GroupingExpr { inner: Box::new(inner), span }))
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_aa_literal(),
            TokenKind::New => self.parse_new_expr(),
            TokenKind::Function | TokenKind::Sub => {
                let decl = self.parse_function_decl(false)?;
                let span = decl.span;
                Ok(Expr::Function(FunctionExpr { decl, span }))
            }
            _ if self.check_identifier_like() => {
                let tok = self.advance();
                Ok(Expr::Variable(VariableExpr { name: tok.text, span: tok.span }))
            }
            _ => self.error_here("expected an expression", DiagnosticCode::UNEXPECTED_TOKEN),
        }
    }

    fn parse_array_literal(&mut self) -> PResult<Expr> {
        let start = self.peek().span;
        self.expect(TokenKind::LBracket, "`[`")?;
        self.skip_terminators();
        let mut elements = Vec::new();
        while !self.check(TokenKind::RBracket) {
            elements.push(self.parse_expr()?);
            self.skip_terminators();
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
            self.skip_terminators();
        }
        self.skip_terminators();
        self.expect(TokenKind::RBracket, "`]`")?;
        let span = start.merge(self.previous().span);
        Ok(Expr::ArrayLiteral(ArrayLiteralExpr { elements, span }))
    }

    /// `{` key-value pairs `}`. Pairs separate on `,`, `:`, or a newline; a
    /// `:` inside a string key stays inside the string since it's consumed
    /// by the lexer's string scanner before the parser ever sees it.
    fn parse_aa_literal(&mut self) -> PResult<Expr> {
        let start = self.peek().span;
        self.expect(TokenKind::LBrace, "`{`")?;
        self.skip_terminators();
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) {
            members.push(self.parse_aa_member()?);
            self.skip_terminators();
            if self.match_kind(TokenKind::Comma) || self.match_kind(TokenKind::Colon) {
                self.skip_terminators();
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        let span = start.merge(self.previous().span);
        Ok(Expr::AALiteral(AALiteralExpr { members, span }))
    }

    fn parse_aa_member(&mut self) -> PResult<Expr> {
        let start = self.peek().span;
        let key = if self.check(TokenKind::StringLiteral) {
            let tok = self.advance();
            match tok.literal {
                Some(basc_lex::Literal::Str(s)) => s,
                _ => tok.text,
            }
        } else if matches!(self.peek_kind(), TokenKind::Identifier) || self.peek_kind().is_keyword() {
            let tok = self.advance();
            if tok.kind == TokenKind::Rem {
                return self.error_here(
                    "`rem` cannot be used as an associative-array brace key (only as a dotted property)",
                    DiagnosticCode::INVALID_AA_LITERAL_KEY,
                );
            }
            tok.text
        } else {
            return self.error_here(
                "expected an identifier, reserved word, or string as an associative-array key",
                DiagnosticCode::INVALID_AA_LITERAL_KEY,
            );
        };
        self.expect(TokenKind::Colon, "`:`")?;
        self.skip_terminators();
        let value = self.parse_expr()?;
        let span = start.merge(value.span());
        Ok(Expr::AAMember(AAMemberExpr { key, value: Box::new(value), span }))
    }

    fn parse_new_expr(&mut self) -> PResult<Expr> {
        let start = self.peek().span;
        self.expect(TokenKind::New, "`new`")?;
        let (class_name, _) = self.parse_dotted_name("a class name")?;
        let args = if self.check(TokenKind::LParen) { self.parse_call_args()? } else { Vec::new() };
        let span = start.merge(self.previous().span);
        Ok(Expr::New(NewExpr { class_name, args, span }))
    }

    /// Splits a raw template-string token's text (backticks included) into
    /// literal and `${...}` interpolation spans by brace depth, recursively
    /// parsing each interpolation as its own expression, then folds the
    /// pieces into a left-associated `Concat` chain. Stringification of
    /// non-string pieces is the transpiler's job (section 4.5), not the
    /// parser's.
    fn parse_template_string(&mut self, raw: &str, span: basc_util::Span) -> PResult<Expr> {
        let inner = &raw[1..raw.len().saturating_sub(1)];
        let mut pieces: Vec<Expr> = Vec::new();
        let bytes = inner.as_bytes();
        let mut i = 0;
        let mut literal_start = 0;

        while i < bytes.len() {
            if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
                if i > literal_start {
                    pieces.push(Expr::Literal(LiteralExpr {
                        value: Literal::Str(Symbol::intern(&inner[literal_start..i])),
                        span,
                    }));
                }
                let expr_start = i + 2;
                let mut depth = 1usize;
                let mut j = expr_start;
                while j < bytes.len() && depth > 0 {
                    match bytes[j] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    if depth > 0 {
                        j += 1;
                    }
                }
                let sub_source = &inner[expr_start..j];
                let handler = self.handler;
                let mut sub_parser = Parser::new(sub_source, handler);
                let sub_expr = sub_parser.parse_expr()?;
                pieces.push(sub_expr);
                i = j + 1;
                literal_start = i;
            } else {
                i += 1;
            }
        }
        if literal_start < inner.len() {
            pieces.push(Expr::Literal(LiteralExpr {
                value: Literal::Str(Symbol::intern(&inner[literal_start..])),
                span,
            }));
        }

        let mut iter = pieces.into_iter();
        let mut acc = match iter.next() {
            Some(first) => first,
            None => Expr::Literal(LiteralExpr { value: Literal::Str(Symbol::intern("")), span }),
        };
        for piece in iter {
            acc = Expr::Binary(BinaryExpr {
                left: Box::new(acc),
                op: BinOp::Concat,
                right: Box::new(piece),
                span,
            });
        }
        Ok(acc)
    }
}

fn literal_from_token(tok: &basc_lex::Token) -> Literal {
    match &tok.literal {
        Some(basc_lex::Literal::Integer(v)) => Literal::Integer(*v),
        Some(basc_lex::Literal::LongInteger(v)) => Literal::LongInteger(*v),
        Some(basc_lex::Literal::Float(v)) => Literal::Float(*v),
        Some(basc_lex::Literal::Double(v)) => Literal::Double(*v),
        Some(basc_lex::Literal::Str(s)) => Literal::Str(*s),
        None => Literal::Str(tok.text),
    }
}

#[cfg(test)]
mod tests {
    use basc_util::Handler;

    use crate::ast::*;
    use crate::Parser;

    fn parse_expr(source: &str) -> Expr {
        let handler = Handler::new();
        let mut parser = Parser::new(source, &handler);
        let expr = parser.parse_expr().expect("expression should parse");
        assert!(!handler.has_errors(), "unexpected diagnostics: {:?}", handler.diagnostics());
        expr
    }

    #[test]
    fn additive_is_left_associative() {
        let expr = parse_expr("1 - 2 - 3");
        match expr {
            Expr::Binary(BinaryExpr { op: BinOp::Sub, left, .. }) => {
                assert!(matches!(*left, Expr::Binary(BinaryExpr { op: BinOp::Sub, .. })));
            }
            other => panic!("expected nested Sub, got {other:?}"),
        }
    }

    #[test]
    fn multiplicative_binds_tighter_than_additive() {
        let expr = parse_expr("1 + 2 * 3");
        match expr {
            Expr::Binary(BinaryExpr { op: BinOp::Add, right, .. }) => {
                assert!(matches!(*right, Expr::Binary(BinaryExpr { op: BinOp::Mul, .. })));
            }
            other => panic!("expected Add with Mul on the right, got {other:?}"),
        }
    }

    #[test]
    fn exponent_is_left_associative() {
        let expr = parse_expr("2 ^ 3 ^ 4");
        match expr {
            Expr::Binary(BinaryExpr { op: BinOp::Exponent, left, .. }) => {
                assert!(matches!(*left, Expr::Binary(BinaryExpr { op: BinOp::Exponent, .. })));
            }
            other => panic!("expected nested Exponent on the left, got {other:?}"),
        }
    }

    #[test]
    fn unary_minus_binds_tighter_than_exponent() {
        let expr = parse_expr("-2 ^ 2");
        match expr {
            Expr::Binary(BinaryExpr { op: BinOp::Exponent, left, .. }) => {
                assert!(matches!(*left, Expr::Unary(UnaryExpr { op: UnOp::Negate, .. })));
            }
            other => panic!("expected Exponent with Negate on the left, got {other:?}"),
        }
    }

    #[test]
    fn call_chains_with_dotted_get() {
        let expr = parse_expr("foo.bar(1, 2)");
        match expr {
            Expr::Call(CallExpr { callee, args, .. }) => {
                assert_eq!(args.len(), 2);
                assert!(matches!(*callee, Expr::DottedGet(_)));
            }
            other => panic!("expected Call over DottedGet, got {other:?}"),
        }
    }

    #[test]
    fn indexed_get_chains_onto_call() {
        let expr = parse_expr("make()[0]");
        assert!(matches!(expr, Expr::IndexedGet(_)));
    }

    #[test]
    fn aa_literal_parses_members() {
        let expr = parse_expr("{a: 1, b: 2}");
        match expr {
            Expr::AALiteral(AALiteralExpr { members, .. }) => assert_eq!(members.len(), 2),
            other => panic!("expected AALiteral, got {other:?}"),
        }
    }

    #[test]
    fn aa_literal_allows_reserved_word_key() {
        let expr = parse_expr("{end: 1}");
        assert!(matches!(expr, Expr::AALiteral(_)));
    }

    #[test]
    fn new_expr_without_parens_has_no_args() {
        let expr = parse_expr("new Widget");
        match expr {
            Expr::New(NewExpr { args, .. }) => assert!(args.is_empty()),
            other => panic!("expected New, got {other:?}"),
        }
    }

    #[test]
    fn template_string_splits_literal_and_interpolated_pieces() {
        let expr = parse_expr("`hello ${name}!`");
        assert!(matches!(expr, Expr::Binary(BinaryExpr { op: BinOp::Concat, .. })));
    }
}
