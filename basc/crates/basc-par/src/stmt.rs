//! Statement parsing: dispatch, blocks, `if`'s single/multi-line state
//! machine, loops, functions/subs, classes, and the place-expression
//! assignment forms (`Assignment`, `DottedSet`, `IndexedSet`, `Increment`).

use basc_lex::TokenKind;
use basc_util::diagnostic::DiagnosticCode;
use basc_util::DiagnosticBuilder;

use crate::ast::*;
use crate::{PResult, ParseFailed, Parser};

impl<'a> Parser<'a> {
    /// Entry point for a top-level (file-root) statement: the only position
    /// `Library`/`Import` are legal, and only above the first non-comment
    /// statement.
    pub(crate) fn parse_top_level_stmt(&mut self) -> PResult<Stmt> {
        if matches!(self.peek_kind(), TokenKind::Library | TokenKind::Import) {
            if self.seen_non_comment_top_level {
                return self.error_here(
                    "`library`/`import` must appear above any other statement in the file",
                    DiagnosticCode::IMPORT_STATEMENT_NOT_AT_TOP_OF_FILE,
                );
            }
            return if self.check(TokenKind::Library) { self.parse_library_stmt() } else { self.parse_import_stmt() };
        }
        let stmt = self.parse_stmt()?;
        if !matches!(stmt, Stmt::Comment(_)) {
            self.seen_non_comment_top_level = true;
        }
        Ok(stmt)
    }

    /// General statement dispatcher, used for both top-level and nested
    /// (block) statements. `Library`/`Import` are rejected here — callers
    /// below the file root reach this directly without the top-level check.
    pub(crate) fn parse_stmt(&mut self) -> PResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Comment => self.parse_comment_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_or_foreach_stmt(),
            TokenKind::Exit => self.parse_exit_stmt(),
            TokenKind::ExitFor => {
                let span = self.advance().span;
                self.expect_terminator()?;
                Ok(Stmt::ExitFor(span))
            }
            TokenKind::ExitWhile => {
                let span = self.advance().span;
                self.expect_terminator()?;
                Ok(Stmt::ExitWhile(span))
            }
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Goto => self.parse_goto_stmt(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::End => {
                let span = self.advance().span;
                self.expect_terminator()?;
                Ok(Stmt::End(span))
            }
            TokenKind::Stop => {
                let span = self.advance().span;
                self.expect_terminator()?;
                Ok(Stmt::Stop(span))
            }
            TokenKind::Function | TokenKind::Sub => self.parse_function_statement(),
            TokenKind::Class => self.parse_class_stmt(),
            TokenKind::Library | TokenKind::Import => self.error_here(
                "`library`/`import` must appear above any other statement in the file",
                DiagnosticCode::IMPORT_STATEMENT_NOT_AT_TOP_OF_FILE,
            ),
            _ if self.looks_like_label() => self.parse_label_stmt(),
            _ => self.parse_place_or_expr_stmt(),
        }
    }

    fn parse_comment_stmt(&mut self) -> PResult<Stmt> {
        let tok = self.advance();
        self.expect_terminator()?;
        Ok(Stmt::Comment(CommentStmt { text: tok.text, span: tok.span }))
    }

    /// A label is a bare identifier immediately followed by `:` with nothing
    /// else on the line — distinguished from an `IndexedSet`/assignment by
    /// the fact that a label's `:` is a statement terminator, not part of an
    /// expression, so this only fires when `Colon` directly follows a single
    /// identifier-like token.
    fn looks_like_label(&self) -> bool {
        self.check_identifier_like() && self.peek_ahead_kind(1) == TokenKind::Colon
    }

    fn parse_label_stmt(&mut self) -> PResult<Stmt> {
        let tok = self.advance();
        self.expect(TokenKind::Colon, "`:`")?;
        Ok(Stmt::Label(LabelStmt { name: tok.text, span: self.span_from(tok.span) }))
    }

    fn parse_goto_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::Goto, "`goto`")?;
        let label = self.expect_identifier("a label name")?;
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::Goto(GotoStmt { label: label.text, span }))
    }

    fn parse_return_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::Return, "`return`")?;
        let value = if self.peek_kind().is_terminator() { None } else { Some(self.parse_expr()?) };
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    fn parse_exit_stmt(&mut self) -> PResult<Stmt> {
        // A bare `exit` with no merged `for`/`while` is not valid grammar;
        // the lexer only ever hands the parser a bare `Exit` if the next
        // word didn't merge, which means this statement is malformed.
        self.error_here("expected `exit for` or `exit while`", DiagnosticCode::UNEXPECTED_TOKEN)
    }

    fn parse_print_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::Print, "`print`")?;
        let mut args = Vec::new();
        if !self.peek_kind().is_terminator() {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::Print(PrintStmt { args, span }))
    }

    fn parse_library_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::Library, "`library`")?;
        let path = self.expect(TokenKind::StringLiteral, "a library path string")?;
        if path.text.is_empty() {
            DiagnosticBuilder::error("`library` path must not be empty")
                .code(DiagnosticCode::EMPTY_LIBRARY_STRING)
                .span(path.span)
                .emit(self.handler);
        }
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::Library(LibraryStmt { path: path.text, span }))
    }

    fn parse_import_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::Import, "`import`")?;
        let path = self.expect(TokenKind::StringLiteral, "an import path string")?;
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::Import(ImportStmt { path: path.text, span }))
    }

    // ---- `if` statement: ExpectCondition -> AfterCondition -> {SingleLine, MultiLine} ----

    fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::If, "`if`")?;
        let condition = self.parse_expr()?;
        self.match_kind(TokenKind::Then);
        // Tolerate a trailing comment before the line decides single- vs
        // multi-line form.
        if self.check(TokenKind::Comment) {
            self.advance();
        }

        if matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Colon) {
            self.parse_if_multi_line(start, condition)
        } else {
            self.parse_if_single_line(start, condition)
        }
    }

    fn parse_if_single_line(&mut self, start: basc_util::Span, condition: Expr) -> PResult<Stmt> {
        let then_stmt = self.parse_stmt()?;
        let then_span = then_stmt.span();
        let then_branch = Block { stmts: vec![then_stmt], span: then_span };

        let mut else_ifs = Vec::new();
        while self.check(TokenKind::ElseIf) {
            let ei_start = self.peek().span;
            self.advance();
            let ei_condition = self.parse_expr()?;
            self.match_kind(TokenKind::Then);
            let ei_stmt = self.parse_stmt()?;
            let ei_span = ei_start.merge(ei_stmt.span());
            else_ifs.push(ElseIf { condition: ei_condition, then_branch: Block { span: ei_stmt.span(), stmts: vec![ei_stmt] }, span: ei_span });
        }

        let else_branch = if self.match_kind(TokenKind::Else) {
            let stmt = self.parse_stmt()?;
            let span = stmt.span();
            Some(Block { stmts: vec![stmt], span })
        } else {
            None
        };

        let span = self.span_from(start);
        Ok(Stmt::If(IfStmt { condition, then_branch, else_ifs, else_branch, span }))
    }

    fn parse_if_multi_line(&mut self, start: basc_util::Span, condition: Expr) -> PResult<Stmt> {
        let then_branch = self.parse_block_until(&[TokenKind::ElseIf, TokenKind::Else, TokenKind::EndIf])?;

        let mut else_ifs = Vec::new();
        while self.check(TokenKind::ElseIf) {
            let ei_start = self.peek().span;
            self.advance();
            let ei_condition = self.parse_expr()?;
            self.match_kind(TokenKind::Then);
            let ei_branch = self.parse_block_until(&[TokenKind::ElseIf, TokenKind::Else, TokenKind::EndIf])?;
            let ei_span = ei_start.merge(ei_branch.span);
            else_ifs.push(ElseIf { condition: ei_condition, then_branch: ei_branch, span: ei_span });
        }

        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(self.parse_block_until(&[TokenKind::EndIf])?)
        } else {
            None
        };

        self.expect(TokenKind::EndIf, "`end if`")?;
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::If(IfStmt { condition, then_branch, else_ifs, else_branch, span }))
    }

    /// Parses statements until the next token's kind is in `stop_kinds`,
    /// synchronizing past any statement that fails to parse so one bad line
    /// inside a block doesn't swallow everything after it.
    pub(crate) fn parse_block_until(&mut self, stop_kinds: &[TokenKind]) -> PResult<Block> {
        self.skip_terminators();
        let start = self.peek().span;
        let mut stmts = Vec::new();
        while !self.is_at_end() && !stop_kinds.contains(&self.peek_kind()) {
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(ParseFailed) => self.synchronize(),
            }
            self.skip_terminators();
        }
        let span = self.span_from(start);
        Ok(Block { stmts, span })
    }

    fn parse_while_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::While, "`while`")?;
        let condition = self.parse_expr()?;
        let body = self.parse_block_until(&[TokenKind::EndWhile])?;
        self.expect(TokenKind::EndWhile, "`end while`")?;
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::While(WhileStmt { condition, body, span }))
    }

    /// `for VAR = START to END [step STEP] ... end for` or
    /// `for each VAR in ITERABLE ... end for`.
    fn parse_for_or_foreach_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        if self.check(TokenKind::ForEach) {
            self.advance();
            let var = self.expect_identifier("a loop variable")?;
            self.expect(TokenKind::In, "`in`")?;
            let iterable = self.parse_expr()?;
            let body = self.parse_block_until(&[TokenKind::EndFor])?;
            self.expect(TokenKind::EndFor, "`end for`")?;
            let span = self.span_from(start);
            self.expect_terminator()?;
            return Ok(Stmt::ForEach(ForEachStmt { var: var.text, iterable, body, span }));
        }

        self.expect(TokenKind::For, "`for`")?;
        let var = self.expect_identifier("a loop variable")?;
        self.expect(TokenKind::Equal, "`=`")?;
        let range_start = self.parse_expr()?;
        self.expect(TokenKind::To, "`to`")?;
        let end = self.parse_expr()?;
        let step = if self.match_kind(TokenKind::Step) { Some(self.parse_expr()?) } else { None };
        let body = self.parse_block_until(&[TokenKind::EndFor])?;
        self.expect(TokenKind::EndFor, "`end for`")?;
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::For(ForStmt { var: var.text, start: range_start, end, step, body, span }))
    }

    // ---- functions/subs ----

    /// Shared parameter-list parser used both for function/sub declarations
    /// and class methods.
    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        let mut seen_optional = false;
        if !self.check(TokenKind::RParen) {
            loop {
                let start = self.peek().span;
                let name = self.expect_identifier("a parameter name")?;
                let default = if self.match_kind(TokenKind::Equal) { Some(self.parse_expr()?) } else { None };
                if default.is_some() {
                    seen_optional = true;
                } else if seen_optional {
                    DiagnosticBuilder::error("a required parameter cannot follow an optional one")
                        .code(DiagnosticCode::REQUIRED_PARAM_AFTER_OPTIONAL)
                        .span(start)
                        .emit(self.handler);
                }
                let ty = self.parse_optional_as_type()?;
                let span = self.span_from(start);
                params.push(Param { name: name.text, default, ty, span });
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        if params.len() > MAX_ARGS {
            DiagnosticBuilder::error(format!("more than {MAX_ARGS} parameters declared"))
                .code(DiagnosticCode::TOO_MANY_CALLABLE_PARAMETERS)
                .span(self.previous().span)
                .emit(self.handler);
        }
        Ok(params)
    }

    /// Shared by `FunctionStatement` (named, `require_name = true`) and the
    /// anonymous `Expr::Function` form (`require_name = false`).
    pub(crate) fn parse_function_decl(&mut self, require_name: bool) -> PResult<FunctionDecl> {
        let start = self.peek().span;
        let is_sub = self.check(TokenKind::Sub);
        self.advance();

        let name = if require_name {
            Some(self.expect_identifier("a function name")?.text)
        } else if self.check_identifier_like() {
            Some(self.advance().text)
        } else {
            None
        };

        let params = self.parse_params()?;
        let return_type = self.parse_optional_as_type()?;
        self.expect_terminator()?;

        let end_kind = if is_sub { TokenKind::EndSub } else { TokenKind::EndFunction };
        let body = self.parse_block_until(&[end_kind])?;
        self.expect(end_kind, if is_sub { "`end sub`" } else { "`end function`" })?;
        let span = self.span_from(start);

        Ok(FunctionDecl { name, params, return_type, body, is_sub, span })
    }

    fn parse_function_statement(&mut self) -> PResult<Stmt> {
        let decl = self.parse_function_decl(true)?;
        let span = decl.span;
        let stmt = FunctionStatementStmt { decl, span };
        self.expect_terminator()?;
        Ok(Stmt::FunctionStatement(stmt))
    }

    // ---- classes ----

    fn parse_class_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        self.expect(TokenKind::Class, "`class`")?;
        let (name, _) = self.parse_dotted_name("a class name")?;
        let extends = if self.match_kind(TokenKind::Extends) {
            Some(self.parse_dotted_name("a parent class name")?.0)
        } else {
            None
        };
        self.expect_terminator()?;

        let mut members = Vec::new();
        self.skip_terminators();
        while !self.is_at_end() && !self.check(TokenKind::EndClass) {
            match self.parse_class_member() {
                Ok(member) => members.push(member),
                Err(ParseFailed) => self.synchronize(),
            }
            self.skip_terminators();
        }
        self.expect(TokenKind::EndClass, "`end class`")?;
        let span = self.span_from(start);
        self.expect_terminator()?;

        Ok(Stmt::ClassStatement(ClassStatementStmt { name, extends, members, span }))
    }

    /// An access modifier (`public`/`private`/`protected`) is not a reserved
    /// word — it's matched by lowercased text against a plain identifier,
    /// same as any other contextual word the spec doesn't put in the
    /// reserved-word table.
    fn match_access_modifier(&mut self) -> AccessModifier {
        if self.check(TokenKind::Identifier) {
            let text = self.peek().text;
            let modifier = if text.eq_str("public") {
                Some(AccessModifier::Public)
            } else if text.eq_str("private") {
                Some(AccessModifier::Private)
            } else if text.eq_str("protected") {
                Some(AccessModifier::Protected)
            } else {
                None
            };
            if let Some(modifier) = modifier {
                self.advance();
                return modifier;
            }
        }
        AccessModifier::Public
    }

    fn parse_class_member(&mut self) -> PResult<Stmt> {
        if self.check(TokenKind::Comment) {
            return self.parse_comment_stmt();
        }

        let start = self.peek().span;
        let access = self.match_access_modifier();
        let is_override = self.match_kind(TokenKind::Override);

        if matches!(self.peek_kind(), TokenKind::Function | TokenKind::Sub) {
            let decl = self.parse_function_decl(true)?;
            let is_constructor = decl.name.map(|n| n.eq_str("new")).unwrap_or(false);
            if is_constructor && is_override {
                DiagnosticBuilder::error("a constructor cannot be declared `override`")
                    .code(DiagnosticCode::CONSTRUCTOR_CANNOT_BE_OVERRIDE)
                    .span(start)
                    .emit(self.handler);
            }
            let span = self.span_from(start);
            let function = FunctionStatementStmt { span: decl.span, decl };
            return Ok(Stmt::ClassMethod(ClassMethodStmt { access, is_override, function, span }));
        }

        let name = self.expect_identifier("a field name")?;
        let ty = self.parse_optional_as_type()?;
        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::ClassField(ClassFieldStmt { access, name: name.text, ty, span }))
    }

    // ---- place-expression statements: Assignment / DottedSet / IndexedSet / Increment / Expression ----

    fn parse_place_or_expr_stmt(&mut self) -> PResult<Stmt> {
        let start = self.peek().span;
        let expr = self.parse_expr()?;

        if self.match_kind(TokenKind::Equal) {
            let value = self.parse_expr()?;
            let span = self.span_from(start);
            let stmt = self.build_set_stmt(expr, value, span)?;
            self.expect_terminator()?;
            return Ok(stmt);
        }

        if let Some(op) = self.compound_assign_op() {
            self.advance();
            let rhs = self.parse_expr()?;
            let desugared = Expr::Binary(BinaryExpr {
                left: Box::new(expr.clone()),
                op,
                right: Box::new(rhs),
                span: expr.span(),
            });
            let span = self.span_from(start);
            let stmt = self.build_set_stmt(expr, desugared, span)?;
            self.expect_terminator()?;
            return Ok(stmt);
        }

        if matches!(self.peek_kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            if matches!(expr, Expr::Call(_)) {
                DiagnosticBuilder::error("`++`/`--` cannot apply to a call result")
                    .code(DiagnosticCode::INCREMENT_ON_CALL_RESULT)
                    .span(expr.span())
                    .emit(self.handler);
            }
            let op = if self.check(TokenKind::PlusPlus) { IncDecOp::Increment } else { IncDecOp::Decrement };
            self.advance();
            if matches!(self.peek_kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
                DiagnosticBuilder::error("`++`/`--` cannot be immediately followed by another `++`/`--`")
                    .code(DiagnosticCode::CONSECUTIVE_INCREMENT_DECREMENT)
                    .span(self.peek().span)
                    .emit(self.handler);
            }
            let span = self.span_from(start);
            self.expect_terminator()?;
            return Ok(Stmt::Increment(IncrementStmt { target: expr, op, span }));
        }

        let span = self.span_from(start);
        self.expect_terminator()?;
        Ok(Stmt::Expression(ExpressionStmt { expr, span }))
    }

    fn compound_assign_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::PlusEqual => Some(BinOp::Add),
            TokenKind::MinusEqual => Some(BinOp::Sub),
            TokenKind::StarEqual => Some(BinOp::Mul),
            TokenKind::SlashEqual => Some(BinOp::Div),
            TokenKind::AmpersandEqual => Some(BinOp::Concat),
            _ => None,
        }
    }

    fn build_set_stmt(&mut self, target: Expr, value: Expr, span: basc_util::Span) -> PResult<Stmt> {
        match target {
            Expr::Variable(v) => Ok(Stmt::Assignment(AssignmentStmt { target: v.name, value, span })),
            Expr::DottedGet(d) => Ok(Stmt::DottedSet(DottedSetStmt { target: *d.target, name: d.name, value, span })),
            Expr::IndexedGet(i) => {
                Ok(Stmt::IndexedSet(IndexedSetStmt { target: *i.target, index: *i.index, value, span }))
            }
            other => {
                DiagnosticBuilder::error("left-hand side of an assignment must be a variable, property, or index")
                    .code(DiagnosticCode::UNEXPECTED_TOKEN)
                    .span(other.span())
                    .emit(self.handler);
                Err(ParseFailed)
            }
        }
    }
}
