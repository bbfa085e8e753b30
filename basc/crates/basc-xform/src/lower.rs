//! S-dialect -> L-dialect lowering.
//!
//! Classes, `new`, namespaces, and template strings are the only
//! superset-only constructs (section 4.5); every other statement and
//! expression form is re-emitted as close-to-verbatim BrightScript text,
//! rebuilt from the AST rather than sliced out of the source so that
//! indentation can be re-synthesized from block depth.

use basc_par::ast::*;
use basc_util::{Span, Symbol};

use crate::emitmap::EmitMap;

/// Name the runtime helper that stringifies a non-string value, called at
/// every template-string interpolation site a literal `Concat` chain can't
/// prove already yields a string. Configurable because the spec treats the
/// helper's own behavior as out of scope — only its name is this crate's
/// business.
pub struct Transpiler {
    pub stringify_fn: Symbol,
}

impl Default for Transpiler {
    fn default() -> Self {
        Self { stringify_fn: Symbol::intern("bslib_toString") }
    }
}

/// Lowered L-dialect source text plus the map back to the S-dialect input.
pub struct TranspileOutput {
    pub code: String,
    pub map: EmitMap,
}

/// Result of [`Transpiler::transpile_checked`]: partial output plus whether
/// cancellation cut the emission short (section 5).
pub struct TranspileOutcome {
    pub output: TranspileOutput,
    pub cancelled: bool,
}

impl Transpiler {
    /// Lowers a full parsed script.
    pub fn transpile(&self, ast: &Ast) -> TranspileOutput {
        self.transpile_checked(ast, &|| false).output
    }

    /// Lowers a full parsed script, checking `is_cancelled` before emitting
    /// each top-level statement. On cancellation, returns the partial output
    /// emitted so far with `cancelled: true` and no further statements are
    /// processed, matching section 5's statement-level cancellation
    /// checkpoint.
    pub fn transpile_checked(&self, ast: &Ast, is_cancelled: &dyn Fn() -> bool) -> TranspileOutcome {
        let mut emitter = Emitter { transpiler: self, out: String::new(), map: EmitMap::new() };
        let mut cancelled = false;
        for stmt in ast {
            if is_cancelled() {
                cancelled = true;
                break;
            }
            emitter.emit_stmt(stmt, 0);
        }
        TranspileOutcome { output: TranspileOutput { code: emitter.out, map: emitter.map }, cancelled }
    }
}

/// Replaces `.` with `_` in a (possibly namespaced) name, the namespace
/// flattening rule: `a.b.C` -> `a_b_C`. A no-op for already-flat names.
fn flatten_name(name: Symbol) -> String {
    name.as_str().replace('.', "_")
}

struct Emitter<'a> {
    transpiler: &'a Transpiler,
    out: String,
    map: EmitMap,
}

const INDENT_UNIT: &str = "    ";

impl<'a> Emitter<'a> {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT_UNIT);
        }
    }

    /// Appends `text` to the output, recording a mapping segment from the
    /// bytes just appended back to `original`.
    fn push_mapped(&mut self, text: &str, original: Span) {
        let start = self.out.len();
        self.out.push_str(text);
        let end = self.out.len();
        self.map.push(Span::new(start, end, original.line, original.column), original);
    }

    fn line(&mut self, depth: usize, text: &str, original: Span) {
        self.indent(depth);
        self.push_mapped(text, original);
        self.out.push('\n');
    }

    fn emit_stmts(&mut self, stmts: &[Stmt], depth: usize) {
        for stmt in stmts {
            self.emit_stmt(stmt, depth);
        }
    }

    fn emit_block(&mut self, block: &Block, depth: usize) {
        self.emit_stmts(&block.stmts, depth);
    }

    fn emit_stmt(&mut self, stmt: &Stmt, depth: usize) {
        match stmt {
            Stmt::Assignment(s) => {
                let rhs = self.render_expr(&s.value);
                self.line(depth, &format!("{} = {rhs}", s.target.as_str()), s.span);
            }
            Stmt::DottedSet(s) => {
                let target = self.render_expr(&s.target);
                let value = self.render_expr(&s.value);
                self.line(depth, &format!("{target}.{} = {value}", s.name.as_str()), s.span);
            }
            Stmt::IndexedSet(s) => {
                let target = self.render_expr(&s.target);
                let index = self.render_expr(&s.index);
                let value = self.render_expr(&s.value);
                self.line(depth, &format!("{target}[{index}] = {value}"), s.span);
            }
            Stmt::Expression(s) => {
                let expr = self.render_expr(&s.expr);
                self.line(depth, &expr, s.span);
            }
            Stmt::Increment(s) => {
                let target = self.render_expr(&s.target);
                let op = match s.op {
                    IncDecOp::Increment => "++",
                    IncDecOp::Decrement => "--",
                };
                self.line(depth, &format!("{target}{op}"), s.span);
            }
            Stmt::If(s) => self.emit_if(s, depth),
            Stmt::While(s) => {
                let cond = self.render_expr(&s.condition);
                self.line(depth, &format!("while {cond}"), s.span);
                self.emit_block(&s.body, depth + 1);
                self.line(depth, "end while", s.span);
            }
            Stmt::ExitWhile(span) => self.line(depth, "exit while", *span),
            Stmt::For(s) => self.emit_for(s, depth),
            Stmt::ForEach(s) => self.emit_for_each(s, depth),
            Stmt::ExitFor(span) => self.line(depth, "exit for", *span),
            Stmt::Return(s) => {
                let value = s.value.as_ref().map(|v| self.render_expr(v));
                match value {
                    Some(v) => self.line(depth, &format!("return {v}"), s.span),
                    None => self.line(depth, "return", s.span),
                }
            }
            Stmt::Goto(s) => self.line(depth, &format!("goto {}", s.label.as_str()), s.span),
            Stmt::Label(s) => self.line(depth, &format!("{}:", s.name.as_str()), s.span),
            Stmt::Print(s) => {
                let args = s.args.iter().map(|a| self.render_expr(a)).collect::<Vec<_>>().join("; ");
                self.line(depth, &format!("print {args}"), s.span);
            }
            Stmt::End(span) => self.line(depth, "end", *span),
            Stmt::Stop(span) => self.line(depth, "stop", *span),
            Stmt::Library(s) => {
                self.line(depth, &format!("library \"{}\"", s.path.as_str()), s.span);
            }
            Stmt::Import(_) => {
                // Contributes to the component's script-tag list (section 4.5);
                // imports have no in-band emission in L-dialect text.
            }
            Stmt::FunctionStatement(s) => self.emit_function_stmt(s, depth),
            Stmt::ClassStatement(c) => self.emit_class(c, depth),
            Stmt::ClassField(_) | Stmt::ClassMethod(_) => {
                // Only ever reached directly if a class member leaks outside its
                // class, which the parser never produces; lowered from within
                // `emit_class` instead.
            }
            Stmt::Comment(s) => self.line(depth, &format!("' {}", s.text.as_str()), s.span),
            Stmt::Block(b) => self.emit_block(b, depth),
        }
    }

    fn emit_if(&mut self, s: &IfStmt, depth: usize) {
        let cond = self.render_expr(&s.condition);
        self.line(depth, &format!("if {cond} then"), s.span);
        self.emit_block(&s.then_branch, depth + 1);
        for else_if in &s.else_ifs {
            let cond = self.render_expr(&else_if.condition);
            self.line(depth, &format!("else if {cond} then"), else_if.span);
            self.emit_block(&else_if.then_branch, depth + 1);
        }
        if let Some(else_branch) = &s.else_branch {
            self.line(depth, "else", else_branch.span);
            self.emit_block(else_branch, depth + 1);
        }
        self.line(depth, "end if", s.span);
    }

    fn emit_for(&mut self, s: &ForStmt, depth: usize) {
        let start = self.render_expr(&s.start);
        let end = self.render_expr(&s.end);
        let header = match &s.step {
            Some(step) => format!("for {} = {start} to {end} step {}", s.var.as_str(), self.render_expr(step)),
            None => format!("for {} = {start} to {end}", s.var.as_str()),
        };
        self.line(depth, &header, s.span);
        self.emit_block(&s.body, depth + 1);
        self.line(depth, "end for", s.span);
    }

    fn emit_for_each(&mut self, s: &ForEachStmt, depth: usize) {
        let iterable = self.render_expr(&s.iterable);
        self.line(depth, &format!("for each {} in {iterable}", s.var.as_str()), s.span);
        self.emit_block(&s.body, depth + 1);
        self.line(depth, "end for", s.span);
    }

    fn emit_function_stmt(&mut self, s: &FunctionStatementStmt, depth: usize) {
        self.line(depth, &render_decl_header(&s.decl), s.span);
        self.emit_block(&s.decl.body, depth + 1);
        self.line(depth, if s.decl.is_sub { "end sub" } else { "end function" }, s.span);
    }

    /// Lowers a class into a constructor function returning an associative
    /// array: fields become AA entries initialized to their declared default
    /// (absent a default, `invalid`), methods become AA entries bound to
    /// function expressions closing over the instance, and `extends` is
    /// inlined by first constructing the parent and merging its members in
    /// as a captured `super` value every method can still reach.
    fn emit_class(&mut self, c: &ClassStatementStmt, depth: usize) {
        let ctor_name = flatten_name(c.name);
        self.line(depth, &format!("function {ctor_name}()"), c.span);

        self.indent(depth + 1);
        self.push_mapped("instance = {}\n", c.span);

        if let Some(parent) = c.extends {
            let parent_ctor = flatten_name(parent);
            self.indent(depth + 1);
            self.push_mapped(&format!("super = {parent_ctor}()\n"), c.span);
            self.indent(depth + 1);
            self.push_mapped("instance.super = super\n", c.span);
            self.indent(depth + 1);
            self.push_mapped("for each key in super.keys()\n", c.span);
            self.indent(depth + 2);
            self.push_mapped("instance[key] = super[key]\n", c.span);
            self.indent(depth + 1);
            self.push_mapped("end for\n", c.span);
        }

        for member in &c.members {
            match member {
                Stmt::ClassField(f) => {
                    self.indent(depth + 1);
                    self.push_mapped(&format!("instance.{} = invalid\n", f.name.as_str()), f.span);
                }
                Stmt::ClassMethod(m) => {
                    let header = render_decl_header(&m.function.decl);
                    self.indent(depth + 1);
                    self.push_mapped(&format!("instance.{} = {header}\n", m.function.decl.name.unwrap().as_str()), m.span);
                    self.emit_block(&m.function.decl.body, depth + 2);
                    self.indent(depth + 1);
                    self.push_mapped(
                        if m.function.decl.is_sub { "end sub\n" } else { "end function\n" },
                        m.span,
                    );
                }
                _ => {}
            }
        }

        self.indent(depth + 1);
        self.push_mapped("return instance\n", c.span);
        self.line(depth, "end function", c.span);
    }

    /// Renders an expression to L-dialect text. Pure (no source-map
    /// entries): mappings are recorded at statement granularity by the
    /// callers above, which is the unit the spec's diagnostics and the
    /// driver's per-statement cancellation checkpoint both already operate
    /// on.
    fn render_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(l) => render_literal(&l.value),
            Expr::Variable(v) => v.name.as_str().to_string(),
            Expr::Grouping(g) => format!("({})", self.render_expr(&g.inner)),
            Expr::Unary(u) => match u.op {
                UnOp::Not => format!("not {}", self.render_expr(&u.operand)),
                UnOp::Negate => format!("-{}", self.render_expr(&u.operand)),
            },
            Expr::Binary(b) => self.render_binary(b),
            Expr::Call(c) => {
                let callee = self.render_expr(&c.callee);
                let args = c.args.iter().map(|a| self.render_expr(a)).collect::<Vec<_>>().join(", ");
                format!("{callee}({args})")
            }
            Expr::DottedGet(d) => format!("{}.{}", self.render_expr(&d.target), d.name.as_str()),
            Expr::IndexedGet(g) => format!("{}[{}]", self.render_expr(&g.target), self.render_expr(&g.index)),
            Expr::ArrayLiteral(a) => {
                let items = a.elements.iter().map(|e| self.render_expr(e)).collect::<Vec<_>>().join(", ");
                format!("[{items}]")
            }
            Expr::AALiteral(a) => {
                let members = a.members.iter().map(|m| self.render_expr(m)).collect::<Vec<_>>().join(", ");
                format!("{{{members}}}")
            }
            Expr::AAMember(m) => format!("{}: {}", m.key.as_str(), self.render_expr(&m.value)),
            Expr::Function(f) => {
                let mut body = Emitter { transpiler: self.transpiler, out: String::new(), map: EmitMap::new() };
                body.out.push_str(&render_decl_header(&f.decl));
                body.out.push('\n');
                body.emit_block(&f.decl.body, 1);
                body.out.push_str(if f.decl.is_sub { "end sub" } else { "end function" });
                body.out
            }
            Expr::New(n) => self.render_new(n),
        }
    }

    /// A `new` expression lowers to a direct call to the flattened
    /// constructor function.
    fn render_new(&self, n: &NewExpr) -> String {
        let ctor = flatten_name(n.class_name);
        let args = n.args.iter().map(|a| self.render_expr(a)).collect::<Vec<_>>().join(", ");
        format!("{ctor}({args})")
    }

    fn render_binary(&self, b: &BinaryExpr) -> String {
        if b.op == BinOp::Concat {
            let left = self.render_concat_operand(&b.left);
            let right = self.render_concat_operand(&b.right);
            return format!("{left} & {right}");
        }
        let op = match b.op {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::Equal => "=",
            BinOp::NotEqual => "<>",
            BinOp::Less => "<",
            BinOp::LessEqual => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::IntDiv => "\\",
            BinOp::Mod => "mod",
            BinOp::Exponent => "^",
            BinOp::Concat => unreachable!(),
        };
        format!("{} {op} {}", self.render_expr(&b.left), self.render_expr(&b.right))
    }

    /// Wraps a `Concat` operand in the configured stringifier unless it is
    /// already a string literal or itself a `Concat` chain (which the inner
    /// call has already guaranteed yields a string).
    ///
    /// The parser folds both a backtick template string's interpolations
    /// and a user-written `&` chain into the same `BinOp::Concat` tree, with
    /// nothing in the AST marking which syntax produced a given node.
    /// Wrapping every non-string, non-Concat operand uniformly is still
    /// correct for a bare `&` chain: stringifying an operand that is already
    /// a string is a no-op, so the two syntaxes share one lowering rule
    /// without needing a parser-level marker to tell them apart.
    fn render_concat_operand(&self, expr: &Expr) -> String {
        let rendered = self.render_expr(expr);
        if self.is_known_string(expr) {
            rendered
        } else {
            format!("{}({rendered})", self.transpiler.stringify_fn.as_str())
        }
    }

    fn is_known_string(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Literal(l) => matches!(l.value, Literal::Str(_)),
            Expr::Binary(b) => b.op == BinOp::Concat,
            Expr::Grouping(g) => self.is_known_string(&g.inner),
            _ => false,
        }
    }
}

fn render_decl_header(decl: &FunctionDecl) -> String {
    let keyword = if decl.is_sub { "sub" } else { "function" };
    let name = decl.name.map(|n| n.as_str().to_string()).unwrap_or_default();
    let params = decl
        .params
        .iter()
        .map(|p| match &p.ty {
            Some(ty) => format!("{} as {}", p.name.as_str(), render_type(ty)),
            None => p.name.as_str().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    match &decl.return_type {
        Some(ty) if !decl.is_sub => format!("{keyword} {name}({params}) as {}", render_type(ty)),
        _ => format!("{keyword} {name}({params})"),
    }
}

fn render_type(ty: &Type) -> String {
    match ty {
        Type::Integer => "integer".to_string(),
        Type::LongInteger => "longinteger".to_string(),
        Type::Float => "float".to_string(),
        Type::Double => "double".to_string(),
        Type::String => "string".to_string(),
        Type::Boolean => "boolean".to_string(),
        Type::Object => "object".to_string(),
        Type::Dynamic => "dynamic".to_string(),
        Type::Void => "void".to_string(),
        Type::Named(name) => flatten_name(*name),
    }
}

fn render_literal(lit: &Literal) -> String {
    match lit {
        Literal::Integer(v) => v.to_string(),
        Literal::LongInteger(v) => format!("{v}&"),
        Literal::Float(v) => format!("{v}!"),
        Literal::Double(v) => format!("{v}#"),
        Literal::Str(s) => format!("\"{}\"", s.as_str().replace('"', "\"\"")),
        Literal::Bool(b) => if *b { "true".to_string() } else { "false".to_string() },
    }
}
