//! The two-pass validator (section 4.4): a Structural pass that walks a
//! single script in isolation, and a Scoped pass that walks a script against
//! its component's resolved name scope.
//!
//! Both passes are pure functions over an immutable [`ProgramIndex`] — they
//! emit diagnostics but never mutate the index, which is what makes
//! `validate(validate(p)) == validate(p)` (as a diagnostics multiset) hold:
//! nothing about a prior run's output feeds back into what a later run sees.

use basc_par::ast::{Ast, Block, ClassStatementStmt, Expr, Stmt};
use basc_util::diagnostic::{DiagnosticCode, RelatedInformation};
use basc_util::{DiagnosticBuilder, Handler, Span, Symbol};

use crate::scope::{leaf_name, ComponentId, ComponentScope, ProgramIndex, ScriptId};

/// Tells the Scoped pass what casing an `import`'s logical path would have
/// if it matched a real file. The driver implements this against its
/// `FileProvider`; tests can stub it directly.
pub trait PathCaseProvider {
    /// Returns the on-disk path's canonical casing for `logical_path`, or
    /// `None` if nothing on disk matches it at all (handled elsewhere — a
    /// missing import is not this trait's concern).
    fn canonical_case(&self, logical_path: &str) -> Option<String>;
}

/// A `PathCaseProvider` that never flags a mismatch, for callers that don't
/// have filesystem access (e.g. a script passed in as a string in tests).
pub struct NoCaseCheck;

impl PathCaseProvider for NoCaseCheck {
    fn canonical_case(&self, _logical_path: &str) -> Option<String> {
        None
    }
}

/// Runs the Structural pass over a single script: rules that don't need any
/// other script or component to check (section 4.4, Structural).
pub fn validate_structural(ast: &Ast, file: &str, handler: &Handler) {
    for stmt in ast {
        if let Stmt::ClassStatement(class) = stmt {
            validate_class_structural(class, file, handler);
        }
    }
}

fn validate_class_structural(class: &ClassStatementStmt, file: &str, handler: &Handler) {
    let mut seen: Vec<(Symbol, Span)> = Vec::new();
    for member in &class.members {
        let (name, span) = match member {
            Stmt::ClassField(f) => (f.name, f.span),
            Stmt::ClassMethod(m) => match m.function.decl.name {
                Some(name) => (name, m.span),
                None => continue,
            },
            _ => continue,
        };
        if let Some((_, first_span)) = seen.iter().find(|(n, _)| *n == name) {
            DiagnosticBuilder::error(format!("`{}` is already declared on this class", name.as_str()))
                .code(DiagnosticCode::DUPLICATE_CLASS_MEMBER)
                .span(span)
                .file(file)
                .related(RelatedInformation {
                    message: "first declared here".to_string(),
                    span: *first_span,
                    file: file.to_string(),
                })
                .emit(handler);
        } else {
            seen.push((name, span));
        }
    }

    if class.extends.is_none() {
        return;
    }
    for member in &class.members {
        let Stmt::ClassMethod(m) = member else { continue };
        let Some(name) = m.function.decl.name else { continue };
        if !name.eq_str("new") {
            continue;
        }
        if let Some(first) = m.function.decl.body.stmts.first() {
            if !is_super_call(first) {
                DiagnosticBuilder::error("a call to `super.new(...)` must be the constructor's first statement")
                    .code(DiagnosticCode::SUPER_CALL_MUST_BE_FIRST_STATEMENT)
                    .span(first.span())
                    .file(file)
                    .emit(handler);
            }
        } else {
            DiagnosticBuilder::error("a call to `super.new(...)` must be the constructor's first statement")
                .code(DiagnosticCode::SUPER_CALL_MUST_BE_FIRST_STATEMENT)
                .span(m.span)
                .file(file)
                .emit(handler);
        }
    }
}

fn is_super_call(stmt: &Stmt) -> bool {
    let Stmt::Expression(e) = stmt else { return false };
    let Expr::Call(call) = &e.expr else { return false };
    let Expr::DottedGet(dotted) = call.callee.as_ref() else { return false };
    if !dotted.name.eq_str("new") {
        return false;
    }
    matches!(dotted.target.as_ref(), Expr::Variable(v) if v.name.eq_str("super"))
}

/// Runs the Scoped pass over the whole program: every component's own
/// declarations against its component-level scope (duplicates, overrides,
/// call/class resolution), then every script against its owning component's
/// resolved scope (section 4.4, Scoped).
pub fn validate_scoped(index: &ProgramIndex, provider: &dyn PathCaseProvider, handler: &Handler) {
    for (component_id, _) in index.components.iter_enumerated() {
        validate_component_declarations(index, component_id, handler);
        let scope = ComponentScope::for_component(index, component_id);
        for &script_id in &index.components[component_id].scripts {
            validate_script_scoped(index, script_id, &scope, handler);
            validate_imports(index, script_id, provider, handler);
        }
    }
}

/// Duplicate/override/namespace-collision checks for one component's own
/// declarations, plus cross-level shadowing of an ancestor's declarations.
fn validate_component_declarations(index: &ProgramIndex, component_id: ComponentId, handler: &Handler) {
    let component = &index.components[component_id];
    let file = component.name.as_str();

    if component.extends_name.is_none() && !component.name.eq_str("Group") && !component.name.eq_str("Node") {
        DiagnosticBuilder::warning(format!(
            "component `{}` has no `extends` attribute; assuming the platform root `Group`",
            component.name.as_str()
        ))
        .code(DiagnosticCode::MISSING_EXTENDS_ATTRIBUTE)
        .span(component.span)
        .file(file)
        .emit(handler);
    }

    // Own-level duplicates: two scripts in this same component declaring the
    // same function or class.
    let mut own_functions: Vec<(Symbol, Span, String)> = Vec::new();
    let mut own_classes: Vec<(Symbol, Span, String)> = Vec::new();
    for &script_id in &component.scripts {
        let script = &index.scripts[script_id];
        let script_file = script.logical_path.as_str();
        for f in &script.symbols.functions {
            if let Some((_, first_span, first_file)) = own_functions.iter().find(|(n, _, _)| *n == f.name) {
                DiagnosticBuilder::error(format!(
                    "function `{}` is implemented more than once in this scope",
                    f.name.as_str()
                ))
                .code(DiagnosticCode::DUPLICATE_FUNCTION_IMPLEMENTATION)
                .span(f.span)
                .file(script_file)
                .related(RelatedInformation {
                    message: "first implemented here".to_string(),
                    span: *first_span,
                    file: first_file.clone(),
                })
                .emit(handler);
            } else {
                own_functions.push((f.name, f.span, script_file.to_string()));
            }
        }
        for c in &script.symbols.classes {
            if let Some((_, first_span, first_file)) = own_classes.iter().find(|(n, _, _)| *n == c.name) {
                DiagnosticBuilder::error(format!("class `{}` is declared more than once in this scope", c.name.as_str()))
                    .code(DiagnosticCode::DUPLICATE_CLASS_DECLARATION)
                    .span(c.span)
                    .file(script_file)
                    .related(RelatedInformation {
                        message: "first declared here".to_string(),
                        span: *first_span,
                        file: first_file.clone(),
                    })
                    .emit(handler);
            } else {
                own_classes.push((c.name, c.span, script_file.to_string()));
            }
        }
    }

    // Namespaced vs. non-namespaced classes sharing a leaf name, within this
    // component's own declarations.
    for i in 0..own_classes.len() {
        for j in (i + 1)..own_classes.len() {
            let (name_a, span_a, file_a) = &own_classes[i];
            let (name_b, _, _) = &own_classes[j];
            let namespaced_a = name_a.as_str().contains('.');
            let namespaced_b = name_b.as_str().contains('.');
            if namespaced_a == namespaced_b {
                continue;
            }
            if leaf_name(*name_a) == leaf_name(*name_b) {
                DiagnosticBuilder::error(format!(
                    "namespaced class `{}` cannot share a name with non-namespaced class `{}`",
                    name_a.as_str(),
                    name_b.as_str()
                ))
                .code(DiagnosticCode::NAMESPACED_CLASS_CANNOT_SHARE_NAME_WITH_NON_NAMESPACED_CLASS)
                .span(*span_a)
                .file(file_a)
                .emit(handler);
            }
        }
    }

    // Ancestor shadowing: a function this component declares that an
    // ancestor component also declares is a hint, not an error — the child
    // wins, but it's worth flagging in case the redefinition was accidental.
    let chain = index.component_chain(component_id);
    for &ancestor_id in chain.iter().skip(1) {
        let ancestor = &index.components[ancestor_id];
        for &ancestor_script_id in &ancestor.scripts {
            let ancestor_script = &index.scripts[ancestor_script_id];
            for f in &ancestor_script.symbols.functions {
                if let Some((_, child_span, child_file)) = own_functions.iter().find(|(n, _, _)| *n == f.name) {
                    DiagnosticBuilder::warning(format!(
                        "`{}` redefines a function already implemented by an ancestor scope",
                        f.name.as_str()
                    ))
                    .code(DiagnosticCode::OVERRIDES_ANCESTOR_FUNCTION)
                    .span(*child_span)
                    .file(child_file)
                    .related(RelatedInformation {
                        message: "ancestor implementation here".to_string(),
                        span: f.span,
                        file: ancestor_script.logical_path.as_str().to_string(),
                    })
                    .emit(handler);
                }
            }
        }
    }
}

fn validate_script_scoped(index: &ProgramIndex, script_id: ScriptId, scope: &ComponentScope<'_>, handler: &Handler) {
    let script = &index.scripts[script_id];
    let file = script.logical_path.as_str();

    for class in &script.symbols.classes {
        for method in &class.methods {
            if method.name.eq_str("new") {
                continue;
            }
            let ancestor_method = class
                .extends
                .and_then(|parent| scope.resolve_class_in_ancestors(parent))
                .and_then(|parent_class| parent_class.method(method.name));
            match (method.is_override, ancestor_method) {
                (true, None) => {
                    DiagnosticBuilder::error(format!(
                        "`{}` is declared `override` but no ancestor class declares it",
                        method.name.as_str()
                    ))
                    .code(DiagnosticCode::METHOD_DOES_NOT_EXIST_ON_ANCESTOR)
                    .span(method.span)
                    .file(file)
                    .emit(handler);
                }
                (false, Some(ancestor)) => {
                    DiagnosticBuilder::error(format!(
                        "`{}` overrides an ancestor method but is missing the `override` keyword",
                        method.name.as_str()
                    ))
                    .code(DiagnosticCode::MISSING_OVERRIDE_KEYWORD)
                    .span(method.span)
                    .file(file)
                    .related(RelatedInformation {
                        message: "ancestor method here".to_string(),
                        span: ancestor.span,
                        file: file.to_string(),
                    })
                    .emit(handler);
                }
                _ => {}
            }
        }

        for field in &class.fields {
            let Some(parent_name) = class.extends else { continue };
            let Some(parent) = scope.resolve_class_in_ancestors(parent_name) else { continue };
            if let Some(ancestor_field) = parent.field(field.name) {
                DiagnosticBuilder::error(format!(
                    "field `{}` is already declared on an ancestor class",
                    field.name.as_str()
                ))
                .code(DiagnosticCode::FIELD_CANNOT_BE_OVERRIDDEN)
                .span(field.span)
                .file(file)
                .related(RelatedInformation {
                    message: "ancestor field here".to_string(),
                    span: ancestor_field.span,
                    file: file.to_string(),
                })
                .emit(handler);
            }
        }
    }

    for_each_call_and_new(&script.ast, &mut |expr| match expr {
        Expr::Call(call) => {
            if let Expr::Variable(v) = call.callee.as_ref() {
                match scope.resolve_function(v.name) {
                    None => {
                        DiagnosticBuilder::error(format!("call to unknown function `{}`", v.name.as_str()))
                            .code(DiagnosticCode::CALL_TO_UNKNOWN_FUNCTION)
                            .span(call.span)
                            .file(file)
                            .emit(handler);
                    }
                    Some(sig) => {
                        let count = call.args.len();
                        if count < sig.required_params || count > sig.total_params {
                            DiagnosticBuilder::error(format!(
                                "`{}` takes {} argument(s) but {} were supplied",
                                v.name.as_str(),
                                param_count_range(sig.required_params, sig.total_params),
                                count
                            ))
                            .code(DiagnosticCode::MISMATCHED_ARGUMENT_COUNT)
                            .span(call.span)
                            .file(file)
                            .emit(handler);
                        }
                    }
                }
            }
        }
        Expr::New(new_expr) => {
            if scope.resolve_class(new_expr.class_name).is_none() {
                DiagnosticBuilder::error(format!("`new` references unknown class `{}`", new_expr.class_name.as_str()))
                    .code(DiagnosticCode::UNKNOWN_CLASS_REFERENCE)
                    .span(new_expr.span)
                    .file(file)
                    .emit(handler);
            }
        }
        _ => {}
    });
}

fn param_count_range(required: usize, total: usize) -> String {
    if required == total {
        required.to_string()
    } else {
        format!("{required}-{total}")
    }
}

fn validate_imports(index: &ProgramIndex, script_id: ScriptId, provider: &dyn PathCaseProvider, handler: &Handler) {
    let script = &index.scripts[script_id];
    let file = script.logical_path.as_str();

    if !script.symbols.imports.is_empty() {
        let own_functions: std::collections::HashSet<Symbol> =
            script.symbols.functions.iter().map(|f| f.name).collect();
        let own_classes: std::collections::HashSet<Symbol> = script.symbols.classes.iter().map(|c| c.name).collect();
        let mut references_something_foreign = false;
        for_each_call_and_new(&script.ast, &mut |expr| match expr {
            Expr::Call(call) => {
                if let Expr::Variable(v) = call.callee.as_ref() {
                    if !own_functions.contains(&v.name) {
                        references_something_foreign = true;
                    }
                }
            }
            Expr::New(new_expr) => {
                if !own_classes.contains(&new_expr.class_name) {
                    references_something_foreign = true;
                }
            }
            _ => {}
        });
        if !references_something_foreign {
            for (path, span) in &script.symbols.imports {
                DiagnosticBuilder::warning(format!("import `{}` is never used by this script", path.as_str()))
                    .code(DiagnosticCode::UNUSED_IMPORT)
                    .span(*span)
                    .file(file)
                    .emit(handler);
            }
        }
    }

    for (path, span) in &script.symbols.imports {
        if let Some(canonical) = provider.canonical_case(path.as_str()) {
            if canonical != path.as_str() {
                DiagnosticBuilder::warning(format!(
                    "import path `{}` does not match the on-disk casing `{canonical}`",
                    path.as_str()
                ))
                .code(DiagnosticCode::SCRIPT_IMPORT_CASE_MISMATCH)
                .span(*span)
                .file(file)
                .emit(handler);
            }
        }
    }
}

/// Recursively invokes `f` on every `Expr::Call`/`Expr::New` reachable from
/// `ast`'s top-level statements, including inside function and method bodies.
fn for_each_call_and_new(ast: &Ast, f: &mut dyn FnMut(&Expr)) {
    for stmt in ast {
        walk_stmt(stmt, f);
    }
}

fn walk_block(block: &Block, f: &mut dyn FnMut(&Expr)) {
    for stmt in &block.stmts {
        walk_stmt(stmt, f);
    }
}

fn walk_stmt(stmt: &Stmt, f: &mut dyn FnMut(&Expr)) {
    match stmt {
        Stmt::Assignment(s) => walk_expr(&s.value, f),
        Stmt::DottedSet(s) => {
            walk_expr(&s.target, f);
            walk_expr(&s.value, f);
        }
        Stmt::IndexedSet(s) => {
            walk_expr(&s.target, f);
            walk_expr(&s.index, f);
            walk_expr(&s.value, f);
        }
        Stmt::Expression(s) => walk_expr(&s.expr, f),
        Stmt::Increment(s) => walk_expr(&s.target, f),
        Stmt::If(s) => {
            walk_expr(&s.condition, f);
            walk_block(&s.then_branch, f);
            for ei in &s.else_ifs {
                walk_expr(&ei.condition, f);
                walk_block(&ei.then_branch, f);
            }
            if let Some(else_branch) = &s.else_branch {
                walk_block(else_branch, f);
            }
        }
        Stmt::While(s) => {
            walk_expr(&s.condition, f);
            walk_block(&s.body, f);
        }
        Stmt::For(s) => {
            walk_expr(&s.start, f);
            walk_expr(&s.end, f);
            if let Some(step) = &s.step {
                walk_expr(step, f);
            }
            walk_block(&s.body, f);
        }
        Stmt::ForEach(s) => {
            walk_expr(&s.iterable, f);
            walk_block(&s.body, f);
        }
        Stmt::Return(s) => {
            if let Some(value) = &s.value {
                walk_expr(value, f);
            }
        }
        Stmt::Print(s) => {
            for arg in &s.args {
                walk_expr(arg, f);
            }
        }
        Stmt::FunctionStatement(s) => walk_block(&s.decl.body, f),
        Stmt::ClassStatement(s) => {
            for member in &s.members {
                walk_stmt(member, f);
            }
        }
        Stmt::ClassMethod(s) => walk_block(&s.function.decl.body, f),
        Stmt::ClassField(_)
        | Stmt::ExitWhile(_)
        | Stmt::ExitFor(_)
        | Stmt::Goto(_)
        | Stmt::Label(_)
        | Stmt::End(_)
        | Stmt::Stop(_)
        | Stmt::Library(_)
        | Stmt::Import(_)
        | Stmt::Comment(_)
        | Stmt::Block(_) => {}
    }
}

fn walk_expr(expr: &Expr, f: &mut dyn FnMut(&Expr)) {
    f(expr);
    match expr {
        Expr::Grouping(e) => walk_expr(&e.inner, f),
        Expr::Unary(e) => walk_expr(&e.operand, f),
        Expr::Binary(e) => {
            walk_expr(&e.left, f);
            walk_expr(&e.right, f);
        }
        Expr::Call(e) => {
            walk_expr(&e.callee, f);
            for arg in &e.args {
                walk_expr(arg, f);
            }
        }
        Expr::DottedGet(e) => walk_expr(&e.target, f),
        Expr::IndexedGet(e) => {
            walk_expr(&e.target, f);
            walk_expr(&e.index, f);
        }
        Expr::ArrayLiteral(e) => {
            for element in &e.elements {
                walk_expr(element, f);
            }
        }
        Expr::AALiteral(e) => {
            for member in &e.members {
                walk_expr(member, f);
            }
        }
        Expr::AAMember(e) => walk_expr(&e.value, f),
        Expr::New(e) => {
            for arg in &e.args {
                walk_expr(arg, f);
            }
        }
        Expr::Function(e) => walk_block(&e.decl.body, f),
        Expr::Literal(_) | Expr::Variable(_) => {}
    }
}
