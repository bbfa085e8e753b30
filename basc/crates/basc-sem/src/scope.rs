//! Symbol index over a set of parsed scripts, and the component-inheritance
//! scope built from it (section 4.3).
//!
//! A BrightScript component owns a set of script files and optionally
//! `extends` another component. A name visible to a component is either
//! declared in one of its own scripts or inherited from an ancestor
//! component's scripts — nearer declarations win, mirroring ordinary lexical
//! shadowing but across the component graph instead of nested blocks.

use indexmap::IndexMap;

use basc_par::ast::{AccessModifier, Ast, ClassStatementStmt, Stmt};
use basc_util::index_vec::{define_idx, IndexVec};
use basc_util::{Span, Symbol};

define_idx!(ScriptId);
define_idx!(ComponentId);

/// A top-level function or sub declaration, as seen by the symbol index.
#[derive(Debug, Clone)]
pub struct FunctionSig {
    pub name: Symbol,
    pub required_params: usize,
    pub total_params: usize,
    pub span: Span,
    pub script: ScriptId,
}

/// A class method, carried separately from [`FunctionSig`] since override
/// resolution needs the method's class context, not just its name.
#[derive(Debug, Clone)]
pub struct MethodSig {
    pub name: Symbol,
    pub access: AccessModifier,
    pub is_override: bool,
    pub required_params: usize,
    pub total_params: usize,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldSig {
    pub name: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassSig {
    pub name: Symbol,
    pub extends: Option<Symbol>,
    pub methods: Vec<MethodSig>,
    pub fields: Vec<FieldSig>,
    pub span: Span,
    pub script: ScriptId,
}

impl ClassSig {
    pub fn method(&self, name: Symbol) -> Option<&MethodSig> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn field(&self, name: Symbol) -> Option<&FieldSig> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Leaf name of a (possibly namespaced, dot-separated) class name, e.g.
    /// `"Utils.Shapes.Rect"` -> `"Rect"`.
    pub fn leaf_name(&self) -> &'static str {
        leaf_name(self.name)
    }

    pub fn is_namespaced(&self) -> bool {
        self.name.as_str().contains('.')
    }
}

pub fn leaf_name(name: Symbol) -> &'static str {
    match name.as_str().rsplit_once('.') {
        Some((_, leaf)) => leaf,
        None => name.as_str(),
    }
}

/// The symbols one script file contributes to its owning component.
#[derive(Debug, Clone, Default)]
pub struct ScriptSymbols {
    pub functions: Vec<FunctionSig>,
    pub classes: Vec<ClassSig>,
    /// `import "path"` statements, in source order.
    pub imports: Vec<(Symbol, Span)>,
}

impl ScriptSymbols {
    /// Walks a script's top-level statements, collecting declarations. Does
    /// not recurse into function/method bodies — only the top-level shape
    /// matters for the symbol index.
    pub fn from_ast(ast: &Ast, script: ScriptId) -> Self {
        let mut symbols = ScriptSymbols::default();
        for stmt in ast {
            match stmt {
                Stmt::FunctionStatement(f) => {
                    let Some(name) = f.decl.name else { continue };
                    let required = f.decl.params.iter().filter(|p| p.default.is_none()).count();
                    symbols.functions.push(FunctionSig {
                        name,
                        required_params: required,
                        total_params: f.decl.params.len(),
                        span: f.span,
                        script,
                    });
                }
                Stmt::ClassStatement(c) => {
                    symbols.classes.push(class_sig_from_stmt(c, script));
                }
                Stmt::Import(i) => symbols.imports.push((i.path, i.span)),
                _ => {}
            }
        }
        symbols
    }
}

fn class_sig_from_stmt(c: &ClassStatementStmt, script: ScriptId) -> ClassSig {
    let mut methods = Vec::new();
    let mut fields = Vec::new();
    for member in &c.members {
        match member {
            Stmt::ClassMethod(m) => {
                let Some(name) = m.function.decl.name else { continue };
                let required = m.function.decl.params.iter().filter(|p| p.default.is_none()).count();
                methods.push(MethodSig {
                    name,
                    access: m.access,
                    is_override: m.is_override,
                    required_params: required,
                    total_params: m.function.decl.params.len(),
                    span: m.span,
                });
            }
            Stmt::ClassField(f) => fields.push(FieldSig { name: f.name, span: f.span }),
            _ => {}
        }
    }
    ClassSig { name: c.name, extends: c.extends, methods, fields, span: c.span, script }
}

/// One parsed script file, tagged with the logical path it was loaded under
/// (used both for diagnostics' `file` field and for import resolution).
pub struct Script {
    pub logical_path: Symbol,
    pub ast: Ast,
    pub symbols: ScriptSymbols,
}

/// A SceneGraph-style component: a named node in the inheritance graph that
/// owns a set of scripts and optionally extends another component.
pub struct Component {
    pub name: Symbol,
    pub extends_name: Option<Symbol>,
    pub extends: Option<ComponentId>,
    pub scripts: Vec<ScriptId>,
    pub span: Span,
}

/// The full program: every parsed script plus the component graph relating
/// them. Built incrementally by the driver, then queried by `validate`.
#[derive(Default)]
pub struct ProgramIndex {
    pub scripts: IndexVec<ScriptId, Script>,
    pub components: IndexVec<ComponentId, Component>,
}

impl ProgramIndex {
    pub fn new() -> Self {
        Self { scripts: IndexVec::new(), components: IndexVec::new() }
    }

    pub fn add_script(&mut self, logical_path: Symbol, ast: Ast) -> ScriptId {
        let id = ScriptId::from_usize(self.scripts.len());
        let symbols = ScriptSymbols::from_ast(&ast, id);
        self.scripts.push(Script { logical_path, ast, symbols });
        id
    }

    pub fn add_component(
        &mut self,
        name: Symbol,
        extends_name: Option<Symbol>,
        scripts: Vec<ScriptId>,
        span: Span,
    ) -> ComponentId {
        self.components.push(Component { name, extends_name, extends: None, scripts, span })
    }

    /// Resolves every component's `extends_name` to a [`ComponentId`] within
    /// this program. A component whose parent isn't itself a parsed
    /// component (e.g. a platform-builtin `Group`/`Node`) is left
    /// unresolved — that's the expected shape for the root of a chain, not
    /// an error.
    pub fn link_components(&mut self) {
        let by_name: IndexMap<Symbol, ComponentId> =
            self.components.iter_enumerated().map(|(id, c)| (c.name, id)).collect();
        let resolved: Vec<Option<ComponentId>> = self
            .components
            .as_slice()
            .iter()
            .map(|c| c.extends_name.and_then(|parent| by_name.get(&parent).copied()))
            .collect();
        for (component, parent) in self.components.as_mut_slice().iter_mut().zip(resolved) {
            component.extends = parent;
        }
    }

    /// A component's inheritance chain, nearest first, with a cycle guard
    /// (a malformed `extends` graph must still terminate).
    pub fn component_chain(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        let mut seen = std::collections::HashSet::new();
        while let Some(cid) = current {
            if !seen.insert(cid) {
                break;
            }
            chain.push(cid);
            current = self.components[cid].extends;
        }
        chain
    }
}

/// The name lookup scope for one component: its own scripts plus, level by
/// level, every ancestor's scripts. `levels[0]` is always the component's
/// own scripts.
pub struct ComponentScope<'a> {
    pub index: &'a ProgramIndex,
    pub component: ComponentId,
    pub levels: Vec<Vec<ScriptId>>,
}

impl<'a> ComponentScope<'a> {
    pub fn for_component(index: &'a ProgramIndex, component: ComponentId) -> Self {
        let levels = index
            .component_chain(component)
            .into_iter()
            .map(|cid| index.components[cid].scripts.clone())
            .collect();
        Self { index, component, levels }
    }

    pub fn resolve_function(&self, name: Symbol) -> Option<&FunctionSig> {
        for level in &self.levels {
            for script in level {
                if let Some(f) = self.index.scripts[*script].symbols.functions.iter().find(|f| f.name == name) {
                    return Some(f);
                }
            }
        }
        None
    }

    pub fn resolve_class(&self, name: Symbol) -> Option<&ClassSig> {
        for level in &self.levels {
            for script in level {
                if let Some(c) = self.index.scripts[*script].symbols.classes.iter().find(|c| c.name == name) {
                    return Some(c);
                }
            }
        }
        None
    }

    /// An ancestor-only lookup, used for override resolution: a method
    /// should resolve against a *parent* class, never the declaring class
    /// itself, so override checks start at `levels[1..]`.
    pub fn resolve_class_in_ancestors(&self, name: Symbol) -> Option<&ClassSig> {
        for level in self.levels.iter().skip(1) {
            for script in level {
                if let Some(c) = self.index.scripts[*script].symbols.classes.iter().find(|c| c.name == name) {
                    return Some(c);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basc_util::Handler;

    fn parse(src: &str) -> Ast {
        let handler = Handler::new();
        basc_par::parse(src, &handler)
    }

    #[test]
    fn script_symbols_collect_top_level_functions_and_classes() {
        let ast = parse("function main()\nend function\nclass Foo\nend class\n");
        let symbols = ScriptSymbols::from_ast(&ast, ScriptId::from_usize(0));
        assert_eq!(symbols.functions.len(), 1);
        assert_eq!(symbols.classes.len(), 1);
    }

    #[test]
    fn required_params_excludes_defaulted_ones() {
        let ast = parse("function f(a, b = 1)\nend function\n");
        let symbols = ScriptSymbols::from_ast(&ast, ScriptId::from_usize(0));
        assert_eq!(symbols.functions[0].required_params, 1);
        assert_eq!(symbols.functions[0].total_params, 2);
    }

    #[test]
    fn component_chain_is_nearest_first_and_terminates_on_cycles() {
        let mut index = ProgramIndex::new();
        let a = index.add_component(Symbol::intern("A"), Some(Symbol::intern("B")), vec![], Span::DUMMY);
        let b = index.add_component(Symbol::intern("B"), Some(Symbol::intern("A")), vec![], Span::DUMMY);
        index.link_components();
        let chain = index.component_chain(a);
        assert_eq!(chain, vec![a, b]);
    }

    #[test]
    fn scope_resolves_function_from_ancestor_when_not_declared_locally() {
        let mut index = ProgramIndex::new();
        let parent_script = index.add_script(Symbol::intern("parent.bs"), parse("function helper()\nend function\n"));
        let child_script = index.add_script(Symbol::intern("child.bs"), parse("function main()\nend function\n"));
        let parent = index.add_component(Symbol::intern("Parent"), None, vec![parent_script], Span::DUMMY);
        let child =
            index.add_component(Symbol::intern("Child"), Some(Symbol::intern("Parent")), vec![child_script], Span::DUMMY);
        index.link_components();
        let _ = parent;
        let scope = ComponentScope::for_component(&index, child);
        assert!(scope.resolve_function(Symbol::intern("helper")).is_some());
        assert!(scope.resolve_function(Symbol::intern("main")).is_some());
        assert!(scope.resolve_function(Symbol::intern("nope")).is_none());
    }
}
