//! basc-sem - Semantic validator for the BASIC dialects
//!
//! Where [`basc_par`] turns tokens into a tree, this crate turns a set of
//! trees plus the component graph relating them into diagnostics. There is
//! no type system here — BASIC's values are dynamically typed end to end —
//! so "semantic" means exactly the two passes section 4.4 describes:
//!
//! - **Structural**: rules checkable from a single parsed script alone
//!   (duplicate class members, constructor `super.new` placement).
//! - **Scoped**: rules that need the component a script belongs to, and
//!   that component's resolved inheritance scope (call/class resolution,
//!   override matching, cross-script duplicate declarations).
//!
//! Both passes are read-only over [`ProgramIndex`] and diagnostics-only in
//! effect, which is what makes running them twice idempotent (section 4.4).

pub mod scope;
pub mod validate;

pub use scope::{
    ClassSig, Component, ComponentId, ComponentScope, FieldSig, FunctionSig, MethodSig, ProgramIndex, Script,
    ScriptId, ScriptSymbols,
};
pub use validate::{validate_scoped, validate_structural, NoCaseCheck, PathCaseProvider};

use basc_util::Handler;

/// Runs both passes over an already-built [`ProgramIndex`]: the Structural
/// pass over every script in isolation, then the Scoped pass over the whole
/// component graph. Diagnostics land in `handler`; this function never
/// fails outright, matching the parser's best-effort philosophy — a file
/// with semantic errors still produces a full diagnostic set for every
/// other file in the program.
pub fn validate(index: &ProgramIndex, provider: &dyn PathCaseProvider, handler: &Handler) {
    for script in index.scripts.as_slice() {
        validate_structural(&script.ast, script.logical_path.as_str(), handler);
    }
    validate_scoped(index, provider, handler);
}

#[cfg(test)]
mod edge_cases;
