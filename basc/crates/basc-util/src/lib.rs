//! basc-util - Core Utilities and Foundation Types
//!
//! Foundation types shared by every `basc-*` crate: string interning
//! ([`symbol`]), source positions ([`span`]), diagnostics ([`diagnostic`]),
//! typed arena indices ([`index_vec`], [`def_id`]), and the crate's error
//! taxonomy ([`error`]). None of these are specific to the BASIC dialects
//! themselves — they are the plumbing every later stage (lexer, parser,
//! validator, transpiler, driver) builds on.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use error::{DiagnosticError, IndexVecError, SourceMapError, SymbolError};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;
