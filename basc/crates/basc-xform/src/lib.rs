//! basc-xform - Transpiler for the BASIC dialects
//!
//! Lowers dialect S (classes, namespaces, imports, template strings) to
//! dialect L source text a BrightScript runtime can load directly, plus a
//! source map back to the original file (section 4.5). Component XML
//! descriptors get the matching treatment: `.bs` script references and
//! `text/brighterscript` types are rewritten to their `.brs`/
//! `text/brightscript` runtime equivalents.
//!
//! This crate only lowers already-parsed, already-validated ASTs — it does
//! not re-run the lexer/parser and does not itself decide whether a program
//! is safe to emit (that gate lives in the driver, per section 7: a file
//! with errors still gets best-effort transpiled output).

mod emitmap;
mod lower;
pub mod xml;

pub use emitmap::{EmitMap, MappingSegment};
pub use lower::{TranspileOutcome, Transpiler, TranspileOutput};
pub use xml::{parse_component_doc, rewrite_component_xml, ComponentDoc, ScriptTag};
