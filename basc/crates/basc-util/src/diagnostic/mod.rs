//! Diagnostic module - error and warning reporting infrastructure.
//!
//! This module provides types for creating, formatting, and reporting
//! compiler diagnostics (errors, warnings, hints, and info messages).
//!
//! # Examples
//!
//! ```
//! use basc_util::diagnostic::{DiagnosticBuilder, Span, DiagnosticCode};
//!
//! let diag = DiagnosticBuilder::error("call to unknown function `foo`")
//!     .code(DiagnosticCode::CALL_TO_UNKNOWN_FUNCTION)
//!     .span(Span::DUMMY)
//!     .build();
//! ```

mod builder;
mod codes;
mod level;

pub use builder::{DiagnosticBuilder, SourceSnippet};
pub use codes::DiagnosticCode;
pub use level::Level;

use crate::Span;
use std::cell::RefCell;

/// A single related-location annotation attached to a diagnostic.
///
/// Mirrors the Program interface's `relatedInformation` entries: additional
/// spans (possibly in other files) that help explain a diagnostic, such as
/// pointing at the ancestor method an `override` is meant to match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInformation {
    pub message: String,
    pub span: Span,
    pub file: String,
}

/// A diagnostic message with severity and location.
///
/// Shape matches the external Diagnostic contract: `{code, severity, message,
/// range, file, relatedInformation?}`. `file` is filled in by whichever layer
/// knows the logical path for `span.file_id` (lexer/parser/validator emit
/// diagnostics keyed only by `Span`; the coordinator resolves `file` when
/// diagnostics leave a single file's pipeline).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub code: Option<DiagnosticCode>,
    pub file: Option<String>,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
    pub related: Vec<RelatedInformation>,
    pub snippets: Vec<SourceSnippet>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            file: None,
            notes: Vec::new(),
            helps: Vec::new(),
            related: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    pub fn hint(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Hint, message, span)
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn with_related(mut self, related: RelatedInformation) -> Self {
        self.related.push(related);
        self
    }

    pub fn with_snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }
}

/// Collects diagnostics produced while processing one file.
///
/// Diagnostics accumulate into a per-file bag keyed by `(range, code)`;
/// running the same pass twice must yield the same multiset, so `Handler`
/// does not deduplicate — callers that need the bag semantics of section 4.4
/// sort/dedupe at the point they compare two runs, not here.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    panic_on_error: bool,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: false,
        }
    }

    /// A handler that panics on the first error, for use in tests that assert
    /// a code path never emits an error diagnostic.
    pub fn new_panicking() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            panic_on_error: true,
        }
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        if self.panic_on_error && diagnostic.level == Level::Error {
            panic!("diagnostic error: {}", diagnostic.message);
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn build_error(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::error(message).span(span)
    }

    pub fn build_warning(&self, span: Span, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::warning(message).span(span)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level == Level::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.borrow().iter().filter(|d| d.level == Level::Warning).count()
    }

    /// Snapshot of all diagnostics emitted so far, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Number of diagnostics emitted so far. Pair with [`Handler::truncate`]
    /// to roll back diagnostics from an abandoned parse attempt (section 4.2:
    /// a discarded statement's diagnostics must not leak into the output).
    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards every diagnostic emitted after `len`.
    pub fn truncate(&self, len: usize) {
        self.diagnostics.borrow_mut().truncate(len);
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_builders_set_level() {
        assert_eq!(Diagnostic::error("e", Span::DUMMY).level, Level::Error);
        assert_eq!(Diagnostic::warning("w", Span::DUMMY).level, Level::Warning);
        assert_eq!(Diagnostic::hint("h", Span::DUMMY).level, Level::Hint);
    }

    #[test]
    fn handler_tracks_error_count_only_for_errors() {
        let handler = Handler::new();
        handler.emit(Diagnostic::error("bad", Span::DUMMY));
        handler.emit(Diagnostic::warning("meh", Span::DUMMY));
        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 1);
        assert_eq!(handler.diagnostics().len(), 2);
    }

    #[test]
    fn handler_clear_resets_bag() {
        let handler = Handler::new();
        handler.emit(Diagnostic::error("bad", Span::DUMMY));
        handler.clear();
        assert!(!handler.has_errors());
        assert!(handler.diagnostics().is_empty());
    }

    #[test]
    #[should_panic(expected = "diagnostic error")]
    fn panicking_handler_panics_on_error() {
        let handler = Handler::new_panicking();
        handler.emit(Diagnostic::error("bad", Span::DUMMY));
    }

    #[test]
    fn builder_sets_code_notes_and_help() {
        let handler = Handler::new();
        handler
            .build_error(Span::DUMMY, "call to unknown function `go`")
            .code(DiagnosticCode::CALL_TO_UNKNOWN_FUNCTION)
            .with_note("checked every ancestor scope")
            .with_help("did you forget an `import`?")
            .emit(&handler);

        let diags = handler.diagnostics();
        assert_eq!(diags[0].code, Some(DiagnosticCode::CALL_TO_UNKNOWN_FUNCTION));
        assert_eq!(diags[0].notes, vec!["checked every ancestor scope"]);
        assert_eq!(diags[0].helps, vec!["did you forget an `import`?"]);
    }
}
