//! Diagnostic builder for fluent diagnostic construction.

use super::{Diagnostic, DiagnosticCode, Level, RelatedInformation, Span};

/// A source code snippet for display in diagnostics.
///
/// Contains the source line(s) affected by the diagnostic, with optional
/// highlighting of the specific range.
#[derive(Clone, Debug)]
pub struct SourceSnippet {
    pub line: String,
    pub line_number: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub label: Option<String>,
}

impl SourceSnippet {
    pub fn new(
        line: impl Into<String>,
        line_number: usize,
        start_column: usize,
        end_column: usize,
        label: Option<impl Into<String>>,
    ) -> Self {
        Self {
            line: line.into(),
            line_number,
            start_column,
            end_column,
            label: label.map(Into::into),
        }
    }

    pub fn point(line: impl Into<String>, line_number: usize, column: usize) -> Self {
        Self {
            line: line.into(),
            line_number,
            start_column: column,
            end_column: column,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Format the snippet for display: the source line plus a caret line.
    pub fn format(&self) -> String {
        let line_num_width = self.line_number.to_string().len().max(3);
        let mut result = String::new();

        result.push_str(&format!(
            "{:>width$} | {}\n",
            self.line_number,
            self.line,
            width = line_num_width
        ));
        result.push_str(&format!("{:>width$} | ", "", width = line_num_width));

        let underline_start = self.start_column.saturating_sub(1);
        let underline_len = (self.end_column - self.start_column).max(1);

        for _ in 0..underline_start {
            result.push(' ');
        }
        for _ in 0..underline_len {
            result.push('^');
        }
        if let Some(ref label) = self.label {
            result.push_str(&format!(" {label}"));
        }

        result
    }
}

/// Builder for constructing diagnostics with a fluent API.
///
/// # Examples
///
/// ```
/// use basc_util::diagnostic::{DiagnosticBuilder, Span, DiagnosticCode};
///
/// let diag = DiagnosticBuilder::error("unexpected token")
///     .code(DiagnosticCode::UNEXPECTED_TOKEN)
///     .span(Span::DUMMY)
///     .help("try removing the extra character")
///     .build();
/// ```
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
    code: Option<DiagnosticCode>,
    file: Option<String>,
    notes: Vec<String>,
    helps: Vec<String>,
    related: Vec<RelatedInformation>,
    snippets: Vec<SourceSnippet>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: Span::DUMMY,
            code: None,
            file: None,
            notes: Vec::new(),
            helps: Vec::new(),
            related: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn hint(message: impl Into<String>) -> Self {
        Self::new(Level::Hint, message)
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    /// Alias for [`note`](Self::note), matching `Diagnostic::with_note`'s name.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Alias for [`help`](Self::help), matching `Diagnostic::with_help`'s name.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn related(mut self, related: RelatedInformation) -> Self {
        self.related.push(related);
        self
    }

    pub fn snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
            code: self.code,
            file: self.file,
            notes: self.notes,
            helps: self.helps,
            related: self.related,
            snippets: self.snippets,
        }
    }

    /// Build and emit the diagnostic to the given handler.
    ///
    /// ```
    /// use basc_util::diagnostic::{DiagnosticBuilder, Handler, Span};
    ///
    /// let handler = Handler::new();
    /// DiagnosticBuilder::error("something went wrong")
    ///     .span(Span::DUMMY)
    ///     .emit(&handler);
    ///
    /// assert!(handler.has_errors());
    /// ```
    pub fn emit(self, handler: &super::Handler) {
        handler.emit(self.build());
    }
}
