//! Common types and utilities for bast commands.
//!
//! This module provides shared types, constants, and utility functions
//! used across all command implementations to ensure consistency.

use basc_util::diagnostic::{Diagnostic, Level};
use clap::ValueEnum;
use serde::Serialize;

/// Output format shared by `validate` and `transpile`'s diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Human,
    Json,
}

// ============================================================================
// Diagnostic reporting
// ============================================================================

/// The section 6 `range` shape: a zero-based `{line, character}` pair for
/// the start and end of a diagnostic's span.
#[derive(Debug, Serialize)]
pub struct RangeJson {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Serialize)]
pub struct PositionRangeJson {
    pub start: RangeJson,
    pub end: RangeJson,
}

/// `{code, severity, message, range, file, relatedInformation?}`, matching
/// the external Diagnostic contract exactly, for `--format json`.
#[derive(Debug, Serialize)]
pub struct DiagnosticJson {
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub range: PositionRangeJson,
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<RelatedInformationJson>,
}

#[derive(Debug, Serialize)]
pub struct RelatedInformationJson {
    pub message: String,
    pub file: String,
}

impl From<&Diagnostic> for DiagnosticJson {
    fn from(d: &Diagnostic) -> Self {
        Self {
            code: d.code.map(|c| c.as_str()),
            severity: d.level.to_string(),
            message: d.message.clone(),
            range: PositionRangeJson {
                start: RangeJson { line: d.span.line.saturating_sub(1), character: d.span.column.saturating_sub(1) },
                end: RangeJson { line: d.span.line.saturating_sub(1), character: d.span.column.saturating_sub(1) },
            },
            file: d.file.clone(),
            related_information: d
                .related
                .iter()
                .map(|r| RelatedInformationJson { message: r.message.clone(), file: r.file.clone() })
                .collect(),
        }
    }
}

/// One human-readable line for a diagnostic: `file:line:column: severity: message`.
pub fn format_diagnostic_human(d: &Diagnostic) -> String {
    let file = d.file.as_deref().unwrap_or("<unknown>");
    format!("{}:{}:{}: {}: {}", file, d.span.line, d.span.column, d.level, d.message)
}

/// Highest severity present, used to decide the section 6 exit code:
/// 0 when only warnings/hints/info remain, 1 when any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.level == Level::Error)
}

// ============================================================================
// Output Messages
// ============================================================================

/// Standard output message templates.
pub mod output_messages {
    pub const WROTE_FILE: &str = "✅ Wrote: {}";
    pub const VALIDATION_PASSED: &str = "✅ No errors found ({} file(s) checked)";
}

#[cfg(test)]
mod tests {
    use super::*;
    use basc_util::diagnostic::{Diagnostic, DiagnosticCode};
    use basc_util::Span;

    #[test]
    fn human_format_includes_file_line_and_column() {
        let d = Diagnostic::error("call to unknown function `goAway`", Span::new(0, 6, 2, 1))
            .with_code(DiagnosticCode::CALL_TO_UNKNOWN_FUNCTION)
            .with_file("main.bs");
        let line = format_diagnostic_human(&d);
        assert!(line.starts_with("main.bs:2:1: error:"));
    }

    #[test]
    fn has_errors_is_false_for_only_warnings() {
        let warning = Diagnostic::warning("unused import", Span::DUMMY);
        assert!(!has_errors(&[warning]));
    }

    #[test]
    fn has_errors_is_true_when_any_diagnostic_is_an_error() {
        let warning = Diagnostic::warning("unused import", Span::DUMMY);
        let error = Diagnostic::error("call to unknown function", Span::DUMMY);
        assert!(has_errors(&[warning, error]));
    }

    #[test]
    fn diagnostic_json_uses_zero_based_range() {
        let d = Diagnostic::error("oops", Span::new(0, 1, 3, 5)).with_file("a.bs");
        let json = DiagnosticJson::from(&d);
        assert_eq!(json.range.start.line, 2);
        assert_eq!(json.range.start.character, 4);
        assert_eq!(json.severity, "error");
    }
}
