//! JSON output formatter

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, MessageId, Position, Severity};
use crate::engine::LintResult;
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| {
            log::error!("failed to serialize output: {}", e);
            String::new()
        })
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: Vec<JsonDiagnostic<'a>>,
    summary: JsonSummary,
}

/// Positions are 1-based lines and 0-based columns
#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    rule_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<MessageId>,
    severity: Severity,
    message: &'a str,
    file: String,
    start: Position,
    end: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_line: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<JsonFix<'a>>,
}

#[derive(Serialize)]
struct JsonFix<'a> {
    description: &'a str,
    /// Byte range `[start, end)` in the original file
    range: [usize; 2],
    replacement: &'a str,
}

#[derive(Serialize)]
struct JsonSummary {
    files_processed: usize,
    files_skipped: usize,
    files_with_errors: usize,
    files_with_warnings: usize,
    error_count: usize,
    warning_count: usize,
    info_count: usize,
    duration_ms: u128,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
    fn from(d: &'a Diagnostic) -> Self {
        JsonDiagnostic {
            rule_id: &d.rule_id,
            message_id: d.message_id,
            severity: d.severity,
            message: &d.message,
            file: d.location.file.display().to_string(),
            start: d.location.start,
            end: d.location.end,
            source_line: d.source_line.as_deref(),
            suggestion: d.suggestion.as_deref(),
            fix: d.fix.as_ref().map(|f| JsonFix {
                description: &f.description,
                range: [f.range.start, f.range.end],
                replacement: &f.replacement,
            }),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &LintResult) -> String {
        let output = JsonOutput {
            diagnostics: result.diagnostics.iter().map(JsonDiagnostic::from).collect(),
            summary: JsonSummary {
                files_processed: result.files_processed,
                files_skipped: result.files_skipped,
                files_with_errors: result.files_with_errors,
                files_with_warnings: result.files_with_warnings,
                error_count: result.error_count,
                warning_count: result.warning_count,
                info_count: result.info_count,
                duration_ms: result.duration.as_millis(),
            },
        };

        self.to_json(&output)
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        self.to_json(&JsonDiagnostic::from(diagnostic))
    }
}
