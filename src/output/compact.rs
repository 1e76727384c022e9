//! One diagnostic per line, `file:line:col: severity: rule: message`

use super::OutputFormatter;
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

#[derive(Debug, Default)]
pub struct CompactFormatter;

impl CompactFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for CompactFormatter {
    fn format(&self, result: &LintResult) -> String {
        result
            .diagnostics
            .iter()
            .map(|d| self.format_diagnostic(d) + "\n")
            .collect()
    }

    fn format_diagnostic(&self, d: &Diagnostic) -> String {
        let start = d.location.start;
        format!(
            "{}:{}:{}: {}: {}: {}",
            d.location.file.display(),
            start.line,
            start.column + 1,
            d.severity,
            d.rule_id,
            d.message
        )
    }
}
