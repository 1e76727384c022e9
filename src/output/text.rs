//! Human-readable text output formatter

use super::OutputFormatter;
use crate::diagnostic::{Diagnostic, Severity};
use crate::engine::LintResult;
use colored::*;
use std::collections::BTreeMap;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show source context
    pub show_source: bool,

    /// Show fix descriptions
    pub show_fixes: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_source: true,
            show_fixes: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
            Severity::Info => s.blue(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colored {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// `file:line:col`, columns shown 1-based
    fn format_location(&self, diag: &Diagnostic) -> String {
        format!(
            "{}:{}:{}",
            diag.location.file.display(),
            diag.location.start.line,
            diag.location.start.column + 1
        )
    }

    fn count(&self, n: usize, singular: &str, plural: &str, color: Color) -> Option<String> {
        (n > 0).then(|| self.paint(&format!("{} {}", n, if n == 1 { singular } else { plural }), color))
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &LintResult) -> String {
        let mut output = String::new();

        // Group diagnostics by file
        let mut by_file: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for diag in &result.diagnostics {
            by_file.entry(&diag.location.file).or_default().push(diag);
        }

        for (file, diagnostics) in &by_file {
            if self.colored {
                output.push_str(&format!("{}\n", file.display().to_string().underline()));
            } else {
                output.push_str(&format!("{}\n", file.display()));
            }

            for diag in diagnostics {
                output.push_str(&self.format_diagnostic(diag));
                output.push('\n');
            }
        }

        // Statistics
        if self.show_stats {
            output.push_str(&format!(
                "{} {} processed",
                result.files_processed,
                if result.files_processed == 1 {
                    "file"
                } else {
                    "files"
                }
            ));

            let counts: Vec<String> = [
                self.count(result.error_count, "error", "errors", Color::Red),
                self.count(result.warning_count, "warning", "warnings", Color::Yellow),
                self.count(result.info_count, "info", "infos", Color::Blue),
            ]
            .into_iter()
            .flatten()
            .collect();

            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            let fixable = result.fixable_count();
            if fixable > 0 {
                output.push_str(&format!(
                    "{} fixable with --fix\n",
                    self.paint(&fixable.to_string(), Color::Green)
                ));
            }

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                result.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let bar = self.paint("|", Color::Blue);
        let mut output = format!(
            "{}: {}[{}]: {}\n",
            self.format_location(diag),
            self.severity_str(diag.severity),
            self.paint(&diag.rule_id, Color::Cyan),
            diag.message
        );

        if self.show_source {
            if let Some(source) = &diag.source_line {
                let line_num = self.paint(&format!("{:>4}", diag.location.start.line), Color::Blue);
                output.push_str(&format!("{} {} {}\n", line_num, bar, source));

                let length = diag.location.length();
                if length > 0 {
                    output.push_str(&format!(
                        "     {} {}{}\n",
                        bar,
                        " ".repeat(diag.location.start.column),
                        self.paint(&"^".repeat(length), Color::Red)
                    ));
                }
            }
        }

        if let Some(suggestion) = &diag.suggestion {
            output.push_str(&format!(
                "     {} help: did you mean '{}'?\n",
                self.paint("=", Color::Blue),
                suggestion
            ));
        }

        if self.show_fixes {
            if let Some(fix) = &diag.fix {
                output.push_str(&format!(
                    "     {} fix: {}\n",
                    self.paint("=", Color::Green),
                    fix.description
                ));
            }
        }

        output
    }
}
