//! Output formatters for lint results

mod compact;
mod json;
mod text;

pub use compact::CompactFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::config::OutputFormat;
use crate::diagnostic::Diagnostic;
use crate::engine::LintResult;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire lint result
    fn format(&self, result: &LintResult) -> String;

    /// Format a single diagnostic
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}

/// Formatter for a configured output format
pub fn formatter_for(format: OutputFormat, colored: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new();
            Box::new(if colored {
                formatter
            } else {
                formatter.without_color()
            })
        }
        OutputFormat::Compact => Box::new(CompactFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
    }
}
