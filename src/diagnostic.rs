//! Diagnostic types for linting results

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

/// Severity level for diagnostics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Warning - potential issue
    Warning,
    /// Error - definite problem
    #[default]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "hint" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// A point in a source file: 1-based line, 0-based character column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Source span of a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Start of the highlighted region
    pub start: Position,
    /// End of the highlighted region (exclusive column)
    pub end: Position,
}

impl Location {
    pub fn new(file: PathBuf, start: Position, end: Position) -> Self {
        Self { file, start, end }
    }

    /// A location pointing at the very beginning of a file
    pub fn file_start(file: PathBuf) -> Self {
        Self::new(file, Position::new(1, 0), Position::new(1, 0))
    }

    /// Number of columns covered when the span sits on a single line
    pub fn length(&self) -> usize {
        if self.start.line == self.end.line {
            self.end.column.saturating_sub(self.start.column)
        } else {
            0
        }
    }
}

/// Message classification, one per message template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageId {
    /// No (or insufficient) top-level group
    DoesNotExist,
    /// A group was declared but the project defines no vocabulary
    NoDefinedGroups,
    /// A group value is not part of the vocabulary
    InvalidGroupName,
    /// A group tag without a value
    EmptyGroup,
    /// The scaffolded `TODO` group was never replaced
    PlaceholderGroupName,
    /// The scaffolded file description was never replaced
    PlaceholderFileText,
}

impl MessageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageId::DoesNotExist => "doesNotExist",
            MessageId::NoDefinedGroups => "noDefinedGroups",
            MessageId::InvalidGroupName => "invalidGroupName",
            MessageId::EmptyGroup => "emptyGroup",
            MessageId::PlaceholderGroupName => "placeholderGroupName",
            MessageId::PlaceholderFileText => "placeholderFileText",
        }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A machine-applicable textual replacement for one docblock.
///
/// An insertion is a replacement of an empty range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Description of the fix
    pub description: String,
    /// Byte range in the original file that gets replaced
    pub range: Range<usize>,
    /// The replacement text
    pub replacement: String,
}

impl Fix {
    /// Insert `text` before byte `offset`
    pub fn insert(description: &str, offset: usize, text: String) -> Self {
        Self {
            description: description.to_string(),
            range: offset..offset,
            replacement: text,
        }
    }

    /// Replace the byte `range` with `text`
    pub fn replace(description: &str, range: Range<usize>, text: String) -> Self {
        Self {
            description: description.to_string(),
            range,
            replacement: text,
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }
}

/// A lint diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule ID that triggered this diagnostic
    pub rule_id: String,
    /// Message classification (absent for engine-level problems)
    pub message_id: Option<MessageId>,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: Location,
    /// The source line (for display)
    pub source_line: Option<String>,
    /// Closest allowed word, phrased by the formatters
    pub suggestion: Option<String>,
    /// Suggested fix
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(rule_id: &str, severity: Severity, message: &str, location: Location) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            message_id: None,
            severity,
            message: message.to_string(),
            location,
            source_line: None,
            suggestion: None,
            fix: None,
        }
    }

    pub fn with_message_id(mut self, id: MessageId) -> Self {
        self.message_id = Some(id);
        self
    }

    /// Add source line for display
    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Check if this diagnostic has a fix
    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }
}
