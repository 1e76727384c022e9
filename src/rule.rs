//! Rule metadata

use crate::diagnostic::{MessageId, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Code that is definitely wrong or useless
    #[default]
    Correctness,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Correctness => write!(f, "correctness"),
        }
    }
}

/// One message template of a rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMessage {
    pub id: MessageId,
    /// Template with `{name}` placeholders
    pub template: String,
}

/// A lint rule definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule identifier (e.g., "must-match")
    pub id: String,

    /// Detailed description
    pub description: String,

    /// Default severity level
    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub category: RuleCategory,

    /// Whether the rule offers automatic fixes
    #[serde(default)]
    pub fixable: bool,

    #[serde(default)]
    pub messages: Vec<RuleMessage>,
}

impl Rule {
    /// Create a new rule with minimal required fields
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            severity: Severity::Error,
            category: RuleCategory::default(),
            fixable: false,
            messages: Vec::new(),
        }
    }

    /// Set the rule category
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    /// Mark the rule as providing fixes
    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }

    /// Register a message template
    pub fn with_message(mut self, id: MessageId, template: &str) -> Self {
        self.messages.push(RuleMessage {
            id,
            template: template.to_string(),
        });
        self
    }

    /// Template registered for `id`
    pub fn message(&self, id: MessageId) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.template.as_str())
    }

    /// Render the message for `id` with the given placeholder values.
    /// Falls back to the message id when no template is registered.
    pub fn format_message(&self, id: MessageId, data: &[(&str, &str)]) -> String {
        match self.message(id) {
            Some(template) => interpolate(template, data),
            None => id.to_string(),
        }
    }
}

/// Replace `{key}` placeholders in `template`
pub fn interpolate(template: &str, data: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in data {
        result = result.replace(&format!("{{{}}}", key), value);
    }
    result
}
