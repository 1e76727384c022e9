//! Lint rules over file docblocks

mod must_match;
mod top_level;

pub use must_match::MustMatch;
pub use top_level::TopLevel;

use crate::diagnostic::{Diagnostic, Location, MessageId, Severity};
use crate::locate::LocateError;
use crate::rule::Rule;
use crate::source::SourceFile;
use crate::vocabulary::AllowedVocabulary;

/// Rule id of diagnostics raised for internal failures
pub const INTERNAL_ERROR: &str = "internal-error";

/// Everything a rule sees about the file under analysis
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub source: &'a SourceFile,
    pub vocabulary: &'a AllowedVocabulary,
}

impl<'a> RuleContext<'a> {
    pub fn new(source: &'a SourceFile, vocabulary: &'a AllowedVocabulary) -> Self {
        Self { source, vocabulary }
    }

    /// Build a diagnostic for `rule` from one of its message templates
    pub fn report(
        &self,
        rule: &Rule,
        id: MessageId,
        location: Location,
        data: &[(&str, &str)],
    ) -> Diagnostic {
        let message = rule.format_message(id, data);
        let mut diag = Diagnostic::new(&rule.id, rule.severity, &message, location)
            .with_message_id(id);
        if let Some(line) = self.source.line(diag.location.start.line) {
            diag = diag.with_source_line(line);
        }
        diag
    }

    /// Turn a locator failure into a file-scoped diagnostic
    pub fn internal_error(&self, rule: &Rule, err: &LocateError) -> Diagnostic {
        log::error!(
            "{}: rule '{}' failed: {}",
            self.source.path.display(),
            rule.id,
            err
        );
        Diagnostic::new(
            INTERNAL_ERROR,
            Severity::Error,
            &format!("Rule '{}' failed: {}", rule.id, err),
            Location::file_start(self.source.path.clone()),
        )
    }
}

/// A rule that inspects one file at a time
pub trait LintRule: Send + Sync {
    /// Rule metadata
    fn meta(&self) -> &Rule;

    fn id(&self) -> &str {
        &self.meta().id
    }

    /// Diagnostics for the file in `ctx`
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// Every built-in rule
pub fn all_rules() -> Vec<Box<dyn LintRule>> {
    vec![Box::new(TopLevel::new()), Box::new(MustMatch::new())]
}
