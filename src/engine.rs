//! Core linter engine

use crate::config::Config;
use crate::diagnostic::{Diagnostic, Location, Severity};
use crate::filter::{FileFilter, FilterError};
use crate::rules::{all_rules, LintRule, RuleContext};
use crate::source::SourceFile;
use crate::vocabulary::{AllowedVocabulary, VocabularyCache};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Result of linting operation
#[derive(Debug, Default)]
pub struct LintResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,

    /// Files processed
    pub files_processed: usize,

    /// Files passed in but not matching the test-file filter
    pub files_skipped: usize,

    /// Files with errors
    pub files_with_errors: usize,

    /// Files with warnings
    pub files_with_warnings: usize,

    /// Total errors
    pub error_count: usize,

    /// Total warnings
    pub warning_count: usize,

    /// Total info messages
    pub info_count: usize,

    /// Processing duration
    pub duration: Duration,
}

impl LintResult {
    /// Result for one analysed file
    fn for_file(diagnostics: Vec<Diagnostic>) -> Self {
        let mut result = LintResult {
            files_processed: 1,
            ..LintResult::default()
        };

        // Count by severity
        for diag in &diagnostics {
            match diag.severity {
                Severity::Error => result.error_count += 1,
                Severity::Warning => result.warning_count += 1,
                Severity::Info => result.info_count += 1,
            }
        }

        if result.error_count > 0 {
            result.files_with_errors = 1;
        }
        if result.warning_count > 0 {
            result.files_with_warnings = 1;
        }

        result.diagnostics = diagnostics;
        result
    }

    fn skipped() -> Self {
        LintResult {
            files_skipped: 1,
            ..LintResult::default()
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if result is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.warning_count == 0
    }

    /// Number of diagnostics carrying a fix
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.has_fix()).count()
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.error_count > 0 {
            2
        } else if self.warning_count > 0 {
            1
        } else {
            0
        }
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.diagnostics.extend(other.diagnostics);
        self.files_processed += other.files_processed;
        self.files_skipped += other.files_skipped;
        self.files_with_errors += other.files_with_errors;
        self.files_with_warnings += other.files_with_warnings;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.info_count += other.info_count;
    }
}

/// The main linter engine
pub struct Engine {
    /// Configuration
    config: Config,

    /// Enabled rules
    rules: Vec<Box<dyn LintRule>>,

    /// Which files get analysed
    filter: FileFilter,

    /// Group vocabulary shared by every file of a run
    vocabulary: VocabularyCache,
}

impl Engine {
    /// Create a new engine with configuration
    pub fn new(config: Config) -> Result<Self, FilterError> {
        let filter = FileFilter::from_config(&config.files)?;
        let vocabulary = config.vocabulary_cache();
        let rules = all_rules()
            .into_iter()
            .filter(|r| config.is_rule_enabled(r.id()))
            .collect();

        Ok(Self {
            config,
            rules,
            filter,
            vocabulary,
        })
    }

    /// Use `vocabulary` instead of reading the configured manifest
    pub fn with_vocabulary(mut self, vocabulary: AllowedVocabulary) -> Self {
        self.vocabulary = VocabularyCache::preloaded(vocabulary);
        self
    }

    /// Lint every file passed in, ignoring the include patterns
    pub fn with_all_files(mut self) -> Result<Self, FilterError> {
        self.filter = FileFilter::exclude_only(&self.config.files.exclude)?;
        Ok(self)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Enabled rules
    pub fn rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// The run's vocabulary, loading it on first use
    pub fn vocabulary(&self) -> &AllowedVocabulary {
        self.vocabulary.get()
    }

    /// Drop the loaded vocabulary so the next run reads it again
    pub fn reset_vocabulary(&mut self) {
        self.vocabulary.reset();
    }

    /// Whether `path` is a file this engine analyses
    pub fn is_eligible(&self, path: &Path) -> bool {
        self.filter.is_match(path)
    }

    /// Lint multiple files
    pub fn lint(&self, files: &[PathBuf]) -> LintResult {
        let start = Instant::now();

        // Load once before fan-out so workers only ever read it
        let vocabulary = self.vocabulary();
        log::debug!(
            "linting {} file(s) with {} known group(s)",
            files.len(),
            vocabulary.len()
        );

        let results: Vec<LintResult> = if self.config.engine.parallel && files.len() > 1 {
            let threads = if self.config.engine.jobs > 0 {
                self.config.engine.jobs
            } else {
                num_cpus::get()
            };
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| files.par_iter().map(|f| self.lint_file(f)).collect()),
                Err(e) => {
                    log::warn!("falling back to sequential linting: {}", e);
                    files.iter().map(|f| self.lint_file(f)).collect()
                }
            }
        } else {
            files.iter().map(|f| self.lint_file(f)).collect()
        };

        let mut combined = LintResult::default();
        for result in results {
            combined.merge(result);
        }

        combined.duration = start.elapsed();
        combined
    }

    /// Lint a single file
    pub fn lint_file(&self, path: &Path) -> LintResult {
        if !self.is_eligible(path) {
            log::debug!("{}: not a test file, skipped", path.display());
            return LintResult::skipped();
        }

        // Read file content
        match std::fs::read_to_string(path) {
            Ok(content) => self.lint_source(path, content),
            Err(e) => LintResult::for_file(vec![Diagnostic::new(
                "file-read-error",
                Severity::Error,
                &format!("Failed to read file: {}", e),
                Location::file_start(path.to_path_buf()),
            )]),
        }
    }

    /// Lint in-memory source text as if it were the file at `path`
    pub fn lint_source(&self, path: &Path, content: String) -> LintResult {
        if !self.is_eligible(path) {
            return LintResult::skipped();
        }

        let source = SourceFile::parse(path, content);
        let ctx = RuleContext::new(&source, self.vocabulary());

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        for rule in &self.rules {
            let severity = self.config.get_severity_override(rule.id());
            diagnostics.extend(rule.check(&ctx).into_iter().map(|mut diag| {
                if let Some(severity) = severity.filter(|_| diag.rule_id == rule.id()) {
                    diag.severity = severity;
                }
                diag
            }));
        }

        diagnostics.sort_by(|a, b| a.location.start.cmp(&b.location.start));
        LintResult::for_file(diagnostics)
    }
}
