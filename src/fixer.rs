//! Auto-fix system for applying rule fixes to files
//!
//! Fixes are byte-range replacements. Within one file they are applied from
//! the end of the text backwards so earlier ranges stay valid; a fix that
//! overlaps one already applied is skipped and picked up by the next run.

use crate::diagnostic::{Diagnostic, Fix};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A fix bound to the diagnostic that produced it
#[derive(Debug, Clone)]
pub struct PendingFix {
    /// Rule ID that generated this fix
    pub rule_id: String,
    /// Line of the diagnostic
    pub line: usize,
    pub fix: Fix,
}

/// Result of applying fixes
#[derive(Debug, Default)]
pub struct FixResult {
    /// Number of files modified
    pub files_modified: usize,
    /// Number of fixes applied
    pub fixes_applied: usize,
    /// Number of fixes that failed
    pub fixes_failed: usize,
    /// Number of fixes skipped because they overlap another fix
    pub fixes_skipped: usize,
    /// Errors encountered
    pub errors: Vec<String>,
    /// Diff output (if diff mode enabled)
    pub diffs: BTreeMap<PathBuf, String>,
}

/// Fix mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixMode {
    /// Apply fixes, or only count them in a dry run (default)
    #[default]
    Apply,
    /// Diff mode - show changes without applying
    Diff,
}

/// Apply `fixes` to `text`, returning the new text and the number applied.
///
/// Fixes whose range is out of bounds, splits a character, or overlaps a
/// fix later in the text are skipped.
pub fn apply_fixes(text: &str, fixes: &[Fix]) -> (String, usize) {
    let mut ordered: Vec<&Fix> = fixes.iter().collect();
    ordered.sort_by(|a, b| {
        b.range
            .start
            .cmp(&a.range.start)
            .then(b.range.end.cmp(&a.range.end))
    });

    let mut output = text.to_string();
    let mut floor = text.len();
    let mut applied = 0;

    for fix in ordered {
        let range = fix.range.clone();
        if range.start > range.end
            || range.end > floor
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            log::debug!("skipping fix '{}' at {:?}", fix.description, range);
            continue;
        }
        output.replace_range(range.clone(), &fix.replacement);
        floor = range.start;
        applied += 1;
    }

    (output, applied)
}

/// Auto-fixer that applies fixes to files
pub struct Fixer {
    /// Dry run mode (don't write changes)
    dry_run: bool,
    /// Fixes grouped by file
    fixes_by_file: BTreeMap<PathBuf, Vec<PendingFix>>,
    /// Fix mode
    mode: FixMode,
}

impl Fixer {
    /// Create a new fixer
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            fixes_by_file: BTreeMap::new(),
            mode: FixMode::Apply,
        }
    }

    /// Set diff mode
    pub fn with_diff_mode(mut self) -> Self {
        self.mode = FixMode::Diff;
        self
    }

    /// Collect fixes from diagnostics
    pub fn collect_from_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            if let Some(fix) = &diag.fix {
                self.add_fix(
                    &diag.location.file,
                    PendingFix {
                        rule_id: diag.rule_id.clone(),
                        line: diag.location.start.line,
                        fix: fix.clone(),
                    },
                );
            }
        }
    }

    /// Add a fix manually
    pub fn add_fix(&mut self, file: &Path, fix: PendingFix) {
        self.fixes_by_file
            .entry(file.to_path_buf())
            .or_default()
            .push(fix);
    }

    /// Apply all collected fixes
    pub fn apply_all(&self) -> FixResult {
        let mut result = FixResult::default();

        for (file, fixes) in &self.fixes_by_file {
            let applicable: Vec<Fix> = fixes.iter().map(|f| f.fix.clone()).collect();

            match self.apply_fixes_to_file(file, &applicable, &mut result) {
                Ok(count) => {
                    if count > 0 {
                        result.files_modified += 1;
                        result.fixes_applied += count;
                    }
                    result.fixes_skipped += applicable.len() - count;
                }
                Err(e) => {
                    log::warn!("failed to fix {}: {}", file.display(), e);
                    result.fixes_failed += applicable.len();
                    result.errors.push(format!("{}: {}", file.display(), e));
                }
            }
        }

        result
    }

    /// Get all fixes that would be applied, ordered by file and line
    pub fn get_pending_fixes(&self) -> Vec<(&Path, &PendingFix)> {
        let mut all_fixes: Vec<(&Path, &PendingFix)> = self
            .fixes_by_file
            .iter()
            .flat_map(|(file, fixes)| fixes.iter().map(move |f| (file.as_path(), f)))
            .collect();
        all_fixes.sort_by(|a, b| a.0.cmp(b.0).then(a.1.line.cmp(&b.1.line)));
        all_fixes
    }

    /// Format fixes for display
    pub fn format_fixes(&self) -> String {
        let fixes = self.get_pending_fixes();

        if fixes.is_empty() {
            return "No fixes available.\n".to_string();
        }

        let mut output = format!("Found {} fix(es):\n\n", fixes.len());
        let mut current_file: Option<&Path> = None;
        for (file, pending) in fixes {
            if current_file != Some(file) {
                current_file = Some(file);
                output.push_str(&format!("{}:\n", file.display()));
            }
            output.push_str(&format!(
                "  Line {}: {} - {}\n",
                pending.line, pending.rule_id, pending.fix.description
            ));
        }

        output
    }

    /// Apply fixes to a single file
    fn apply_fixes_to_file(
        &self,
        file: &Path,
        fixes: &[Fix],
        result: &mut FixResult,
    ) -> Result<usize, std::io::Error> {
        if fixes.is_empty() {
            return Ok(0);
        }

        let content = std::fs::read_to_string(file)?;
        let (new_content, applied) = apply_fixes(&content, fixes);

        if applied > 0 {
            if self.mode == FixMode::Diff {
                let diff = generate_unified_diff(file, &content, &new_content);
                result.diffs.insert(file.to_path_buf(), diff);
            } else if !self.dry_run {
                std::fs::write(file, new_content)?;
                log::debug!("wrote {} fix(es) to {}", applied, file.display());
            }
        }

        Ok(applied)
    }

    /// Get count of fixes pending
    pub fn pending_count(&self) -> usize {
        self.fixes_by_file.values().map(|v| v.len()).sum()
    }

    /// Format diff output for display
    pub fn format_diffs(&self, result: &FixResult) -> String {
        let mut output = String::new();

        for (file, diff) in &result.diffs {
            output.push_str(&format!(
                "diff --docgroup a/{} b/{}\n",
                file.display(),
                file.display()
            ));
            output.push_str(diff);
            output.push('\n');
        }

        output
    }
}

/// Lines of unchanged context around a hunk
const DIFF_CONTEXT: usize = 3;

/// Generate a single-hunk unified diff between two strings
fn generate_unified_diff(file: &Path, original: &str, modified: &str) -> String {
    let mut diff = format!("--- a/{}\n+++ b/{}\n", file.display(), file.display());

    let old: Vec<&str> = original.lines().collect();
    let new: Vec<&str> = modified.lines().collect();

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    if prefix == old.len() && prefix == new.len() {
        return diff;
    }

    let start = prefix.saturating_sub(DIFF_CONTEXT);
    let old_end = (old.len() - suffix + DIFF_CONTEXT).min(old.len());
    let new_end = (new.len() - suffix + DIFF_CONTEXT).min(new.len());

    diff.push_str(&format!(
        "@@ -{},{} +{},{} @@\n",
        start + 1,
        old_end - start,
        start + 1,
        new_end - start
    ));
    for line in &old[start..prefix] {
        diff.push_str(&format!(" {}\n", line));
    }
    for line in &old[prefix..old.len() - suffix] {
        diff.push_str(&format!("-{}\n", line));
    }
    for line in &new[prefix..new.len() - suffix] {
        diff.push_str(&format!("+{}\n", line));
    }
    for line in &old[old.len() - suffix..old_end] {
        diff.push_str(&format!(" {}\n", line));
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Location, Position, Severity};
    use pretty_assertions::assert_eq;

    fn pending(rule_id: &str, line: usize, fix: Fix) -> PendingFix {
        PendingFix {
            rule_id: rule_id.to_string(),
            line,
            fix,
        }
    }

    #[test]
    fn test_fixer_new() {
        let fixer = Fixer::new(true);
        assert!(fixer.dry_run);
        assert_eq!(fixer.mode, FixMode::Apply);
        assert_eq!(fixer.pending_count(), 0);
    }

    #[test]
    fn test_apply_fixes_back_to_front() {
        let text = "abc def ghi";
        let fixes = vec![
            Fix::replace("first", 0..3, "ABC".to_string()),
            Fix::insert("middle", 4, ">".to_string()),
            Fix::replace("last", 8..11, "G".to_string()),
        ];
        assert_eq!(apply_fixes(text, &fixes), ("ABC >def G".to_string(), 3));
    }

    #[test]
    fn test_overlapping_fixes_are_skipped() {
        let text = "abcdef";
        let fixes = vec![
            Fix::replace("outer", 0..4, "X".to_string()),
            Fix::replace("inner", 2..6, "Y".to_string()),
        ];
        assert_eq!(apply_fixes(text, &fixes), ("abY".to_string(), 1));
    }

    #[test]
    fn test_out_of_range_fix_is_skipped() {
        let fixes = vec![Fix::replace("bad", 2..10, "X".to_string())];
        assert_eq!(apply_fixes("abc", &fixes), ("abc".to_string(), 0));
    }

    #[test]
    fn test_diff_mode() {
        let fixer = Fixer::new(true).with_diff_mode();
        assert_eq!(fixer.mode, FixMode::Diff);
    }

    #[test]
    fn test_generate_diff() {
        let original = "line1\nline2\nline3\n";
        let modified = "line1\nmodified\nline3\n";
        let diff = generate_unified_diff(Path::new("a.test.js"), original, modified);

        assert_eq!(
            diff,
            "--- a/a.test.js\n+++ b/a.test.js\n@@ -1,3 +1,3 @@\n line1\n-line2\n+modified\n line3\n"
        );
    }

    #[test]
    fn test_generate_diff_for_insertion() {
        let diff = generate_unified_diff(Path::new("a.test.js"), "run();\n", "/** x */\n\nrun();\n");
        assert_eq!(
            diff,
            "--- a/a.test.js\n+++ b/a.test.js\n@@ -1,1 +1,3 @@\n+/** x */\n+\n run();\n"
        );
    }

    #[test]
    fn test_format_fixes_by_file_and_line() {
        let mut fixer = Fixer::new(true);
        fixer.add_fix(
            Path::new("b.test.js"),
            pending("top-level", 1, Fix::insert("Insert docblock", 0, "y".to_string())),
        );
        fixer.add_fix(
            Path::new("a.test.js"),
            pending("top-level", 3, Fix::replace("Rewrite docblock", 0..2, "x".to_string())),
        );

        let pending = fixer.get_pending_fixes();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].0, Path::new("a.test.js"));
        assert_eq!(
            fixer.format_fixes(),
            "Found 2 fix(es):\n\na.test.js:\n  Line 3: top-level - Rewrite docblock\nb.test.js:\n  Line 1: top-level - Insert docblock\n"
        );
    }

    #[test]
    fn test_apply_all_writes_and_diffs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.test.js");
        std::fs::write(&path, "run();\n").unwrap();

        let diag = Diagnostic::new(
            "top-level",
            Severity::Error,
            "missing",
            Location::new(path.clone(), Position::new(1, 0), Position::new(1, 6)),
        )
        .with_fix(Fix::insert("Insert", 0, "/** x */\n".to_string()));

        let mut differ = Fixer::new(true).with_diff_mode();
        differ.collect_from_diagnostics(std::slice::from_ref(&diag));
        let result = differ.apply_all();
        assert_eq!(result.fixes_applied, 1);
        assert!(result.diffs[&path].contains("+/** x */"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "run();\n");

        let mut writer = Fixer::new(false);
        writer.collect_from_diagnostics(&[diag]);
        let result = writer.apply_all();
        assert_eq!(result.files_modified, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "/** x */\nrun();\n"
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let mut fixer = Fixer::new(false);
        fixer.add_fix(
            Path::new("/nonexistent/a.test.js"),
            pending("top-level", 1, Fix::insert("Insert", 0, "x".to_string())),
        );
        let result = fixer.apply_all();
        assert_eq!(result.fixes_failed, 1);
        assert_eq!(result.errors.len(), 1);
    }
}
