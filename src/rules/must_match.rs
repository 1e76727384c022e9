//! `must-match`: every declared group names a known, non-placeholder value

use super::{LintRule, RuleContext};
use crate::diagnostic::{Diagnostic, MessageId};
use crate::docblock::{parse, DEFAULT_DESCRIPTION, GROUP_PRAGMA};
use crate::locate::{LocateError, TagLocator};
use crate::rule::{Rule, RuleCategory};
use crate::selector::select;
use crate::source::SourceComment;
use crate::validator::{validate, Verdict};

pub struct MustMatch {
    meta: Rule,
}

impl MustMatch {
    pub fn new() -> Self {
        Self {
            meta: Rule::new("must-match", "Require group tags to use a defined group name")
                .with_category(RuleCategory::Correctness)
                .with_message(
                    MessageId::NoDefinedGroups,
                    "Group name '{value}' is invalid, because there are no defined groups in the package.",
                )
                .with_message(
                    MessageId::InvalidGroupName,
                    "Invalid group name '{value}'. Did you mean '{closest}'?",
                )
                .with_message(MessageId::EmptyGroup, "Group name cannot be empty.")
                .with_message(
                    MessageId::PlaceholderGroupName,
                    "Invalid group name '{value}'. This generated group is only a placeholder.",
                )
                .with_message(
                    MessageId::PlaceholderFileText,
                    "Placeholder text for groups should be replaced.",
                ),
        }
    }

    fn check_comment(
        &self,
        ctx: &RuleContext<'_>,
        comment: &SourceComment,
        placeholder_reported: &mut bool,
        out: &mut Vec<Diagnostic>,
    ) -> Result<(), LocateError> {
        let file = &ctx.source.path;
        let docblock = parse(&comment.value);
        let mut locator = TagLocator::new(comment);

        if !*placeholder_reported && docblock.prose_contains(DEFAULT_DESCRIPTION) {
            let span = locator.find_text(DEFAULT_DESCRIPTION)?;
            out.push(ctx.report(
                &self.meta,
                MessageId::PlaceholderFileText,
                span.to_location(file.clone()),
                &[],
            ));
            *placeholder_reported = true;
        }

        for raw in docblock.values(GROUP_PRAGMA) {
            let verdict = validate(raw, ctx.vocabulary);
            let Some(id) = verdict.message_id() else {
                continue;
            };

            let span = locator.next_pragma(GROUP_PRAGMA, raw)?;
            let value = raw.trim();
            let closest = verdict.suggestion().unwrap_or(value);
            log::debug!("{}: group '{}' is {:?}", file.display(), value, verdict);

            let mut diag = ctx.report(
                &self.meta,
                id,
                span.to_location(file.clone()),
                &[("value", value), ("closest", closest)],
            );
            if let Verdict::Invalid {
                suggestion: Some(suggestion),
            } = &verdict
            {
                diag = diag.with_suggestion(suggestion);
            }
            out.push(diag);
        }

        Ok(())
    }
}

impl Default for MustMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl LintRule for MustMatch {
    fn meta(&self) -> &Rule {
        &self.meta
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut placeholder_reported = false;

        for comment in select(ctx.source).leading_blocks {
            if let Err(err) =
                self.check_comment(ctx, comment, &mut placeholder_reported, &mut diagnostics)
            {
                diagnostics.push(ctx.internal_error(&self.meta, &err));
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Position;
    use crate::source::SourceFile;
    use crate::vocabulary::AllowedVocabulary;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn check_with(text: &str, words: &[&str]) -> Vec<Diagnostic> {
        let source = SourceFile::parse(Path::new("input.test.ts"), text.to_string());
        let vocab = AllowedVocabulary::new(words.iter().copied());
        MustMatch::new().check(&RuleContext::new(&source, &vocab))
    }

    fn ids(diags: &[Diagnostic]) -> Vec<MessageId> {
        diags.iter().filter_map(|d| d.message_id).collect()
    }

    #[test]
    fn test_valid_files() {
        let words = ["Fast", "Slow"];
        let valid = [
            "/**\n * @group Fast\n */\ndescribe(\"\");",
            "/**\n * Description 1\n *\n * @group Slow\n */\ndescribe(\"\");",
            "/**\n * @group Fast\n * @group Slow\n */\ndescribe(\"\");",
            "/**\n * @group Fast \n */\ndescribe(\"\");",
            "/* File comment */\ndescribe(\"\");",
            "describe(\"\", () => {\n  /** @group Nope */\n});",
        ];
        for text in valid {
            assert!(check_with(text, &words).is_empty(), "{text}");
        }
    }

    #[test]
    fn test_invalid_name_with_suggestion() {
        let diags = check_with("/**\n * @group Fas\n */\ndescribe(\"\");", &["Fast", "Slow"]);
        assert_eq!(ids(&diags), vec![MessageId::InvalidGroupName]);
        assert_eq!(diags[0].message, "Invalid group name 'Fas'. Did you mean 'Fast'?");
        assert_eq!(diags[0].location.start, Position::new(2, 10));
        assert_eq!(diags[0].location.end, Position::new(2, 13));
        assert_eq!(diags[0].suggestion.as_deref(), Some("Fast"));
    }

    #[test]
    fn test_no_defined_groups() {
        let diags = check_with("/**\n * @group Any\n */\ndescribe(\"\");", &[]);
        assert_eq!(ids(&diags), vec![MessageId::NoDefinedGroups]);
        assert_eq!(
            diags[0].message,
            "Group name 'Any' is invalid, because there are no defined groups in the package."
        );
        assert_eq!(diags[0].suggestion, None);
    }

    #[test]
    fn test_empty_group() {
        let diags = check_with("/**\n * @group\n */\ndescribe(\"\");", &["Fast"]);
        assert_eq!(ids(&diags), vec![MessageId::EmptyGroup]);
        assert_eq!(diags[0].message, "Group name cannot be empty.");
        assert_eq!(diags[0].location.start, Position::new(2, 3));
    }

    #[test]
    fn test_placeholders() {
        let text = "/**\n * TODO: Describe the tests in this file.\n *\n * @group TODO\n */\ndescribe(\"\");";
        let diags = check_with(text, &["Fast"]);
        assert_eq!(
            ids(&diags),
            vec![MessageId::PlaceholderFileText, MessageId::PlaceholderGroupName]
        );
        assert_eq!(diags[0].location.start, Position::new(2, 3));
        assert_eq!(
            diags[1].message,
            "Invalid group name 'TODO'. This generated group is only a placeholder."
        );
        assert_eq!(diags[1].location.start, Position::new(4, 10));
        assert_eq!(diags[1].location.end, Position::new(4, 14));
    }

    #[test]
    fn test_placeholder_text_reported_once() {
        let text = "/** TODO: Describe the tests in this file. */\n/** TODO: Describe the tests in this file. */\ndescribe(\"\");";
        let diags = check_with(text, &["Fast"]);
        assert_eq!(ids(&diags), vec![MessageId::PlaceholderFileText]);
        assert_eq!(diags[0].location.start, Position::new(1, 4));
    }

    #[test]
    fn test_every_group_is_checked_in_order() {
        let text = "/**\n * @group Fas\n * @other thing\n * @group\n * @group Slow\n * @group Fas\n */\ndescribe(\"\");";
        let diags = check_with(text, &["Fast", "Slow"]);
        assert_eq!(
            ids(&diags),
            vec![
                MessageId::InvalidGroupName,
                MessageId::EmptyGroup,
                MessageId::InvalidGroupName
            ]
        );
        let lines: Vec<usize> = diags.iter().map(|d| d.location.start.line).collect();
        assert_eq!(lines, vec![2, 4, 6]);
    }

    #[test]
    fn test_all_leading_blocks_are_checked() {
        let text = "/* eslint-disable */\n/** @group Fast */\n/** @group Sloww */\ndescribe(\"\");";
        let diags = check_with(text, &["Fast", "Slow"]);
        assert_eq!(ids(&diags), vec![MessageId::InvalidGroupName]);
        assert_eq!(diags[0].location.start, Position::new(3, 11));
        assert_eq!(diags[0].location.end, Position::new(3, 16));
    }

    #[test]
    fn test_offset_formatting() {
        let text = "/**\n * Offset\n *\n *     @group   Fas\n */\ndescribe(\"\");";
        let diags = check_with(text, &["Fast"]);
        assert_eq!(diags[0].location.start, Position::new(4, 16));
        assert_eq!(diags[0].location.end, Position::new(4, 19));
    }

    #[test]
    fn test_placeholder_text_points_at_prose() {
        let text = "/**\n * @note TODO: Describe the tests in this file.\n * TODO: Describe the tests in this file.\n * @group Fast\n */\ndescribe(\"\");";
        let diags = check_with(text, &["Fast"]);
        assert_eq!(ids(&diags), vec![MessageId::PlaceholderFileText]);
        assert_eq!(diags[0].location.start, Position::new(3, 3));
        assert_eq!(diags[0].location.end, Position::new(3, 41));
    }

    #[test]
    fn test_byte_order_mark() {
        let diags = check_with("\u{feff}/** @group Fas */\ndescribe(\"\");", &["Fast"]);
        assert_eq!(ids(&diags), vec![MessageId::InvalidGroupName]);
        assert_eq!(diags[0].location.start, Position::new(1, 11));
        assert_eq!(diags[0].location.end, Position::new(1, 14));
        assert_eq!(diags[0].source_line.as_deref(), Some("/** @group Fas */"));
    }

    #[test]
    fn test_comment_on_statement_line_is_checked() {
        let diags = check_with("/* @group Fas */ describe(\"\");", &["Fast"]);
        assert_eq!(ids(&diags), vec![MessageId::InvalidGroupName]);
        assert_eq!(diags[0].location.start, Position::new(1, 10));
    }

    #[test]
    fn test_file_without_statements() {
        let diags = check_with("/** @group Nope */\n", &["Fast"]);
        assert_eq!(ids(&diags), vec![MessageId::InvalidGroupName]);
    }
}
