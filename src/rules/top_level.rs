//! `top-level`: every test file declares at least one group

use super::{LintRule, RuleContext};
use crate::diagnostic::{Diagnostic, MessageId};
use crate::docblock::{insertion_fix, parse, rewrite_fix, GROUP_PRAGMA};
use crate::rule::{Rule, RuleCategory};
use crate::selector::select;

pub struct TopLevel {
    meta: Rule,
}

impl TopLevel {
    pub fn new() -> Self {
        Self {
            meta: Rule::new(
                "top-level",
                "Require a file docblock with at least one group tag",
            )
            .with_category(RuleCategory::Correctness)
            .fixable()
            .with_message(
                MessageId::DoesNotExist,
                "Test file must have at least one Jest runner group",
            ),
        }
    }
}

impl Default for TopLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl LintRule for TopLevel {
    fn meta(&self) -> &Rule {
        &self.meta
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let source = ctx.source;
        let selection = select(source);

        let fix = match selection.docblock {
            None => insertion_fix(source, selection.insertion_offset),
            Some(comment) if !parse(&comment.value).contains(GROUP_PRAGMA) => {
                rewrite_fix(source, comment)
            }
            Some(_) => return Vec::new(),
        };

        log::debug!(
            "{}: no group in file docblock, proposing fix at {:?}",
            source.path.display(),
            fix.range
        );

        let diag = ctx
            .report(
                &self.meta,
                MessageId::DoesNotExist,
                source.program_location(),
                &[],
            )
            .with_fix(fix);
        vec![diag]
    }
}
