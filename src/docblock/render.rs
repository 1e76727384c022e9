//! Docblock rendering and placeholder-group fix synthesis

use super::pragma::{parse, Docblock};
use crate::diagnostic::Fix;
use crate::source::{SourceComment, SourceFile};

/// Description written into scaffolded docblocks
pub const DEFAULT_DESCRIPTION: &str = "TODO: Describe the tests in this file.";

/// Group value written into scaffolded docblocks
pub const PLACEHOLDER_GROUP: &str = "TODO";

/// Name of the group pragma
pub const GROUP_PRAGMA: &str = "group";

impl Docblock {
    /// Render as a `/** ... */` block.
    ///
    /// Lines after the first are prefixed with `indent`. A single ` *` line
    /// separates the description from the pragmas when both are present.
    pub fn render(&self, eol: &str, indent: &str) -> String {
        let mut lines = vec!["/**".to_string()];

        if !self.description.is_empty() {
            for line in self.description.lines() {
                if line.is_empty() {
                    lines.push(" *".to_string());
                } else {
                    lines.push(format!(" * {}", line));
                }
            }
            if !self.pragmas.is_empty() {
                lines.push(" *".to_string());
            }
        }

        for pragma in &self.pragmas {
            if pragma.value.is_empty() {
                lines.push(format!(" * @{}", pragma.name));
            } else {
                lines.push(format!(" * @{} {}", pragma.name, pragma.value));
            }
            for line in &pragma.trailing {
                if line.is_empty() {
                    lines.push(" *".to_string());
                } else {
                    lines.push(format!(" * {}", line));
                }
            }
        }

        lines.push(" */".to_string());
        lines.join(&format!("{}{}", eol, indent))
    }
}

/// The block scaffolded into files that have no docblock
pub fn placeholder_docblock() -> Docblock {
    let mut docblock = Docblock {
        description: DEFAULT_DESCRIPTION.to_string(),
        pragmas: Vec::new(),
    };
    docblock.push_pragma(GROUP_PRAGMA, PLACEHOLDER_GROUP);
    docblock
}

/// `existing` with a placeholder group appended after all other content
pub fn with_placeholder_group(existing: &Docblock) -> Docblock {
    let mut docblock = existing.clone();
    if docblock.description.trim().is_empty() {
        docblock.description = DEFAULT_DESCRIPTION.to_string();
    }
    docblock.push_pragma(GROUP_PRAGMA, PLACEHOLDER_GROUP);
    docblock
}

/// Insert a brand-new placeholder docblock before byte `offset`
pub fn insertion_fix(source: &SourceFile, offset: usize) -> Fix {
    let eol = source.line_ending.as_str();
    let indent = source.indentation_at(offset);
    let prefix = source.text[..offset].trim_start_matches('\u{feff}');
    let lead = if prefix.is_empty() || prefix.ends_with('\n') || !indent.is_empty() {
        ""
    } else {
        eol
    };
    let text = format!(
        "{}{}{}{}{}",
        lead,
        placeholder_docblock().render(eol, indent),
        eol,
        eol,
        indent
    );
    Fix::insert("Insert a docblock with a placeholder group", offset, text)
}

/// Rewrite `comment` in place so it carries a placeholder group
pub fn rewrite_fix(source: &SourceFile, comment: &SourceComment) -> Fix {
    let eol = source.line_ending.as_str();
    let indent = source.indentation_at(comment.range.start);
    let docblock = with_placeholder_group(&parse(&comment.value));
    Fix::replace(
        "Add a placeholder group to the file docblock",
        comment.range.clone(),
        docblock.render(eol, indent),
    )
}
