//! Top-level comment selection
//!
//! Only comments that start before the first statement of a file are
//! considered "top-level". Among those, tooling directives
//! (`/* eslint-disable */`, `/* istanbul ignore file */`, `/* @ts-nocheck */`,
//! ...) never count as the file docblock.

use crate::docblock::{parse, Docblock};
use crate::source::{CommentKind, SourceComment, SourceFile};

/// Description substrings that mark a comment as a tooling directive
const DIRECTIVE_MARKERS: &[&str] = &[
    "eslint-disable",
    "eslint-enable",
    "eslint-env",
    "jshint",
    "jslint",
    "istanbul ignore",
    "c8 ignore",
    "v8 ignore",
    "prettier-ignore",
    "webpackChunkName",
    "#__PURE__",
];

/// Description prefixes that mark a comment as a tooling directive
const DIRECTIVE_PREFIXES: &[&str] = &["eslint ", "global ", "globals ", "exported "];

/// Pragma names that, on their own, make a comment a tooling directive
const DIRECTIVE_PRAGMAS: &[&str] = &[
    "ts-check",
    "ts-nocheck",
    "ts-ignore",
    "ts-expect-error",
    "flow",
    "jsx",
    "jsxRuntime",
    "jsxImportSource",
    "__PURE__",
];

/// Result of scanning the top of a file
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    /// The comment acting as file docblock, if any
    pub docblock: Option<&'a SourceComment>,
    /// Byte offset where a new docblock belongs
    pub insertion_offset: usize,
    /// Every block comment that starts before the first statement
    pub leading_blocks: Vec<&'a SourceComment>,
}

impl Selection<'_> {
    pub fn is_missing(&self) -> bool {
        self.docblock.is_none()
    }
}

/// Whether `comment` starts strictly before the first statement
pub fn is_top_level(comment: &SourceComment, first_statement: Option<usize>) -> bool {
    first_statement.map_or(true, |start| comment.range.start < start)
}

/// Whether a parsed comment only carries tooling directives
pub fn is_directive(docblock: &Docblock) -> bool {
    let description = docblock.description.trim();
    if DIRECTIVE_MARKERS.iter().any(|m| description.contains(m))
        || DIRECTIVE_PREFIXES.iter().any(|p| description.starts_with(p))
        || description == "eslint"
    {
        return true;
    }

    description.is_empty()
        && !docblock.pragmas.is_empty()
        && docblock
            .pragmas
            .iter()
            .all(|p| DIRECTIVE_PRAGMAS.contains(&p.name.as_str()))
}

/// Select the file docblock and the insertion point for a new one
pub fn select(source: &SourceFile) -> Selection<'_> {
    let leading: Vec<&SourceComment> = source
        .comments
        .iter()
        .filter(|c| is_top_level(c, source.first_statement))
        .collect();

    let docblock = leading
        .iter()
        .copied()
        .filter(|c| c.is_block())
        .find(|c| !is_directive(&parse(&c.value)));

    let insertion_offset = leading
        .iter()
        .find(|c| c.kind != CommentKind::Shebang)
        .map(|c| c.range.start)
        .or(source.first_statement)
        .unwrap_or_else(|| after_shebang(source));

    Selection {
        docblock,
        insertion_offset,
        leading_blocks: leading.into_iter().filter(|c| c.is_block()).collect(),
    }
}

/// Offset of the line following a leading shebang, or the start of the
/// text after any byte order mark
fn after_shebang(source: &SourceFile) -> usize {
    match source.comments.first() {
        Some(c) if c.kind == CommentKind::Shebang => source.text[c.range.end..]
            .find('\n')
            .map_or(source.text.len(), |i| c.range.end + i + 1),
        _ if source.text.starts_with('\u{feff}') => '\u{feff}'.len_utf8(),
        _ => 0,
    }
}
