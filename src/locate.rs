//! Resolve tag values back to exact spans in the source file
//!
//! Comment values are scanned line by line. The first line of a comment
//! value starts right after the opening delimiter, so its columns are shifted
//! by the comment's own start column; every later line starts at column 0 of
//! its source line.

use crate::diagnostic::{Location, Position};
use crate::docblock::{parse_line, PragmaLine};
use crate::source::SourceComment;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

/// A tag that the parser reported but the comment text does not contain.
/// Indicates a bug in the caller, never a problem with the linted file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("pragma '@{name}' with value '{value}' not found in comment at line {line}")]
    PragmaNotFound {
        name: String,
        value: String,
        line: usize,
    },

    #[error("text '{text}' not found in comment at line {line}")]
    TextNotFound { text: String, line: usize },
}

/// Resolved span of a tag value (0-based columns, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLocation {
    pub start: Position,
    pub end: Position,
}

impl TagLocation {
    pub fn to_location(self, file: PathBuf) -> Location {
        Location::new(file, self.start, self.end)
    }
}

/// Forward-scanning locator over one comment.
///
/// Successive `next_pragma` calls resume after the previous match, so
/// repeated tags with identical values resolve to successive lines.
#[derive(Debug)]
pub struct TagLocator<'a> {
    comment: &'a SourceComment,
    cursor: usize,
}

impl<'a> TagLocator<'a> {
    pub fn new(comment: &'a SourceComment) -> Self {
        Self { comment, cursor: 0 }
    }

    /// Locate the next `@name value` pragma whose raw value equals `value`.
    ///
    /// The span covers the value without trailing whitespace. For an empty
    /// value it covers the tag token and whatever whitespace follows it.
    pub fn next_pragma(&mut self, name: &str, value: &str) -> Result<TagLocation, LocateError> {
        for (index, line) in self.comment.value.split('\n').enumerate().skip(self.cursor) {
            let Some(pragma) = parse_line(line) else {
                continue;
            };
            if pragma.name != name || pragma.value != value {
                continue;
            }
            self.cursor = index + 1;
            return Ok(self.span(index, line, value_range(&pragma)));
        }

        Err(LocateError::PragmaNotFound {
            name: name.to_string(),
            value: value.to_string(),
            line: self.comment.start.line,
        })
    }

    /// Locate the first occurrence of `text` in the comment's prose lines.
    /// Pragma lines are never matched.
    pub fn find_text(&self, text: &str) -> Result<TagLocation, LocateError> {
        for (index, line) in self.comment.value.split('\n').enumerate() {
            if parse_line(line).is_some() {
                continue;
            }
            if let Some(col) = line.find(text) {
                return Ok(self.span(index, line, col..col + text.len()));
            }
        }

        Err(LocateError::TextNotFound {
            text: text.to_string(),
            line: self.comment.start.line,
        })
    }

    fn span(&self, index: usize, line: &str, range: Range<usize>) -> TagLocation {
        let line_no = self.comment.start.line + index;
        let base = if index == 0 {
            self.comment.value_column()
        } else {
            0
        };
        let start = base + line[..range.start].chars().count();
        let end = start + line[range].chars().count();
        TagLocation {
            start: Position::new(line_no, start),
            end: Position::new(line_no, end),
        }
    }
}

fn value_range(pragma: &PragmaLine<'_>) -> Range<usize> {
    let trimmed = pragma.value.trim_end();
    if trimmed.is_empty() {
        pragma.tag_range.start..pragma.value_range.end
    } else {
        pragma.value_range.start..pragma.value_range.start + trimmed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFile;
    use std::path::Path;

    fn first_comment(text: &str) -> SourceComment {
        SourceFile::parse(Path::new("input.test.ts"), text.to_string())
            .comments
            .remove(0)
    }

    #[test]
    fn test_value_on_second_line() {
        // Comment starts on file line 5; the tag sits on its second line.
        let comment = first_comment("\n\n\n\n/**\n * @group Fast\n */\nrun();");
        let loc = TagLocator::new(&comment).next_pragma("group", "Fast").unwrap();
        assert_eq!(loc.start, Position::new(6, 10));
        assert_eq!(loc.end, Position::new(6, 14));
    }

    #[test]
    fn test_value_on_first_comment_line() {
        let comment = first_comment("  /** @group Fast */\nrun();");
        let loc = TagLocator::new(&comment).next_pragma("group", "Fast ").unwrap();
        // "  /** @group " is 13 characters wide
        assert_eq!(loc.start, Position::new(1, 13));
        assert_eq!(loc.end, Position::new(1, 17));
    }

    #[test]
    fn test_offset_formatting() {
        let comment = first_comment("/**\n * Offset\n *\n *     @group   Fas\n */");
        let loc = TagLocator::new(&comment).next_pragma("group", "Fas").unwrap();
        assert_eq!(loc.start, Position::new(4, 16));
        assert_eq!(loc.end, Position::new(4, 19));
    }

    #[test]
    fn test_trailing_whitespace_excluded() {
        let comment = first_comment("/**\n * @group Fas   \n */");
        let loc = TagLocator::new(&comment).next_pragma("group", "Fas   ").unwrap();
        assert_eq!(loc.start.column, 10);
        assert_eq!(loc.end.column, 13);
    }

    #[test]
    fn test_empty_value_covers_tag() {
        let comment = first_comment("/**\n * @group\n */");
        let loc = TagLocator::new(&comment).next_pragma("group", "").unwrap();
        assert_eq!(loc.start, Position::new(2, 3));
        assert_eq!(loc.end, Position::new(2, 9));

        let comment = first_comment("/**\n * @group    \n */");
        let loc = TagLocator::new(&comment).next_pragma("group", "").unwrap();
        assert_eq!(loc.end, Position::new(2, 13));
    }

    #[test]
    fn test_duplicate_values_resolve_in_order() {
        let comment = first_comment("/**\n * @group Fas\n * @group Fas\n */");
        let mut locator = TagLocator::new(&comment);
        assert_eq!(locator.next_pragma("group", "Fas").unwrap().start.line, 2);
        assert_eq!(locator.next_pragma("group", "Fas").unwrap().start.line, 3);
        assert!(locator.next_pragma("group", "Fas").is_err());
    }

    #[test]
    fn test_missing_pragma_is_an_error() {
        let comment = first_comment("/**\n * @group Fast\n */");
        let err = TagLocator::new(&comment)
            .next_pragma("group", "Slow")
            .unwrap_err();
        assert_eq!(
            err,
            LocateError::PragmaNotFound {
                name: "group".to_string(),
                value: "Slow".to_string(),
                line: 1,
            }
        );
    }

    #[test]
    fn test_find_text() {
        let comment =
            first_comment("/**\n * TODO: Describe the tests in this file.\n * @group Fast\n */");
        let locator = TagLocator::new(&comment);
        let loc = locator
            .find_text("TODO: Describe the tests in this file.")
            .unwrap();
        assert_eq!(loc.start, Position::new(2, 3));
        assert_eq!(loc.end, Position::new(2, 41));
        assert!(locator.find_text("nowhere").is_err());
    }

    #[test]
    fn test_find_text_skips_pragma_lines() {
        let comment = first_comment(
            "/**\n * @note TODO: Describe the tests in this file.\n * TODO: Describe the tests in this file.\n */",
        );
        let loc = TagLocator::new(&comment)
            .find_text("TODO: Describe the tests in this file.")
            .unwrap();
        assert_eq!(loc.start, Position::new(3, 3));

        let comment = first_comment("/** @note TODO */");
        assert!(TagLocator::new(&comment).find_text("TODO").is_err());
    }

    #[test]
    fn test_byte_order_mark_does_not_shift_columns() {
        let comment = first_comment("\u{feff}/** @group Fas */");
        let loc = TagLocator::new(&comment).next_pragma("group", "Fas ").unwrap();
        assert_eq!(loc.start, Position::new(1, 11));
        assert_eq!(loc.end, Position::new(1, 14));
    }

    #[test]
    fn test_crlf_comment() {
        let comment = first_comment("/**\r\n * @group Fast\r\n */\r\n");
        let loc = TagLocator::new(&comment).next_pragma("group", "Fast").unwrap();
        assert_eq!(loc.start, Position::new(2, 10));
        assert_eq!(loc.end, Position::new(2, 14));
    }
}
