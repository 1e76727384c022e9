//! Lexical scan of JavaScript-family source files
//!
//! The linter never needs a syntax tree: it needs the ordered comment list,
//! the offset of the first top-level statement and the program span. This
//! module produces exactly that with a single pass that understands enough of
//! the token grammar (strings, template literals, regular expressions) to
//! avoid mistaking their contents for comments.

use crate::diagnostic::{Location, Position};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Kind of a source comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `/* ... */`
    Block,
    /// `// ...`
    Line,
    /// `#!...` on the first line
    Shebang,
}

/// One comment as found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComment {
    pub kind: CommentKind,
    /// Text between the delimiters
    pub value: String,
    /// Byte range of the whole comment, delimiters included
    pub range: Range<usize>,
    pub start: Position,
    pub end: Position,
}

impl SourceComment {
    pub fn is_block(&self) -> bool {
        self.kind == CommentKind::Block
    }

    /// Column at which `value` begins on the comment's first line.
    /// Every opening delimiter (`/*`, `//`, `#!`) is two characters wide.
    pub fn value_column(&self) -> usize {
        self.start.column + 2
    }
}

/// Line ending convention of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Maps byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// A leading byte order mark is not part of line 1
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let bom = if text.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        let mut line_starts = vec![bom];
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push(i + 1),
                _ => {}
            }
        }
        Self { line_starts }
    }

    /// Position of a byte offset; columns count characters
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(text.len()).max(self.line_starts[0]);
        let idx = self.line_starts.partition_point(|&s| s <= offset) - 1;
        let start = self.line_starts[idx];
        let column = text
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);
        Position::new(idx + 1, column)
    }

    /// Byte offset at which a 1-based line starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }

    /// Text of a 1-based line without its terminator
    pub fn line_text<'a>(&self, text: &'a str, line: usize) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self.line_starts.get(line).copied().unwrap_or(text.len());
        Some(text[start..end].trim_end_matches(['\r', '\n']))
    }

}

/// A scanned source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    /// All comments in source order
    pub comments: Vec<SourceComment>,
    /// Byte offset of the first top-level statement
    pub first_statement: Option<usize>,
    /// Byte offset just past the last significant character
    pub program_end: usize,
    pub line_ending: LineEnding,
    lines: LineIndex,
}

impl SourceFile {
    /// Scan `text`. Never fails: unterminated constructs run to end of file.
    pub fn parse(path: &Path, text: String) -> Self {
        let lines = LineIndex::new(&text);
        let raw = Scanner::new(&text).scan();

        let comments = raw
            .comments
            .into_iter()
            .map(|c| SourceComment {
                kind: c.kind,
                value: text[c.value].to_string(),
                start: lines.position(&text, c.range.start),
                end: lines.position(&text, c.range.end),
                range: c.range,
            })
            .collect();

        Self {
            path: path.to_path_buf(),
            line_ending: LineEnding::detect(&text),
            comments,
            first_statement: raw.first_token,
            program_end: raw.last_token_end,
            lines,
            text,
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        self.lines.position(&self.text, offset)
    }

    /// Text of a 1-based line
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.line_text(&self.text, line)
    }

    /// Span of the program: first statement to the end of the last token,
    /// or the whole file when there is no statement at all
    pub fn program_location(&self) -> Location {
        match self.first_statement {
            Some(start) => Location::new(
                self.path.clone(),
                self.position(start),
                self.position(self.program_end),
            ),
            None => Location::new(
                self.path.clone(),
                Position::new(1, 0),
                self.position(self.text.len()),
            ),
        }
    }

    /// Whitespace preceding `offset` on its line, or "" when other text
    /// precedes it
    pub fn indentation_at(&self, offset: usize) -> &str {
        let line = self.position(offset).line;
        let start = self.lines.line_start(line).unwrap_or(0).min(offset);
        let prefix = &self.text[start..offset];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix
        } else {
            ""
        }
    }
}

struct RawComment {
    kind: CommentKind,
    range: Range<usize>,
    value: Range<usize>,
}

struct ScanOutput {
    comments: Vec<RawComment>,
    first_token: Option<usize>,
    last_token_end: usize,
}

const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    comments: Vec<RawComment>,
    first_token: Option<usize>,
    last_token_end: usize,
    regex_allowed: bool,
    /// Brace depth inside each open `${ ... }` substitution
    template_depths: Vec<usize>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            comments: Vec::new(),
            first_token: None,
            last_token_end: 0,
            regex_allowed: true,
            template_depths: Vec::new(),
        }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn token(&mut self, start: usize) {
        if self.first_token.is_none() {
            self.first_token = Some(start);
        }
        self.last_token_end = self.pos;
    }

    fn scan(mut self) -> ScanOutput {
        if self.text.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
        if self.text[self.pos..].starts_with("#!") {
            let start = self.pos;
            self.skip_to_line_end();
            self.comments.push(RawComment {
                kind: CommentKind::Shebang,
                range: start..self.pos,
                value: start + 2..self.pos,
            });
        }

        while let Some(b) = self.peek(0) {
            let start = self.pos;
            match b {
                b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                b'/' if self.peek(1) == Some(b'/') => {
                    self.skip_to_line_end();
                    self.comments.push(RawComment {
                        kind: CommentKind::Line,
                        range: start..self.pos,
                        value: start + 2..self.pos,
                    });
                }
                b'/' if self.peek(1) == Some(b'*') => self.block_comment(),
                b'/' if self.regex_allowed => {
                    self.regex_literal();
                    self.token(start);
                    self.regex_allowed = false;
                }
                b'\'' | b'"' => {
                    self.string_literal(b);
                    self.token(start);
                    self.regex_allowed = false;
                }
                b'`' => {
                    self.pos += 1;
                    self.template_chunk();
                    self.token(start);
                }
                b'{' => {
                    if let Some(depth) = self.template_depths.last_mut() {
                        *depth += 1;
                    }
                    self.pos += 1;
                    self.token(start);
                    self.regex_allowed = true;
                }
                b'}' => {
                    self.pos += 1;
                    match self.template_depths.last_mut() {
                        Some(0) => {
                            self.template_depths.pop();
                            self.template_chunk();
                        }
                        Some(depth) => {
                            *depth -= 1;
                            self.regex_allowed = true;
                        }
                        None => self.regex_allowed = true,
                    }
                    self.token(start);
                }
                b')' | b']' => {
                    self.pos += 1;
                    self.token(start);
                    self.regex_allowed = false;
                }
                b if is_word_byte(b) => {
                    while self.peek(0).is_some_and(is_word_byte) {
                        self.pos += 1;
                    }
                    self.token(start);
                    self.regex_allowed = REGEX_KEYWORDS.contains(&&self.text[start..self.pos]);
                }
                _ => {
                    self.pos += 1;
                    self.token(start);
                    self.regex_allowed = true;
                }
            }
        }

        ScanOutput {
            comments: self.comments,
            first_token: self.first_token,
            last_token_end: self.last_token_end,
        }
    }

    fn skip_to_line_end(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }

    fn block_comment(&mut self) {
        let start = self.pos;
        let body = start + 2;
        match self.text[body..].find("*/") {
            Some(rel) => {
                self.pos = body + rel + 2;
                self.comments.push(RawComment {
                    kind: CommentKind::Block,
                    range: start..self.pos,
                    value: body..body + rel,
                });
            }
            None => {
                self.pos = self.bytes.len();
                self.comments.push(RawComment {
                    kind: CommentKind::Block,
                    range: start..self.pos,
                    value: body..self.pos,
                });
            }
        }
    }

    fn string_literal(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' | b'\r' => return,
                _ if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    /// Scan template text up to the closing backtick or the next `${`
    fn template_chunk(&mut self) {
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    self.regex_allowed = false;
                    return;
                }
                b'$' if self.peek(1) == Some(b'{') => {
                    self.pos += 2;
                    self.template_depths.push(0);
                    self.regex_allowed = true;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    fn regex_literal(&mut self) {
        self.pos += 1;
        let mut in_class = false;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => self.pos += 2,
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => {
                    self.pos += 1;
                    break;
                }
                b'\n' | b'\r' => break,
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        while self.peek(0).is_some_and(is_word_byte) {
            self.pos += 1;
        }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> SourceFile {
        SourceFile::parse(Path::new("input.test.ts"), text.to_string())
    }

    #[test]
    fn test_block_and_line_comments() {
        let file = scan("/* a */\n// b\ndescribe();");
        assert_eq!(file.comments.len(), 2);
        assert_eq!(file.comments[0].kind, CommentKind::Block);
        assert_eq!(file.comments[0].value, " a ");
        assert_eq!(file.comments[0].range, 0..7);
        assert_eq!(file.comments[1].kind, CommentKind::Line);
        assert_eq!(file.comments[1].value, " b");
        assert_eq!(file.comments[1].start, Position::new(2, 0));
        assert_eq!(file.first_statement, Some(13));
        assert_eq!(file.position(13), Position::new(3, 0));
    }

    #[test]
    fn test_comment_markers_inside_strings_are_ignored() {
        let file = scan("const a = '/* no */';\nconst b = \"// no\";\nconst c = `/* ${x /* yes */} */`;");
        assert_eq!(file.comments.len(), 1);
        assert_eq!(file.comments[0].value, " yes ");
    }

    #[test]
    fn test_regex_literal_is_not_a_comment() {
        let file = scan("const r = /[/*]+/g; /* real */");
        assert_eq!(file.comments.len(), 1);
        assert_eq!(file.comments[0].value, " real ");
    }

    #[test]
    fn test_division_is_not_a_regex() {
        let file = scan("const r = a / b; /* real */ const s = c / d;");
        assert_eq!(file.comments.len(), 1);
    }

    #[test]
    fn test_nested_comment_is_after_first_statement() {
        let file = scan("describe('', function() {\n  /** inner */\n});");
        assert_eq!(file.first_statement, Some(0));
        assert_eq!(file.comments.len(), 1);
        assert!(file.comments[0].range.start > 0);
    }

    #[test]
    fn test_shebang() {
        let file = scan("#!/usr/bin/env node\n/** doc */\nrun();");
        assert_eq!(file.comments[0].kind, CommentKind::Shebang);
        assert_eq!(file.comments[1].kind, CommentKind::Block);
        assert_eq!(file.first_statement, Some(31));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let file = scan("describe();\n/* open");
        assert_eq!(file.comments.len(), 1);
        assert_eq!(file.comments[0].value, " open");
        assert_eq!(file.program_end, 11);
    }

    #[test]
    fn test_program_location() {
        let file = scan("/* */\ndescribe(\"\");");
        let loc = file.program_location();
        assert_eq!(loc.start, Position::new(2, 0));
        assert_eq!(loc.end, Position::new(2, 13));

        let empty = scan("/* only */\n");
        let loc = empty.program_location();
        assert_eq!(empty.first_statement, None);
        assert_eq!(loc.start, Position::new(1, 0));
        assert_eq!(loc.end, Position::new(2, 0));
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);

        let file = scan("/**\r\n * x\r\n */\r\nrun();");
        assert_eq!(file.line_ending, LineEnding::CrLf);
        assert_eq!(file.comments[0].end, Position::new(3, 3));
        assert_eq!(file.line(2), Some(" * x"));
    }

    #[test]
    fn test_columns_count_characters() {
        let file = scan("/* ↓ */ run();");
        assert_eq!(file.position(file.first_statement.unwrap()), Position::new(1, 8));
    }

    #[test]
    fn test_byte_order_mark_is_not_a_column() {
        let file = scan("\u{feff}/** doc */\nrun();");
        assert_eq!(file.comments[0].start, Position::new(1, 0));
        assert_eq!(file.comments[0].end, Position::new(1, 10));
        assert_eq!(file.position(0), Position::new(1, 0));
        assert_eq!(file.line(1), Some("/** doc */"));
        assert_eq!(file.indentation_at(3), "");
    }

    #[test]
    fn test_indentation_at() {
        let file = scan("    /** doc */\nrun();");
        assert_eq!(file.indentation_at(4), "    ");
        let file = scan("x; /** doc */");
        assert_eq!(file.indentation_at(3), "");
    }
}
