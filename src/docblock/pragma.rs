//! Pragma parsing for docblock comments

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// A pragma line: optional leading punctuation/whitespace, an `@`-prefixed
/// token, optional whitespace, then the raw value to end of line.
fn pragma_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\w@]*@(\S+)[ \t]*(.*)$").unwrap())
}

/// One `@name value` occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pragma {
    pub name: String,
    /// Raw value, not trimmed
    pub value: String,
    /// Prose lines between this pragma and the next one, gutter stripped
    pub trailing: Vec<String>,
}

impl Pragma {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            trailing: Vec::new(),
        }
    }
}

/// Byte ranges of a pragma inside a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PragmaLine<'a> {
    pub name: &'a str,
    pub value: &'a str,
    /// Range of the `@name` token, `@` included
    pub tag_range: Range<usize>,
    pub value_range: Range<usize>,
}

/// Match one line of comment text against the pragma grammar
pub fn parse_line(line: &str) -> Option<PragmaLine<'_>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let caps = pragma_line_re().captures(line)?;
    let name = caps.get(1)?;
    let value = caps.get(2)?;
    Some(PragmaLine {
        name: name.as_str(),
        value: value.as_str(),
        tag_range: name.start() - 1..name.end(),
        value_range: value.range(),
    })
}

/// Values of one pragma name: a single occurrence or several in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PragmaValue<'a> {
    Single(&'a str),
    Multiple(Vec<&'a str>),
}

impl<'a> PragmaValue<'a> {
    pub fn to_vec(&self) -> Vec<&'a str> {
        match self {
            PragmaValue::Single(v) => vec![*v],
            PragmaValue::Multiple(vs) => vs.clone(),
        }
    }
}

/// A docblock: free-text description plus pragmas in source order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Docblock {
    pub description: String,
    pub pragmas: Vec<Pragma>,
}

impl Docblock {
    /// Look up a pragma by its exact (case-sensitive) name
    pub fn get(&self, name: &str) -> Option<PragmaValue<'_>> {
        let values = self.values(name);
        match values.len() {
            0 => None,
            1 => Some(PragmaValue::Single(values[0])),
            _ => Some(PragmaValue::Multiple(values)),
        }
    }

    /// All raw values of `name`, in source order
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.pragmas
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.value.as_str())
            .collect()
    }

    /// Whether any prose line, before or between pragmas, contains `text`
    pub fn prose_contains(&self, text: &str) -> bool {
        self.description.contains(text)
            || self
                .pragmas
                .iter()
                .flat_map(|p| &p.trailing)
                .any(|line| line.contains(text))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pragmas.iter().any(|p| p.name == name)
    }

    pub fn push_pragma(&mut self, name: &str, value: &str) {
        self.pragmas.push(Pragma::new(name, value));
    }
}

/// Strip the comment delimiters when the caller passed the full comment
fn strip_delimiters(text: &str) -> &str {
    let trimmed = text.trim_start();
    match trimmed.strip_prefix("/*") {
        Some(inner) => inner.strip_suffix("*/").unwrap_or(inner),
        None => text,
    }
}

/// Drop the conventional ` * ` gutter from a description line
fn strip_gutter(line: &str) -> &str {
    let line = line.trim_start();
    let line = match line.strip_prefix('*') {
        Some(rest) if !rest.starts_with('/') => rest,
        _ => line,
    };
    line.strip_prefix(' ').unwrap_or(line).trim_end()
}

/// Parse the text of one comment into description and pragmas.
///
/// Accepts the comment value or the full comment including `/*` and `*/`.
/// Pragma values are kept exactly as written; a tag without a value yields
/// an empty string. Only prose before the first pragma is description; prose
/// after a pragma stays attached to it.
pub fn parse(text: &str) -> Docblock {
    let body = strip_delimiters(text);
    let mut docblock = Docblock::default();
    let mut description: Vec<&str> = Vec::new();

    for line in body.split('\n') {
        if let Some(pragma) = parse_line(line) {
            docblock.push_pragma(pragma.name, pragma.value);
        } else if let Some(previous) = docblock.pragmas.last_mut() {
            previous.trailing.push(strip_gutter(line).to_string());
        } else {
            description.push(strip_gutter(line));
        }
    }

    while description.first().is_some_and(|l| l.is_empty()) {
        description.remove(0);
    }
    while description.last().is_some_and(|l| l.is_empty()) {
        description.pop();
    }
    docblock.description = description.join("\n");

    for pragma in &mut docblock.pragmas {
        while pragma.trailing.last().is_some_and(|l| l.is_empty()) {
            pragma.trailing.pop();
        }
    }
    docblock
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_group() {
        let doc = parse("*\n * @group Fast\n ");
        assert_eq!(doc.description, "");
        assert_eq!(doc.get("group"), Some(PragmaValue::Single("Fast")));
    }

    #[test]
    fn test_repeated_pragmas_accumulate_in_order() {
        let doc = parse("*\n * @group Fast\n * @other thing\n * @group Slow\n ");
        assert_eq!(
            doc.get("group"),
            Some(PragmaValue::Multiple(vec!["Fast", "Slow"]))
        );
        assert_eq!(doc.values("other"), vec!["thing"]);
        assert_eq!(doc.pragmas.len(), 3);
    }

    #[test]
    fn test_empty_value_is_present() {
        let doc = parse("*\n * @group\n ");
        assert!(doc.contains("group"));
        assert_eq!(doc.values("group"), vec![""]);

        let doc = parse("*\n * @group    \n ");
        assert_eq!(doc.values("group"), vec![""]);
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let doc = parse("*\n *     @group   Fas  \n ");
        assert_eq!(doc.values("group"), vec!["Fas  "]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let doc = parse("* @Group Fast ");
        assert!(doc.get("group").is_none());
        assert!(doc.contains("Group"));
    }

    #[test]
    fn test_description_and_pragmas() {
        let doc = parse("*\n * TODO: Describe the tests in this file.\n *\n * @group Fast\n ");
        assert_eq!(doc.description, "TODO: Describe the tests in this file.");
        assert_eq!(doc.values("group"), vec!["Fast"]);
    }

    #[test]
    fn test_multiline_description_keeps_inner_blank_lines() {
        let doc = parse("*\n * First\n *\n * Second\n ");
        assert_eq!(doc.description, "First\n\nSecond");
    }

    #[test]
    fn test_full_comment_text_is_normalized() {
        let doc = parse("/* File comment */");
        assert_eq!(doc.description, "File comment");
        assert!(doc.pragmas.is_empty());

        let doc = parse("/** @group Fast */");
        assert_eq!(doc.values("group"), vec!["Fast "]);
    }

    #[test]
    fn test_prose_after_pragma_stays_with_it() {
        let doc = parse("*\n * Intro\n * @file x\n * trailing prose\n *\n * more\n * @group Fast\n ");
        assert_eq!(doc.description, "Intro");
        assert_eq!(doc.pragmas[0].name, "file");
        assert_eq!(doc.pragmas[0].trailing, vec!["trailing prose", "", "more"]);
        assert!(doc.pragmas[1].trailing.is_empty());
        assert!(doc.prose_contains("more"));
        assert!(!doc.prose_contains("Fast"));
    }

    #[test]
    fn test_email_is_not_a_pragma() {
        let doc = parse("* Contact someone@example.com ");
        assert!(doc.pragmas.is_empty());
        assert_eq!(doc.description, "Contact someone@example.com");
    }

    #[test]
    fn test_crlf_lines() {
        let doc = parse("*\r\n * Intro\r\n * @group Fast\r\n ");
        assert_eq!(doc.description, "Intro");
        assert_eq!(doc.values("group"), vec!["Fast"]);
    }

    #[test]
    fn test_parse_line_ranges() {
        let line = " *     @group   Fas";
        let pragma = parse_line(line).unwrap();
        assert_eq!(pragma.name, "group");
        assert_eq!(&line[pragma.tag_range.clone()], "@group");
        assert_eq!(&line[pragma.value_range.clone()], "Fas");
        assert!(parse_line(" * plain text").is_none());
    }
}
