//! Group value classification

use crate::diagnostic::MessageId;
use crate::docblock::PLACEHOLDER_GROUP;
use crate::suggest::closest;
use crate::vocabulary::AllowedVocabulary;

/// Outcome of validating one group value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The scaffolded `TODO` value
    Placeholder,
    /// Tag present without a value
    Empty,
    /// The project defines no vocabulary at all
    NoVocabularyDefined,
    /// Not in the vocabulary; carries the nearest vocabulary word
    Invalid { suggestion: Option<String> },
    Valid,
}

impl Verdict {
    /// Message reported for this verdict, `None` for `Valid`
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Verdict::Placeholder => Some(MessageId::PlaceholderGroupName),
            Verdict::Empty => Some(MessageId::EmptyGroup),
            Verdict::NoVocabularyDefined => Some(MessageId::NoDefinedGroups),
            Verdict::Invalid { suggestion: Some(_) } => Some(MessageId::InvalidGroupName),
            Verdict::Invalid { suggestion: None } => Some(MessageId::NoDefinedGroups),
            Verdict::Valid => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Verdict::Invalid { suggestion } => suggestion.as_deref(),
            _ => None,
        }
    }
}

/// Classify a raw (untrimmed) group value. First matching case wins:
/// placeholder, empty, no vocabulary, exact match, otherwise invalid.
pub fn validate(raw: &str, vocabulary: &AllowedVocabulary) -> Verdict {
    let value = raw.trim();

    if value == PLACEHOLDER_GROUP {
        Verdict::Placeholder
    } else if value.is_empty() {
        Verdict::Empty
    } else if vocabulary.is_empty() {
        Verdict::NoVocabularyDefined
    } else if vocabulary.contains(value) {
        Verdict::Valid
    } else {
        let nearest = closest(value, vocabulary);
        Verdict::Invalid {
            suggestion: (nearest != value).then(|| nearest.to_string()),
        }
    }
}
