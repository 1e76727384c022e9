//! Allowed group vocabulary
//!
//! The vocabulary lives in a JSON manifest (usually `package.json`) under a
//! configurable property:
//!
//! ```json
//! { "squadGroups": ["Fast", "Slow"] }
//! { "squadGroups": { "Blue": ["Fast", "Slow"], "Red": ["Easy"] } }
//! ```
//!
//! An array is used as-is; an object contributes the entries of each of its
//! array members. Anything else, or a manifest that cannot be read, yields an
//! empty vocabulary.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Default manifest property holding the vocabulary
pub const DEFAULT_PROPERTY_NAME: &str = "squadGroups";

/// Default manifest file
pub const DEFAULT_SOURCE: &str = "package.json";

/// Error reading the vocabulary manifest
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deduplicated, trimmed, ordered set of valid group names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedVocabulary {
    words: Vec<String>,
}

impl AllowedVocabulary {
    /// Build from raw entries: trims each, drops empties and duplicates,
    /// keeps first-occurrence order
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = Vec::new();
        for entry in entries {
            let word = entry.as_ref().trim();
            if !word.is_empty() && !words.iter().any(|w| w == word) {
                words.push(word.to_string());
            }
        }
        Self { words }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Extract the vocabulary from a parsed manifest
    pub fn from_manifest(manifest: &Value, property_name: &str) -> Self {
        match manifest.get(property_name) {
            Some(Value::Array(items)) => Self::new(items.iter().filter_map(Value::as_str)),
            Some(Value::Object(groups)) => Self::new(
                groups
                    .values()
                    .filter_map(Value::as_array)
                    .flatten()
                    .filter_map(Value::as_str),
            ),
            _ => Self::empty(),
        }
    }

    /// Read the vocabulary from a manifest file
    pub fn read(path: &Path, property_name: &str) -> Result<Self, VocabularyError> {
        let content = std::fs::read_to_string(path)?;
        let manifest: Value = serde_json::from_str(&content)?;
        Ok(Self::from_manifest(&manifest, property_name))
    }

    /// Read the vocabulary, treating any failure as "no vocabulary"
    pub fn read_or_empty(path: &Path, property_name: &str) -> Self {
        match Self::read(path, property_name) {
            Ok(vocabulary) => vocabulary,
            Err(e) => {
                log::debug!(
                    "no group vocabulary from {}: {}",
                    path.display(),
                    e
                );
                Self::empty()
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Lazily loaded vocabulary, shared by every file of one lint run.
///
/// The first `get` reads the manifest; concurrent first calls converge on a
/// single stored value.
#[derive(Debug)]
pub struct VocabularyCache {
    source: PathBuf,
    property_name: String,
    cell: OnceLock<AllowedVocabulary>,
}

impl VocabularyCache {
    pub fn new(source: impl Into<PathBuf>, property_name: &str) -> Self {
        Self {
            source: source.into(),
            property_name: property_name.to_string(),
            cell: OnceLock::new(),
        }
    }

    /// A cache that is already populated, without a backing manifest
    pub fn preloaded(vocabulary: AllowedVocabulary) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(vocabulary);
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
            cell,
        }
    }

    pub fn get(&self) -> &AllowedVocabulary {
        self.cell.get_or_init(|| {
            let vocabulary = AllowedVocabulary::read_or_empty(&self.source, &self.property_name);
            log::debug!(
                "loaded {} group(s) from {} [{}]",
                vocabulary.len(),
                self.source.display(),
                self.property_name
            );
            vocabulary
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Forget the loaded vocabulary; the next `get` reads the manifest again
    pub fn reset(&mut self) {
        self.cell.take();
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }
}

impl Default for VocabularyCache {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE, DEFAULT_PROPERTY_NAME)
    }
}
