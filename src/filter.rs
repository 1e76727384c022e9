//! Test-file eligibility

use crate::config::FilesConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use thiserror::Error;

/// Invalid include/exclude pattern
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Include/exclude glob filter deciding which files are linted
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl FileFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, FilterError> {
        Ok(Self {
            include: Some(build_set(include)?),
            exclude: build_set(exclude)?,
        })
    }

    pub fn from_config(files: &FilesConfig) -> Result<Self, FilterError> {
        Self::new(&files.include, &files.exclude)
    }

    /// A filter that only applies the exclude patterns
    pub fn exclude_only(exclude: &[String]) -> Result<Self, FilterError> {
        Ok(Self {
            include: None,
            exclude: build_set(exclude)?,
        })
    }

    pub fn is_match(&self, path: &Path) -> bool {
        if self.exclude.is_match(path) {
            return false;
        }
        self.include.as_ref().map_or(true, |set| set.is_match(path))
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, FilterError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| FilterError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| FilterError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}
