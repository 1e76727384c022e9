//! Expand command-line paths, directories and glob patterns into files

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Directories never worth descending into
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Every regular file below `dir`. Symbolic links are not followed.
pub fn walk_dir(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .collect()
}

/// Expand paths, directories and glob patterns into a sorted file list
pub fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_dir() {
            files.extend(walk_dir(path));
            continue;
        }
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let paths = glob::glob(pattern).map_err(|source| DiscoverError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in paths.flatten() {
            if entry.is_dir() {
                files.extend(walk_dir(&entry));
            } else if entry.is_file() {
                files.push(entry);
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
